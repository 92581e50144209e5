use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagnoseError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("カメラの使用が許可されていません。`Grant Permission` で再度許可してください")]
    PermissionDenied,

    #[error("カメラソースが見つかりません: {0}")]
    SourceNotFound(String),

    #[error("カメラソースに画像がありません: {0}")]
    NoFrames(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("撮影エラー: {0}")]
    Capture(String),

    #[error("サーバーエラー: HTTP {0}")]
    HttpStatus(u16),

    #[error("通信エラー: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("画面操作エラー: {0}")]
    Ui(String),

    #[error(transparent)]
    Common(#[from] compost_diagnose_common::Error),
}

pub type Result<T> = std::result::Result<T, DiagnoseError>;
