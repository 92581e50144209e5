use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "compost-diagnose")]
#[command(about = "コンポスト写真の物体検出・改善提案クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// サーバーのベースURL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対話式の診断画面を開く
    Screen {
        /// カメラソース（画像ファイルまたは画像フォルダ）
        #[arg(required = true)]
        source: PathBuf,

        /// 撮影画像の保存先
        #[arg(long)]
        capture_dir: Option<PathBuf>,
    },

    /// 画像1枚を検出サーバーに送信して結果を表示
    Detect {
        /// 画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// 切り出し画像の保存先
        #[arg(long)]
        save_crops: Option<PathBuf>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 検出ラベルから改善提案を取得
    Suggest {
        /// 検出ラベル
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// 設定を表示/編集
    Config {
        /// サーバーのベースURLを設定
        #[arg(long)]
        set_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
