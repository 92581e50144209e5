//! エンドポイントの入出力型
//!
//! - Detection: `/detect/` の解析結果（ラベルと切り出し画像）
//! - SuggestionRequest / SuggestionResponse: `/generate` の入出力

use serde::{Deserialize, Serialize};

/// 画像参照（ファイルパス、URL、Data URL、生のBase64のいずれか）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_data_url(&self) -> bool {
        self.0.starts_with("data:")
    }

    /// Data URLのMIMEタイプ（例: "image/png"）
    ///
    /// Data URLでない場合はNone
    pub fn mime_type(&self) -> Option<&str> {
        if !self.is_data_url() {
            return None;
        }
        self.0
            .split(':')
            .nth(1)
            .and_then(|s| s.split(';').next())
            .filter(|s| !s.is_empty())
    }

    /// Base64データ部分を抽出
    ///
    /// - "data:image/png;base64,iVBOR..." → "iVBOR..."
    /// - パス・URLらしきものはNone
    /// - それ以外は文字列全体をBase64とみなす
    pub fn base64_payload(&self) -> Option<&str> {
        if self.is_data_url() {
            return self.0.split(',').nth(1);
        }
        if self.looks_like_location() {
            return None;
        }
        Some(self.0.trim())
    }

    fn looks_like_location(&self) -> bool {
        let s = self.0.as_str();
        s.is_empty()
            || s.contains("://")
            || s.contains('\\')
            || s.contains('.')
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_data_url() {
            let mime = self.mime_type().unwrap_or("application/octet-stream");
            return write!(f, "<{} data, {} chars>", mime, self.0.len());
        }
        f.write_str(&self.0)
    }
}

/// 物体検出の結果
///
/// フィールドが欠落・配列以外の場合は空として扱う（parser参照）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub descriptions: Vec<String>,
    pub cropped_images: Vec<ImageRef>,
}

impl Detection {
    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty() && self.cropped_images.is_empty()
    }
}

/// `/generate` へのリクエスト
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub text: String,
}

/// `/generate` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub generated_text: String,
}
