use crate::error::{DiagnoseError, Result};
use compost_diagnose_common::{parse_detection_body, Detection};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use tracing::debug;

/// `/detect/` クライアント
pub struct DetectionClient {
    http: Client,
    url: String,
}

impl DetectionClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }

    /// 画像をアップロードして検出結果を取得
    ///
    /// 成功ステータス以外は一律 `HttpStatus` エラー。
    /// 本文のフィールド欠落・型違いは空配列として扱うが、
    /// JSONとして読めない本文はエラーになる。
    pub async fn detect(&self, image: &Path) -> Result<Detection> {
        let bytes = tokio::fs::read(image).await?;
        let part = Part::bytes(bytes)
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(DiagnoseError::Network)?;
        let form = Form::new().part("file", part);

        debug!(url = %self.url, image = %image.display(), "uploading picture for detection");

        let response = self
            .http
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiagnoseError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let detection = parse_detection_body(&body)?;
        if detection.descriptions.is_empty() {
            debug!("No objects detected");
        }
        if detection.cropped_images.is_empty() {
            debug!("No cropped images");
        }
        Ok(detection)
    }
}
