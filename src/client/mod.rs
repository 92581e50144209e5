//! 検出・提案サーバーのHTTPクライアント

mod detection;
mod suggestion;

pub use detection::DetectionClient;
pub use suggestion::SuggestionClient;

use crate::error::{DiagnoseError, Result};
use reqwest::Client;
use std::time::Duration;

/// エンドポイントURLの組み立て
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn detect_url(&self) -> String {
        format!("{}/detect/", self.base_url)
    }

    pub fn generate_url(&self) -> String {
        format!("{}/generate", self.base_url)
    }
}

/// タイムアウト未指定時は無制限
pub fn build_http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(DiagnoseError::Network)
}

/// 両エンドポイントのクライアント
pub struct ApiClient {
    pub detection: DetectionClient,
    pub suggestion: SuggestionClient,
}

impl ApiClient {
    pub fn new(endpoints: &Endpoints, timeout: Option<Duration>) -> Result<Self> {
        let http = build_http_client(timeout)?;
        Ok(Self {
            detection: DetectionClient::new(http.clone(), endpoints.detect_url()),
            suggestion: SuggestionClient::new(http, endpoints.generate_url()),
        })
    }
}
