use crate::error::{DiagnoseError, Result};
use compost_diagnose_common::{labels_to_text, parse_suggestion_body, SuggestionRequest};
use reqwest::Client;
use tracing::debug;

/// `/generate` クライアント
pub struct SuggestionClient {
    http: Client,
    url: String,
}

impl SuggestionClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }

    /// 検出ラベルから改善提案を生成し、行ごとに分割して返す
    pub async fn suggest(&self, labels: &[String]) -> Result<Vec<String>> {
        let request = SuggestionRequest {
            text: labels_to_text(labels),
        };

        debug!(url = %self.url, text = %request.text, "requesting suggestions");

        let response = self.http.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiagnoseError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(body = %body, "suggestion response");
        Ok(parse_suggestion_body(&body)?)
    }
}
