use crate::error::{DiagnoseError, Result};
use crate::progress::ProgressConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 検出・提案サーバーの既定アドレス
pub const DEFAULT_BASE_URL: &str = "http://192.168.0.109:9191";

/// ベースURLを上書きする環境変数
pub const BASE_URL_ENV: &str = "COMPOST_DIAGNOSE_URL";

const DEFAULT_PROGRESS_STEP: f64 = 0.1;

/// 疑似プログレスの1回あたりの最小増分（これ未満だと1.0に届かない・遅すぎる）
const MIN_PROGRESS_STEP: f64 = 0.01;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    /// 撮影画像の保存先（未指定時は一時ディレクトリ）
    pub capture_dir: Option<PathBuf>,
    pub progress_step: f64,
    pub progress_interval_ms: u64,
    /// リクエストのタイムアウト（未指定時は無制限）
    pub timeout_seconds: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            capture_dir: None,
            progress_step: DEFAULT_PROGRESS_STEP,
            progress_interval_ms: 300,
            timeout_seconds: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DiagnoseError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("compost-diagnose").join("config.json"))
    }

    /// 実際に使うベースURL（環境変数を優先）
    pub fn effective_base_url(&self) -> String {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.base_url.clone(),
        }
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(DiagnoseError::Config(format!(
                "URLは http:// または https:// で始めてください: {}",
                url
            )));
        }
        self.base_url = url.trim_end_matches('/').to_string();
        self.save()
    }

    pub fn capture_dir(&self) -> PathBuf {
        self.capture_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("compost-diagnose"))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// 疑似プログレス設定（step は正の値に丸める）
    pub fn progress(&self) -> ProgressConfig {
        let step = if self.progress_step.is_nan() {
            DEFAULT_PROGRESS_STEP
        } else {
            self.progress_step.max(MIN_PROGRESS_STEP)
        };
        ProgressConfig {
            step,
            interval: Duration::from_millis(self.progress_interval_ms.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://192.168.0.109:9191");
        assert_eq!(config.progress_step, 0.1);
        assert_eq!(config.progress_interval_ms, 300);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"base_url":"http://localhost:9191"}"#).unwrap();
        assert_eq!(config.base_url, "http://localhost:9191");
        assert_eq!(config.progress_interval_ms, 300);
    }

    #[test]
    fn test_progress_config() {
        let config = Config { progress_interval_ms: 50, ..Default::default() };
        let progress = config.progress();
        assert_eq!(progress.interval, Duration::from_millis(50));
        assert_eq!(progress.step, 0.1);
    }

    #[test]
    fn test_progress_step_is_clamped() {
        for bad in [0.0, -0.3, f64::NEG_INFINITY] {
            let config = Config { progress_step: bad, ..Default::default() };
            assert_eq!(config.progress().step, MIN_PROGRESS_STEP);
        }

        let config = Config { progress_step: f64::NAN, ..Default::default() };
        assert_eq!(config.progress().step, DEFAULT_PROGRESS_STEP);

        let config = Config { progress_interval_ms: 0, ..Default::default() };
        assert_eq!(config.progress().interval, Duration::from_millis(1));
    }

    /// step 0 の設定でもタイマーは 1.0 に達して終了する
    #[tokio::test(start_paused = true)]
    async fn test_zero_step_ticker_still_completes() {
        let config = Config { progress_step: 0.0, progress_interval_ms: 10, ..Default::default() };
        let (mut rx, handle) = crate::progress::spawn_ticker(config.progress());

        let mut last = 0.0;
        while rx.changed().await.is_ok() {
            last = *rx.borrow_and_update();
        }
        handle.await.unwrap();

        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_set_base_url_rejects_non_http() {
        let mut config = Config::default();
        let result = config.set_base_url("ftp://example".into());
        assert!(matches!(result, Err(DiagnoseError::Config(_))));
    }
}
