//! 検出中の疑似プログレス
//!
//! 実際の通信・推論の進捗とは連動しない。一定間隔で step ずつ増やし、1.0 で止まる。

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressConfig {
    pub step: f64,
    pub interval: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            interval: Duration::from_millis(300),
        }
    }
}

/// 0.0〜1.0 の単調非減少な進捗値
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Progress {
    value: f64,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// 表示用パーセント（四捨五入）
    pub fn percent(&self) -> u8 {
        (self.value * 100.0).round() as u8
    }

    pub fn is_complete(&self) -> bool {
        self.value >= 1.0
    }

    /// step だけ進める
    pub fn tick(&mut self, step: f64) -> f64 {
        self.advance_to(self.value + step.max(0.0))
    }

    /// 指定値まで進める（後退はしない）
    pub fn advance_to(&mut self, value: f64) -> f64 {
        if value.is_nan() {
            return self.value;
        }
        let capped = value.min(1.0);
        if capped > self.value {
            self.value = capped;
        }
        self.value
    }
}

/// 疑似プログレスのタイマーを起動
///
/// 最初の値は 0.0。1.0 に達するとタスクは終了し、送信側がドロップされる。
pub fn spawn_ticker(config: ProgressConfig) -> (watch::Receiver<f64>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(0.0);

    let handle = tokio::spawn(async move {
        let mut progress = Progress::new();
        let mut interval = tokio::time::interval(config.interval);
        // interval の最初の tick は即時に返るので読み捨てる
        interval.tick().await;

        while !progress.is_complete() {
            interval.tick().await;
            let value = progress.tick(config.step);
            if tx.send(value).is_err() {
                break;
            }
        }
    });

    (rx, handle)
}
