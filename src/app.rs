//! 画面ドライバ
//!
//! カメラ・HTTPクライアント・疑似プログレスを `Screen` に結び付ける。
//! 失敗はすべてログに出すだけで、利用者には見せない（許可プロンプトを除く）。

use crate::camera::{Camera, Permission};
use crate::client::ApiClient;
use crate::progress::{spawn_ticker, ProgressConfig};
use crate::screen::{Screen, SessionId};
use crate::view::{render, View};
use std::path::Path;
use tracing::{error, info, warn};

pub struct App<C: Camera> {
    camera: C,
    api: ApiClient,
    progress: ProgressConfig,
    screen: Screen,
}

impl<C: Camera> App<C> {
    /// 画面表示（マウント）時にカメラ許可を一度だけ問い合わせる
    pub fn new(camera: C, api: ApiClient, progress: ProgressConfig) -> Self {
        let screen = Screen::new(camera.permission());
        Self {
            camera,
            api,
            progress,
            screen,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn view(&self) -> View {
        render(&self.screen)
    }

    pub fn request_permission(&mut self) -> Permission {
        let permission = self.camera.request_permission();
        self.screen.set_permission(permission);
        permission
    }

    /// 撮影して検出まで実行
    pub async fn take_picture(&mut self) -> bool {
        self.take_picture_with(|_| {}).await
    }

    /// 撮影して検出まで実行（疑似プログレスの更新ごとに `on_progress` を呼ぶ）
    ///
    /// 撮影できなかった場合は false（状態は変わらない）
    pub async fn take_picture_with(&mut self, on_progress: impl FnMut(f64)) -> bool {
        if !self.screen.can_capture() {
            warn!("capture ignored: camera not ready");
            return false;
        }

        let captured = match self.camera.capture_still() {
            Ok(path) => path,
            Err(e) => {
                error!(error = %e, "Error taking picture");
                return false;
            }
        };

        let Some(session) = self.screen.begin_capture(captured.clone()) else {
            return false;
        };

        self.detect(session, &captured, on_progress).await;
        true
    }

    async fn detect(&mut self, session: SessionId, image: &Path, mut on_progress: impl FnMut(f64)) {
        let (mut ticks, ticker) = spawn_ticker(self.progress);

        let request = self.api.detection.detect(image);
        tokio::pin!(request);

        let outcome = loop {
            tokio::select! {
                outcome = &mut request => break outcome,
                changed = ticks.changed() => {
                    if changed.is_err() {
                        // 疑似プログレスは 1.0 で止まる。以降は応答だけを待つ
                        break (&mut request).await;
                    }
                    let value = *ticks.borrow_and_update();
                    self.screen.update_progress(session, value);
                    on_progress(value);
                }
            }
        };
        ticker.abort();

        match outcome {
            Ok(detection) => {
                info!(
                    objects = detection.descriptions.len(),
                    crops = detection.cropped_images.len(),
                    "detection received"
                );
                self.screen.apply_detection(session, detection);
            }
            Err(e) => {
                error!(error = %e, "detection failed");
                self.screen.fail_detection(session);
            }
        }
    }

    /// 「Suggest」ボタン: 検出ラベルから提案を取得
    pub async fn fetch_suggestions(&mut self) -> bool {
        let Some((session, labels)) = self.screen.suggestion_request() else {
            return false;
        };

        match self.api.suggestion.suggest(&labels).await {
            Ok(lines) => self.screen.apply_suggestions(session, lines),
            Err(e) => {
                error!(error = %e, "Error fetching suggestions");
                false
            }
        }
    }

    pub fn toggle_suggestions(&mut self) -> bool {
        self.screen.toggle_suggestions()
    }

    pub fn toggle_analysis(&mut self) -> bool {
        self.screen.toggle_analysis()
    }

    pub fn analyze(&mut self) -> bool {
        self.screen.analyze()
    }

    pub fn retake(&mut self) -> bool {
        self.screen.retake()
    }
}
