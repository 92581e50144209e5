//! 診断画面の状態機械
//!
//! 状態は `Capturing` / `Loading` / `Results` のいずれか一つ。
//! アコーディオン（提案・解析）の開閉は `Results` の中だけに存在する。
//! 撮影ごとに `SessionId` を発行し、古いセッション宛ての応答は捨てる。

use crate::camera::Permission;
use crate::progress::Progress;
use compost_diagnose_common::{Detection, ImageRef};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SUGGESTIONS_TITLE: &str = "View Suggestions";
pub const ANALYSIS_TITLE: &str = "Analyze Compost Health";

pub const SUGGESTIONS_TEXT: &str = "The \"View Suggestions\" section provides useful tips and recommendations based on the detected objects in your compost. Click the \"Suggest\" button to get detailed suggestions for improving your compost.";
pub const ANALYSIS_TEXT: &str = "The \"Analyze Compost Health\" section evaluates the overall health of your compost based on the detected objects. Click the \"Analyze\" button for a comprehensive analysis and actionable insights.";

pub const ANALYSIS_NOTICE: &str = "Analysis displayed";

/// 撮影ごとの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// アコーディオンの開閉
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Panels {
    pub suggestions: bool,
    pub analysis: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loading {
    pub session: SessionId,
    pub captured: PathBuf,
    pub progress: Progress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Results {
    pub session: SessionId,
    pub captured: PathBuf,
    pub detection: Detection,
    pub panels: Panels,
    pub suggestions: Vec<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Capturing,
    Loading(Loading),
    Results(Results),
}

#[derive(Debug, Default)]
pub struct Screen {
    permission: Permission,
    state: ViewState,
    last_session: u64,
}

impl Screen {
    pub fn new(permission: Permission) -> Self {
        Self {
            permission,
            ..Default::default()
        }
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// 許可状態を反映。許可が外れた場合はセッションを破棄する
    pub fn set_permission(&mut self, permission: Permission) {
        if !permission.is_granted() {
            self.state = ViewState::Capturing;
        }
        self.permission = permission;
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn can_capture(&self) -> bool {
        self.permission.is_granted() && matches!(self.state, ViewState::Capturing)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading(_))
    }

    pub fn current_session(&self) -> Option<SessionId> {
        match &self.state {
            ViewState::Capturing => None,
            ViewState::Loading(loading) => Some(loading.session),
            ViewState::Results(results) => Some(results.session),
        }
    }

    pub fn captured_image(&self) -> Option<&Path> {
        match &self.state {
            ViewState::Capturing => None,
            ViewState::Loading(loading) => Some(&loading.captured),
            ViewState::Results(results) => Some(&results.captured),
        }
    }

    /// 検出ラベル（結果表示中以外は空）
    pub fn detected_objects(&self) -> &[String] {
        match &self.state {
            ViewState::Results(results) => &results.detection.descriptions,
            _ => &[],
        }
    }

    /// 切り出し画像（結果表示中以外は空）
    pub fn cropped_images(&self) -> &[ImageRef] {
        match &self.state {
            ViewState::Results(results) => &results.detection.cropped_images,
            _ => &[],
        }
    }

    pub fn progress(&self) -> f64 {
        match &self.state {
            ViewState::Loading(loading) => loading.progress.value(),
            _ => 0.0,
        }
    }

    pub fn panels(&self) -> Panels {
        match &self.state {
            ViewState::Results(results) => results.panels,
            _ => Panels::default(),
        }
    }

    pub fn suggestions(&self) -> &[String] {
        match &self.state {
            ViewState::Results(results) => &results.suggestions,
            _ => &[],
        }
    }

    /// 撮影成功: Capturing → Loading
    ///
    /// 撮影できない状態なら None
    pub fn begin_capture(&mut self, captured: PathBuf) -> Option<SessionId> {
        if !self.can_capture() {
            return None;
        }
        self.last_session += 1;
        let session = SessionId(self.last_session);
        self.state = ViewState::Loading(Loading {
            session,
            captured,
            progress: Progress::new(),
        });
        Some(session)
    }

    pub fn update_progress(&mut self, session: SessionId, value: f64) -> bool {
        match &mut self.state {
            ViewState::Loading(loading) if loading.session == session => {
                loading.progress.advance_to(value);
                true
            }
            _ => false,
        }
    }

    /// 検出成功: Loading → Results
    pub fn apply_detection(&mut self, session: SessionId, detection: Detection) -> bool {
        let captured = match &mut self.state {
            ViewState::Loading(loading) if loading.session == session => {
                std::mem::take(&mut loading.captured)
            }
            _ => {
                debug!(session = session.value(), "discarding stale detection response");
                return false;
            }
        };
        self.state = ViewState::Results(Results {
            session,
            captured,
            detection,
            panels: Panels::default(),
            suggestions: Vec::new(),
            notice: None,
        });
        true
    }

    /// 検出失敗: Loading → Capturing（結果は表示しない）
    pub fn fail_detection(&mut self, session: SessionId) -> bool {
        match &self.state {
            ViewState::Loading(loading) if loading.session == session => {
                self.state = ViewState::Capturing;
                true
            }
            _ => {
                debug!(session = session.value(), "discarding stale detection failure");
                false
            }
        }
    }

    /// 撮り直し: セッションの全フィールドを初期化して Capturing へ
    ///
    /// 結果表示中のみ受け付ける（撮影中・検出待ちでは何もしない）
    pub fn retake(&mut self) -> bool {
        if !matches!(self.state, ViewState::Results(_)) {
            debug!("retake ignored outside results");
            return false;
        }
        self.state = ViewState::Capturing;
        true
    }

    pub fn toggle_suggestions(&mut self) -> bool {
        self.with_results(|results| results.panels.suggestions = !results.panels.suggestions)
    }

    pub fn toggle_analysis(&mut self) -> bool {
        self.with_results(|results| results.panels.analysis = !results.panels.analysis)
    }

    /// 提案リクエストの材料（セッションと検出ラベル）
    pub fn suggestion_request(&self) -> Option<(SessionId, Vec<String>)> {
        match &self.state {
            ViewState::Results(results) => {
                Some((results.session, results.detection.descriptions.clone()))
            }
            _ => None,
        }
    }

    /// 提案を反映し、提案パネルを開く
    pub fn apply_suggestions(&mut self, session: SessionId, lines: Vec<String>) -> bool {
        match &mut self.state {
            ViewState::Results(results) if results.session == session => {
                results.suggestions = lines;
                results.panels.suggestions = true;
                true
            }
            _ => {
                debug!(session = session.value(), "discarding stale suggestions");
                false
            }
        }
    }

    /// 解析パネルの「Analyze」ボタン
    pub fn analyze(&mut self) -> bool {
        match &mut self.state {
            ViewState::Results(results) if results.panels.analysis => {
                results.notice = Some(ANALYSIS_NOTICE.to_string());
                true
            }
            _ => false,
        }
    }

    fn with_results(&mut self, update: impl FnOnce(&mut Results)) -> bool {
        match &mut self.state {
            ViewState::Results(results) => {
                update(results);
                true
            }
            _ => false,
        }
    }
}
