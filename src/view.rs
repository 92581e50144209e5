//! 画面の表示モデル
//!
//! `Screen` の状態から「いま何が見えているか」を組み立てる。端末表示は `Display` 実装で行う。

use crate::camera::Permission;
use crate::progress::Progress;
use crate::screen::{
    Screen, ViewState, ANALYSIS_TEXT, ANALYSIS_TITLE, SUGGESTIONS_TEXT, SUGGESTIONS_TITLE,
};
use compost_diagnose_common::ImageRef;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CameraPane {
    /// 許可状態の問い合わせ中（何も表示しない）
    PermissionPending,
    /// 許可を求めるプロンプト
    PermissionPrompt,
    Live,
    Captured(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadingView {
    pub progress: f64,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub title: &'static str,
    pub expanded: bool,
    /// 開いているときだけ表示される説明文
    pub body: Option<&'static str>,
    pub lines: Vec<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub item_boxes: Vec<String>,
    pub cropped_images: Vec<ImageRef>,
    pub suggestions: PanelView,
    pub analysis: PanelView,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub camera: CameraPane,
    pub loading: Option<LoadingView>,
    pub results: Option<ResultsView>,
    pub capture_button: bool,
    pub retake_button: bool,
}

impl View {
    fn blank(camera: CameraPane) -> Self {
        Self {
            camera,
            loading: None,
            results: None,
            capture_button: false,
            retake_button: false,
        }
    }

    pub fn item_count(&self) -> usize {
        self.results.as_ref().map(|r| r.item_boxes.len()).unwrap_or(0)
    }
}

pub fn render(screen: &Screen) -> View {
    match screen.permission() {
        Permission::Unknown => return View::blank(CameraPane::PermissionPending),
        Permission::Denied => return View::blank(CameraPane::PermissionPrompt),
        Permission::Granted => {}
    }

    match screen.state() {
        ViewState::Capturing => View {
            camera: CameraPane::Live,
            loading: None,
            results: None,
            capture_button: true,
            retake_button: false,
        },
        ViewState::Loading(loading) => View {
            camera: CameraPane::Captured(loading.captured.display().to_string()),
            loading: Some(loading_view(&loading.progress)),
            results: None,
            capture_button: false,
            retake_button: false,
        },
        ViewState::Results(results) => View {
            camera: CameraPane::Captured(results.captured.display().to_string()),
            loading: None,
            results: Some(ResultsView {
                item_boxes: results.detection.descriptions.clone(),
                cropped_images: results.detection.cropped_images.clone(),
                suggestions: PanelView {
                    title: SUGGESTIONS_TITLE,
                    expanded: results.panels.suggestions,
                    body: results.panels.suggestions.then_some(SUGGESTIONS_TEXT),
                    lines: if results.panels.suggestions {
                        results.suggestions.clone()
                    } else {
                        Vec::new()
                    },
                    notice: None,
                },
                analysis: PanelView {
                    title: ANALYSIS_TITLE,
                    expanded: results.panels.analysis,
                    body: results.panels.analysis.then_some(ANALYSIS_TEXT),
                    lines: Vec::new(),
                    notice: results.notice.clone().filter(|_| results.panels.analysis),
                },
            }),
            capture_button: false,
            retake_button: true,
        },
    }
}

fn loading_view(progress: &Progress) -> LoadingView {
    LoadingView {
        progress: progress.value(),
        percent: progress.percent(),
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.camera {
            CameraPane::PermissionPending => return Ok(()),
            CameraPane::PermissionPrompt => {
                return writeln!(f, "We need your permission to show the camera");
            }
            CameraPane::Live => writeln!(f, "📷 camera ready")?,
            CameraPane::Captured(path) => writeln!(f, "🖼  {}", path)?,
        }

        if let Some(loading) = &self.loading {
            writeln!(f, "Detecting... {}%", loading.percent)?;
        }

        if let Some(results) = &self.results {
            writeln!(f, "\nDetected Objects")?;
            for item in &results.item_boxes {
                writeln!(f, "  [ {} ]", item)?;
            }
            if !results.cropped_images.is_empty() {
                writeln!(f, "  cropped images: {}", results.cropped_images.len())?;
            }
            write_panel(f, &results.suggestions)?;
            write_panel(f, &results.analysis)?;
        }

        Ok(())
    }
}

fn write_panel(f: &mut fmt::Formatter<'_>, panel: &PanelView) -> fmt::Result {
    let chevron = if panel.expanded { "▲" } else { "▼" };
    writeln!(f, "\n{} {}", panel.title, chevron)?;
    if let Some(body) = panel.body {
        writeln!(f, "  {}", body)?;
    }
    for line in &panel.lines {
        writeln!(f, "  • {}", line)?;
    }
    if let Some(notice) = &panel.notice {
        writeln!(f, "  ({})", notice)?;
    }
    Ok(())
}
