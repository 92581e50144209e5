//! 対話式の診断画面
//!
//! 表示中のボタンだけを選択肢として出し、選ばれた操作を `App` に渡す。

use crate::app::App;
use crate::camera::Camera;
use crate::error::{DiagnoseError, Result};
use crate::view::View;
use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};

/// 画面上の操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    GrantPermission,
    TakePicture,
    ToggleSuggestions,
    Suggest,
    ToggleAnalysis,
    Analyze,
    Retake,
    Quit,
}

impl ScreenAction {
    pub fn label(&self) -> &'static str {
        match self {
            ScreenAction::GrantPermission => "Grant Permission",
            ScreenAction::TakePicture => "Take Picture",
            ScreenAction::ToggleSuggestions => "View Suggestions",
            ScreenAction::Suggest => "Suggest",
            ScreenAction::ToggleAnalysis => "Analyze Compost Health",
            ScreenAction::Analyze => "Analyze",
            ScreenAction::Retake => "Retake Picture",
            ScreenAction::Quit => "Quit",
        }
    }
}

/// 表示内容から選べる操作を列挙
pub fn available_actions(view: &View) -> Vec<ScreenAction> {
    use crate::view::CameraPane;

    let mut actions = Vec::new();

    if matches!(view.camera, CameraPane::PermissionPending | CameraPane::PermissionPrompt) {
        actions.push(ScreenAction::GrantPermission);
    }
    if view.capture_button {
        actions.push(ScreenAction::TakePicture);
    }
    if let Some(results) = &view.results {
        actions.push(ScreenAction::ToggleSuggestions);
        if results.suggestions.expanded {
            actions.push(ScreenAction::Suggest);
        }
        actions.push(ScreenAction::ToggleAnalysis);
        if results.analysis.expanded {
            actions.push(ScreenAction::Analyze);
        }
    }
    if view.retake_button {
        actions.push(ScreenAction::Retake);
    }
    actions.push(ScreenAction::Quit);
    actions
}

fn loading_bar() -> Result<ProgressBar> {
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::with_template("Detecting... {percent:>3}% [{bar:30.blue}]")
        .map_err(|e| DiagnoseError::Ui(e.to_string()))?
        .progress_chars("=> ");
    bar.set_style(style);
    Ok(bar)
}

/// 対話ループ（Quit で終了）
pub async fn run_screen<C: Camera>(app: &mut App<C>) -> Result<()> {
    loop {
        let view = app.view();
        println!("\n{}", view);

        let actions = available_actions(&view);
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let selection = Select::new()
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| DiagnoseError::Ui(e.to_string()))?;

        match actions[selection] {
            ScreenAction::GrantPermission => {
                app.request_permission();
            }
            ScreenAction::TakePicture => {
                let bar = loading_bar()?;
                app.take_picture_with(|value| bar.set_position((value * 100.0).round() as u64))
                    .await;
                bar.finish_and_clear();
            }
            ScreenAction::ToggleSuggestions => {
                app.toggle_suggestions();
            }
            ScreenAction::Suggest => {
                app.fetch_suggestions().await;
            }
            ScreenAction::ToggleAnalysis => {
                app.toggle_analysis();
            }
            ScreenAction::Analyze => {
                app.analyze();
            }
            ScreenAction::Retake => {
                app.retake();
            }
            ScreenAction::Quit => break,
        }
    }

    Ok(())
}
