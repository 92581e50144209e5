//! 診断画面の一連の流れ（撮影 → 検出 → 提案 → 撮り直し）
//!
//! FileCamera と wiremock を組み合わせて検証

use compost_diagnose::app::App;
use compost_diagnose::camera::{Camera, FileCamera, Permission};
use compost_diagnose::client::{ApiClient, Endpoints};
use compost_diagnose::error::{DiagnoseError, Result};
use compost_diagnose::progress::ProgressConfig;
use compost_diagnose::screen::{Panels, ViewState};
use compost_diagnose::view::CameraPane;
use image::{Rgb, RgbImage};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_progress() -> ProgressConfig {
    ProgressConfig {
        step: 0.1,
        interval: Duration::from_millis(5),
    }
}

fn camera_with_frame(dir: &TempDir) -> FileCamera {
    let frames = dir.path().join("frames");
    std::fs::create_dir_all(&frames).unwrap();
    RgbImage::from_pixel(8, 8, Rgb([120, 80, 40]))
        .save(frames.join("pile.jpg"))
        .unwrap();
    FileCamera::open(frames, dir.path().join("captures"))
}

fn app_for(server: &MockServer, camera: FileCamera) -> App<FileCamera> {
    let api = ApiClient::new(&Endpoints::new(server.uri()), None).unwrap();
    App::new(camera, api, fast_progress())
}

async fn mount_detection(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/detect/"))
        .respond_with(response)
        .mount(server)
        .await;
}

/// 1件検出: 項目ボックス1つ、切り出し画像0枚
#[tokio::test]
async fn test_single_detection_shows_one_item_box() {
    let server = MockServer::start().await;
    mount_detection(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "descriptions": ["Banana peel"],
            "cropped_images": []
        })),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, camera_with_frame(&dir));

    assert!(app.take_picture().await);

    let view = app.view();
    assert!(view.loading.is_none());
    let results = view.results.as_ref().expect("結果が表示されていない");
    assert_eq!(results.item_boxes, vec!["Banana peel"]);
    assert!(results.cropped_images.is_empty());
    assert!(matches!(view.camera, CameraPane::Captured(_)));
    assert!(view.retake_button);
}

/// HTTP 500: ローディング解除、結果なし、項目ボックスなし
#[tokio::test]
async fn test_server_error_hides_results() {
    let server = MockServer::start().await;
    mount_detection(&server, ResponseTemplate::new(500)).await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, camera_with_frame(&dir));

    assert!(app.take_picture().await);

    assert!(!app.screen().is_loading());
    let view = app.view();
    assert!(view.loading.is_none());
    assert!(view.results.is_none());
    assert_eq!(view.item_count(), 0);
    assert!(view.capture_button);
}

/// 200でも本文がJSONでなければ失敗扱い: 結果は出さない
#[tokio::test]
async fn test_non_json_detection_body_hides_results() {
    let server = MockServer::start().await;
    mount_detection(
        &server,
        ResponseTemplate::new(200).set_body_string("<html>502 Bad Gateway</html>"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, camera_with_frame(&dir));

    assert!(app.take_picture().await);

    assert!(!app.screen().is_loading());
    let view = app.view();
    assert!(view.loading.is_none());
    assert!(view.results.is_none());
    assert_eq!(view.item_count(), 0);
    assert_eq!(app.screen().state(), &ViewState::Capturing);
}

/// `null` 本文も同じく結果を出さない
#[tokio::test]
async fn test_null_detection_body_hides_results() {
    let server = MockServer::start().await;
    mount_detection(&server, ResponseTemplate::new(200).set_body_string("null")).await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, camera_with_frame(&dir));

    assert!(app.take_picture().await);
    assert!(app.view().results.is_none());
}

/// 応答が遅い間も疑似プログレスは単調に増え、1.0 を超えない
#[tokio::test]
async fn test_progress_is_monotonic_while_waiting() {
    let server = MockServer::start().await;
    mount_detection(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({ "descriptions": ["Leaf"] }))
            .set_delay(Duration::from_millis(120)),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, camera_with_frame(&dir));

    let mut seen = Vec::new();
    assert!(app.take_picture_with(|value| seen.push(value)).await);

    assert!(!seen.is_empty());
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert!(seen.iter().all(|&v| (0.0..=1.0).contains(&v)));
    assert_eq!(app.screen().detected_objects(), ["Leaf".to_string()]);
}

/// 提案: 改行で分割された2行が順序どおり表示される
#[tokio::test]
async fn test_suggestions_render_in_order() {
    let server = MockServer::start().await;
    mount_detection(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "descriptions": ["Banana peel"] })),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "generated_text": "Add carbon\nTurn pile"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, camera_with_frame(&dir));

    app.take_picture().await;
    assert!(app.toggle_suggestions());
    assert!(app.fetch_suggestions().await);

    let view = app.view();
    let suggestions = &view.results.as_ref().unwrap().suggestions;
    assert!(suggestions.expanded);
    assert_eq!(suggestions.lines, vec!["Add carbon", "Turn pile"]);
}

/// 提案の失敗は画面に出さない
#[tokio::test]
async fn test_suggestion_failure_is_silent() {
    let server = MockServer::start().await;
    mount_detection(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "descriptions": ["Leaf"] })),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, camera_with_frame(&dir));

    app.take_picture().await;
    assert!(!app.fetch_suggestions().await);
    assert!(app.screen().suggestions().is_empty());
    assert_eq!(app.screen().detected_objects(), ["Leaf".to_string()]);
}

/// 撮り直しですべて初期化
#[tokio::test]
async fn test_retake_resets_session() {
    let server = MockServer::start().await;
    mount_detection(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "descriptions": ["Banana peel"],
            "cropped_images": ["aGVsbG8="]
        })),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, camera_with_frame(&dir));

    app.take_picture().await;
    app.toggle_suggestions();
    app.toggle_analysis();
    assert!(app.analyze());

    assert!(app.retake());
    let screen = app.screen();
    assert_eq!(screen.state(), &ViewState::Capturing);
    assert!(screen.captured_image().is_none());
    assert!(screen.detected_objects().is_empty());
    assert!(screen.cropped_images().is_empty());
    assert_eq!(screen.panels(), Panels::default());
    assert_eq!(app.view().camera, CameraPane::Live);
}

/// 撮影失敗: 状態は変わらず、通信もしない
#[tokio::test]
async fn test_capture_failure_leaves_state() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.png"), b"not an image").unwrap();
    let camera = FileCamera::open(dir.path(), dir.path().join("captures"));

    let mut app = app_for(&server, camera);
    assert!(!app.take_picture().await);
    assert_eq!(app.screen().state(), &ViewState::Capturing);
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// 許可なし → 再要求で許可
#[tokio::test]
async fn test_permission_prompt_and_grant() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let frames = dir.path().join("frames");
    std::fs::create_dir_all(&frames).unwrap();
    let camera = FileCamera::open(&frames, dir.path().join("captures"));

    let mut app = app_for(&server, camera);
    assert_eq!(app.view().camera, CameraPane::PermissionPrompt);
    assert!(!app.take_picture().await);

    RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]))
        .save(frames.join("pile.png"))
        .unwrap();
    assert_eq!(app.request_permission(), Permission::Granted);
    assert_eq!(app.view().camera, CameraPane::Live);
}

/// Camera トレイトの差し替え（撮影は常に失敗）
struct BrokenCamera;

impl Camera for BrokenCamera {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn request_permission(&mut self) -> Permission {
        Permission::Granted
    }

    fn capture_still(&mut self) -> Result<PathBuf> {
        Err(DiagnoseError::Capture("shutter jammed".into()))
    }
}

#[tokio::test]
async fn test_custom_camera_failure_is_silent() {
    let server = MockServer::start().await;
    let api = ApiClient::new(&Endpoints::new(server.uri()), None).unwrap();
    let mut app = App::new(BrokenCamera, api, fast_progress());

    assert!(!app.take_picture().await);
    assert!(app.view().capture_button);
}
