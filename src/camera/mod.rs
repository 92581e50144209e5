//! 撮影コントローラ
//!
//! ホストのカメラ機能を `Camera` トレイトで抽象化する。
//! 同梱の `FileCamera` は画像ファイル（またはフォルダ）を静止画フレームとして扱い、
//! 撮影のたびにPNGへ再エンコードして保存する。

mod source;

pub use source::scan_frames;

use crate::error::{DiagnoseError, Result};
use image::ImageFormat;
use std::path::PathBuf;
use tracing::{debug, info};

/// カメラ使用許可の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    /// 問い合わせ前
    #[default]
    Unknown,
    Denied,
    Granted,
}

impl Permission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Permission::Granted)
    }
}

pub trait Camera {
    /// 現在の許可状態（画面表示時に一度だけ参照される）
    fn permission(&self) -> Permission;

    /// 許可を再要求する
    fn request_permission(&mut self) -> Permission;

    /// 静止画を撮影し、保存した画像のパスを返す
    fn capture_still(&mut self) -> Result<PathBuf>;
}

pub struct FileCamera {
    source: PathBuf,
    capture_dir: PathBuf,
    frames: Vec<PathBuf>,
    cursor: usize,
    permission: Permission,
}

impl FileCamera {
    /// 許可状態は Unknown で作成される。`request_permission` で確定する
    pub fn new(source: impl Into<PathBuf>, capture_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            capture_dir: capture_dir.into(),
            frames: Vec::new(),
            cursor: 0,
            permission: Permission::Unknown,
        }
    }

    /// 作成と同時に許可を問い合わせる
    pub fn open(source: impl Into<PathBuf>, capture_dir: impl Into<PathBuf>) -> Self {
        let mut camera = Self::new(source, capture_dir);
        camera.request_permission();
        camera
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn next_frame(&mut self) -> Result<PathBuf> {
        if self.frames.is_empty() {
            return Err(DiagnoseError::NoFrames(self.source.display().to_string()));
        }
        let frame = self.frames[self.cursor % self.frames.len()].clone();
        self.cursor += 1;
        Ok(frame)
    }

    fn capture_file_name(&self) -> String {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S%.3f");
        format!("capture-{}-{}.png", timestamp, self.cursor)
    }
}

impl Camera for FileCamera {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) -> Permission {
        self.permission = match scan_frames(&self.source) {
            Ok(frames) if !frames.is_empty() => {
                self.frames = frames;
                Permission::Granted
            }
            Ok(_) => {
                debug!(source = %self.source.display(), "no frames in camera source");
                Permission::Denied
            }
            Err(e) => {
                debug!(source = %self.source.display(), error = %e, "camera source unavailable");
                Permission::Denied
            }
        };
        self.permission
    }

    fn capture_still(&mut self) -> Result<PathBuf> {
        if !self.permission.is_granted() {
            return Err(DiagnoseError::PermissionDenied);
        }

        let frame = self.next_frame()?;
        let image = image::open(&frame)
            .map_err(|e| DiagnoseError::ImageLoad(format!("{}: {}", frame.display(), e)))?;

        std::fs::create_dir_all(&self.capture_dir)?;
        let output = self.capture_dir.join(self.capture_file_name());
        image
            .save_with_format(&output, ImageFormat::Png)
            .map_err(|e| DiagnoseError::Capture(e.to_string()))?;

        info!(frame = %frame.display(), output = %output.display(), "picture taken");
        Ok(output)
    }
}
