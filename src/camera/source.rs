use crate::error::{DiagnoseError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"];

/// Check if a file extension is a supported image format
fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|&e| e == ext.to_string_lossy()))
        .unwrap_or(false)
}

/// カメラソースからフレーム候補を列挙
///
/// - 画像ファイル: そのファイルのみ
/// - フォルダ: 直下の画像をファイル名順に
pub fn scan_frames(source: &Path) -> Result<Vec<PathBuf>> {
    if !source.exists() {
        return Err(DiagnoseError::SourceNotFound(source.display().to_string()));
    }

    if source.is_file() {
        return Ok(if is_image_path(source) {
            vec![source.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let mut frames: Vec<PathBuf> = WalkDir::new(source)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_image_path(p))
        .collect();

    frames.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(frames)
}
