//! 切り出し画像の保存
//!
//! Data URL / Base64 の切り出し画像をデコードしてファイルに書き出す。
//! パスやURLの参照、デコードしても画像形式にならないものはスキップする。

use crate::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use compost_diagnose_common::ImageRef;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 画像参照をバイト列にデコード
///
/// Base64として読めない場合や、デコード結果が既知の画像形式でない場合はNone。
/// `/srv/crops/0` のようなパスはBase64文字だけで構成されるため、形式判定で弾く。
pub fn decode_image_ref(image: &ImageRef) -> Option<Vec<u8>> {
    let payload = image.base64_payload()?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    image::guess_format(&bytes).ok()?;
    Some(bytes)
}

fn extension_for(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("bin")
}

/// 切り出し画像を `dir` に保存し、書き出したパスを返す
///
/// ファイル名は `crop-<番号>-<SHA-256先頭12桁>.<拡張子>`
pub fn save_cropped_images(crops: &[ImageRef], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut saved = Vec::new();
    if crops.is_empty() {
        return Ok(saved);
    }

    std::fs::create_dir_all(dir)?;

    for (idx, crop) in crops.iter().enumerate() {
        let Some(bytes) = decode_image_ref(crop) else {
            warn!(index = idx, image = %crop, "cropped image is not inline image data, skipped");
            continue;
        };

        let digest = hex::encode(Sha256::digest(&bytes));
        let name = format!("crop-{}-{}.{}", idx, &digest[..12], extension_for(&bytes));
        let path = dir.join(name);
        std::fs::write(&path, &bytes)?;
        saved.push(path);
    }

    info!(saved = saved.len(), total = crops.len(), dir = %dir.display(), "cropped images saved");
    Ok(saved)
}
