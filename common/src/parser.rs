//! APIレスポンスパーサー
//!
//! 検出レスポンスは寛容にパースする:
//! `descriptions` / `cropped_images` が欠落、または配列でない場合は空配列として扱う。
//! ただし本文そのものがJSONとして読めない場合はエラー。

use crate::error::{Error, Result};
use crate::types::{Detection, ImageRef, SuggestionResponse};
use serde_json::Value;

/// 検出レスポンス本文をパース
///
/// 本文がJSONでない場合と `null` の場合はエラー。
/// 配列など、オブジェクト以外の値はフィールド欠落と同じく空の結果になる。
///
/// # Examples
/// ```
/// use compost_diagnose_common::parse_detection_body;
///
/// let detection = parse_detection_body(r#"{"descriptions":["Banana peel"]}"#).unwrap();
/// assert_eq!(detection.descriptions, vec!["Banana peel"]);
/// assert!(detection.cropped_images.is_empty());
///
/// assert!(parse_detection_body("<html>502 Bad Gateway</html>").is_err());
/// ```
pub fn parse_detection_body(body: &str) -> Result<Detection> {
    let value: Value = serde_json::from_str(body)?;
    if value.is_null() {
        return Err(Error::Parse("検出レスポンスが null です".to_string()));
    }
    Ok(parse_detection(&value))
}

/// JSON値から検出結果を取り出す
pub fn parse_detection(value: &Value) -> Detection {
    Detection {
        descriptions: string_items(value.get("descriptions")),
        cropped_images: string_items(value.get("cropped_images"))
            .into_iter()
            .map(ImageRef::new)
            .collect(),
    }
}

/// 配列中の文字列要素だけを順序どおりに取り出す
fn string_items(field: Option<&Value>) -> Vec<String> {
    match field {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// 検出ラベルを `/generate` に渡すテキストへ変換（カンマ区切り）
pub fn labels_to_text(labels: &[String]) -> String {
    labels.join(",")
}

/// 生成テキストを改行で分割して提案リストにする
pub fn split_suggestions(generated_text: &str) -> Vec<String> {
    generated_text.split('\n').map(str::to_string).collect()
}

/// `/generate` レスポンス本文をパースして提案リストを返す
///
/// `generated_text` がない場合はエラー
pub fn parse_suggestion_body(body: &str) -> Result<Vec<String>> {
    let response: SuggestionResponse = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("generated_text を読み取れません: {}", e)))?;
    Ok(split_suggestions(&response.generated_text))
}
