//! Compost Diagnose Common Library
//!
//! 検出・提案エンドポイントのワイヤ型とパーサー（フロントエンド非依存）

pub mod error;
pub mod parser;
pub mod types;

pub use error::{Error, Result};
pub use parser::{
    labels_to_text, parse_detection, parse_detection_body, parse_suggestion_body,
    split_suggestions,
};
pub use types::{Detection, ImageRef, SuggestionRequest, SuggestionResponse};
