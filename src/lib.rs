pub mod app;
pub mod camera;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod interactive;
pub mod progress;
pub mod screen;
pub mod view;

pub use compost_diagnose_common::{Detection, ImageRef};
