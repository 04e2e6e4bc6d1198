//! Error types for render model

use layout_engine::LayoutError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Page {0} was opened but never closed")]
    UnclosedPage(usize),

    #[error("Page sink misuse: {0}")]
    InvalidLayout(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
