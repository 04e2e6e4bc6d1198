//! Error types for layout engine

use doc_model::{DocModelError, InlineKind};
use text_engine::TextError;
use thiserror::Error;

/// Running out of room is not an error; see `FlowOutcome`
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("paragraph {paragraph}: item {item} references {kind} {index}, but only {count} declared")]
    Structural {
        paragraph: usize,
        item: usize,
        kind: InlineKind,
        index: usize,
        count: usize,
    },

    #[error("Invalid page setup: {0}")]
    InvalidPageSetup(String),

    #[error("Invalid settings: {0}")]
    Config(String),

    #[error("Settings parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document model error: {0}")]
    DocModel(#[from] DocModelError),

    #[error("Text engine error: {0}")]
    Text(#[from] TextError),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
