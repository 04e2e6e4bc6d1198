//! Error types for document model operations

use crate::InlineKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Inline item {item} references {kind} {index}, but only {count} declared")]
    InvalidStructure {
        item: usize,
        kind: InlineKind,
        index: usize,
        count: usize,
    },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
