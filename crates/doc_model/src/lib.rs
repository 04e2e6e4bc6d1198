//! Document Model - the read-only document source for layout
//!
//! This crate provides paragraphs of encoded text runs and inline objects,
//! tables, and the document root with its header and footer content.

mod document;
mod error;
mod inline;
mod paragraph;
mod run;
pub mod table;

pub use document::*;
pub use error::*;
pub use inline::*;
pub use paragraph::*;
pub use run::*;
pub use table::*;

impl Document {
    /// Parse a document from its JSON form
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
