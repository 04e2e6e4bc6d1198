//! Text Engine - character classification and width metrics
//!
//! This crate decodes encoded run text into character units, classifies
//! them by script and line-break punctuation class, and resolves their
//! widths through cached per-font metrics.
//!
//! # Modules
//!
//! - `script`: Character-unit decoding and Narrow/Wide classification
//! - `punctuation`: Exact line-break punctuation tables
//! - `font`: Font identifiers and width tables
//! - `metrics`: Width lookup with the fallback policy
//! - `registry`: Append-only font cache and per-page font sets

mod error;
mod font;
mod metrics;
pub mod punctuation;
mod registry;
mod script;

pub use error::*;
pub use font::*;
pub use metrics::*;
pub use registry::*;
pub use script::*;
