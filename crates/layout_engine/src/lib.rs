//! Layout Engine - line breaking, paragraph flow and pagination
//!
//! This crate turns the document model into positioned drawing calls. Text is
//! broken into lines under script-sensitive punctuation rules, each line is
//! pre-scanned for alignment and line pitch, and the paginator drives the
//! paragraph flow one page at a time, suspending and resuming mid-paragraph.
//! Output goes through the [`ContentWriter`] and [`PageSink`] traits.

mod config;
mod emitter;
mod error;
mod flow;
mod flow_state;
mod fonts;
mod geometry;
mod line_breaker;
mod output;
mod paginator;
mod prescan;
mod table_flow;

pub use config::*;
pub use emitter::*;
pub use error::*;
pub use flow::{FlowOutcome, FlowPhase, LayoutContext, ParagraphFlow};
pub use flow_state::*;
pub use fonts::*;
pub use geometry::*;
pub use line_breaker::*;
pub use output::*;
pub use paginator::*;
pub use prescan::*;
pub use table_flow::*;
