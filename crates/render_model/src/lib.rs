//! Render Model - a recorded display list of laid-out pages
//!
//! This crate provides a [`Recorder`] that implements the layout engine's
//! content-writer and page-sink seams and keeps every drawing call as a
//! serializable [`RenderItem`], plus a converter that paginates a document
//! straight into a [`RenderModel`].

mod converter;
mod error;
mod recorder;
mod render_item;

pub use converter::*;
pub use error::*;
pub use recorder::*;
pub use render_item::*;
