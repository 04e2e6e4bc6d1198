//! Output seams
//!
//! The layout engine never writes a page-description format itself. It calls
//! a [`ContentWriter`] for every drawing operation, in final visual order, and
//! a [`PageSink`] to open and close pages.

use crate::{PageGeometry, Point};
use doc_model::{Decorations, ImageRef, ShapeHandle, TextEncoding};
use serde::{Deserialize, Serialize};
use text_engine::FontId;

/// One text drawing operation
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw<'a> {
    /// Encoded bytes, single script
    pub text: &'a [u8],
    pub encoding: TextEncoding,
    /// Baseline origin of the first glyph
    pub origin: Point,
    pub font: FontId,
    /// Font size in points
    pub size: f32,
    /// Horizontal scale in percent
    pub scale_pct: u16,
    pub decorations: Decorations,
    /// Extra advance after every character, in points
    pub spacing: f32,
}

/// Receives drawing operations for the currently open page
pub trait ContentWriter {
    fn draw_text(&mut self, text: &TextDraw<'_>);

    fn draw_shape(&mut self, handle: &ShapeHandle, origin: Point, width: f32, height: f32);

    fn draw_image(&mut self, image: &ImageRef, origin: Point, width: f32, height: f32);

    fn draw_chart(&mut self, spec: &serde_json::Value, origin: Point, width: f32, height: f32);
}

/// Handle of a page opened on a [`PageSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageHandle(pub usize);

/// Opens and closes pages
pub trait PageSink {
    fn open_page(&mut self, geometry: &PageGeometry) -> PageHandle;

    /// Called exactly once per opened page with the fonts the page used
    fn close_page(&mut self, page: PageHandle, fonts: &[FontId]);
}

/// Discards everything; used to measure content before drawing it
#[derive(Debug, Clone, Copy, Default)]
pub struct NullWriter;

impl ContentWriter for NullWriter {
    fn draw_text(&mut self, _text: &TextDraw<'_>) {}

    fn draw_shape(&mut self, _handle: &ShapeHandle, _origin: Point, _width: f32, _height: f32) {}

    fn draw_image(&mut self, _image: &ImageRef, _origin: Point, _width: f32, _height: f32) {}

    fn draw_chart(&mut self, _spec: &serde_json::Value, _origin: Point, _width: f32, _height: f32) {}
}
