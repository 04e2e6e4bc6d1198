//! Inline items - the ordered content of a paragraph
//!
//! A paragraph stores its runs and inline objects in separate tables; the
//! `InlineItem` sequence references them by index in reading order. Geometry,
//! image data and chart definitions are opaque to the layout engine and are
//! handed back unchanged to the content writer.

use serde::{Deserialize, Serialize};

/// Opaque handle of an autoshape owned by the geometry renderer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeHandle(pub String);

impl ShapeHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShapeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An inline autoshape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRef {
    pub handle: ShapeHandle,
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
}

/// An inline picture, referenced by its resource id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub resource: String,
    pub width: f32,
    pub height: f32,
}

/// An inline chart; `spec` is the chart definition understood by the chart renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRef {
    pub spec: serde_json::Value,
    pub width: f32,
    pub height: f32,
}

/// Kinds of inline item, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineKind {
    TextRun,
    Shape,
    Image,
    Chart,
}

impl std::fmt::Display for InlineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InlineKind::TextRun => "run",
            InlineKind::Shape => "shape",
            InlineKind::Image => "image",
            InlineKind::Chart => "chart",
        };
        f.write_str(name)
    }
}

/// One entry of a paragraph's content, in reading order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index")]
pub enum InlineItem {
    /// Index into `Paragraph::runs`
    TextRun(usize),
    /// Index into `Paragraph::shapes`
    Shape(usize),
    /// Index into `Paragraph::images`
    Image(usize),
    /// Index into `Paragraph::charts`
    Chart(usize),
}

impl InlineItem {
    pub fn kind(&self) -> InlineKind {
        match self {
            InlineItem::TextRun(_) => InlineKind::TextRun,
            InlineItem::Shape(_) => InlineKind::Shape,
            InlineItem::Image(_) => InlineKind::Image,
            InlineItem::Chart(_) => InlineKind::Chart,
        }
    }

    /// The referenced table index
    pub fn index(&self) -> usize {
        match *self {
            InlineItem::TextRun(i)
            | InlineItem::Shape(i)
            | InlineItem::Image(i)
            | InlineItem::Chart(i) => i,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, InlineItem::TextRun(_))
    }
}
