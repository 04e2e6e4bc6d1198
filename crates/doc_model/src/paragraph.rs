//! Paragraph - an ordered sequence of inline items plus paragraph properties

use crate::{ChartRef, DocModelError, FontPair, ImageRef, InlineItem, InlineKind, Result, Run, ShapeRef, TextEncoding};
use serde::{Deserialize, Serialize};

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
    /// Positioned like `Start`; wrapped lines are stretched to the full width
    Justify,
}

/// A bullet or number drawn before the first line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListMarker {
    /// Encoded marker text
    pub text: Vec<u8>,
    pub encoding: TextEncoding,
    pub fonts: FontPair,
    /// Font size in points
    pub size: f32,
    /// Minimum advance reserved for the marker in points
    pub hanging: f32,
}

impl ListMarker {
    /// A UTF-16 bullet marker
    pub fn bullet(text: &str, fonts: FontPair, size: f32, hanging: f32) -> Self {
        Self {
            text: TextEncoding::Utf16.encode_str(text),
            encoding: TextEncoding::Utf16,
            fonts,
            size,
            hanging,
        }
    }
}

/// Paragraph-level layout properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphProperties {
    pub alignment: Alignment,
    /// Indent of the first line in points
    pub first_line_indent: f32,
    /// Indent of every following line in points
    pub indent: f32,
    /// Right indent in points
    pub right_indent: f32,
    /// Minimum line pitch in points; line pitch is always a multiple of it.
    /// Zero means "use the layout default".
    pub baseline: f32,
    /// Bullet/number marker
    pub list: Option<ListMarker>,
    /// Space before the paragraph in points
    pub space_before: f32,
    /// Space after the paragraph in points
    pub space_after: f32,
}

impl Default for ParagraphProperties {
    fn default() -> Self {
        Self {
            alignment: Alignment::Start,
            first_line_indent: 0.0,
            indent: 0.0,
            right_indent: 0.0,
            baseline: 0.0,
            list: None,
            space_before: 0.0,
            space_after: 0.0,
        }
    }
}

/// A paragraph: inline items referencing the run and object tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Content in reading order
    pub items: Vec<InlineItem>,
    pub runs: Vec<Run>,
    #[serde(default)]
    pub shapes: Vec<ShapeRef>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub charts: Vec<ChartRef>,
    #[serde(default)]
    pub properties: ParagraphProperties,
}

impl Paragraph {
    /// Create a new empty paragraph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty paragraph with specific properties
    pub fn with_properties(properties: ParagraphProperties) -> Self {
        Self {
            properties,
            ..Self::default()
        }
    }

    /// Append a run and reference it
    pub fn push_run(&mut self, run: Run) -> &mut Self {
        self.items.push(InlineItem::TextRun(self.runs.len()));
        self.runs.push(run);
        self
    }

    /// Append a shape and reference it
    pub fn push_shape(&mut self, shape: ShapeRef) -> &mut Self {
        self.items.push(InlineItem::Shape(self.shapes.len()));
        self.shapes.push(shape);
        self
    }

    /// Append an image and reference it
    pub fn push_image(&mut self, image: ImageRef) -> &mut Self {
        self.items.push(InlineItem::Image(self.images.len()));
        self.images.push(image);
        self
    }

    /// Append a chart and reference it
    pub fn push_chart(&mut self, chart: ChartRef) -> &mut Self {
        self.items.push(InlineItem::Chart(self.charts.len()));
        self.charts.push(chart);
        self
    }

    /// Builder form of `push_run`
    pub fn with_run(mut self, run: Run) -> Self {
        self.push_run(run);
        self
    }

    /// Declared table size for an item kind
    pub fn declared_count(&self, kind: InlineKind) -> usize {
        match kind {
            InlineKind::TextRun => self.runs.len(),
            InlineKind::Shape => self.shapes.len(),
            InlineKind::Image => self.images.len(),
            InlineKind::Chart => self.charts.len(),
        }
    }

    /// Check that every inline item references an existing table entry
    pub fn validate(&self) -> Result<()> {
        for (position, item) in self.items.iter().enumerate() {
            let count = self.declared_count(item.kind());
            if item.index() >= count {
                return Err(DocModelError::InvalidStructure {
                    item: position,
                    kind: item.kind(),
                    index: item.index(),
                    count,
                });
            }
        }
        Ok(())
    }

    /// Whether the paragraph has no content at all
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
