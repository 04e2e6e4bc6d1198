//! Render item types

use doc_model::{Decorations, TextEncoding};
use layout_engine::{PageGeometry, Point};
use serde::{Deserialize, Serialize};
use text_engine::{CharCodec, FontId, FontKind, LegacyDbcs, Units, Utf16Be};

/// A rectangle in render coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// A box whose top-left corner is `origin`
    pub fn at(origin: Point, width: f32, height: f32) -> Self {
        Self::new(origin.x as f64, origin.y as f64, width as f64, height as f64)
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

impl From<layout_engine::Rect> for Rect {
    fn from(r: layout_engine::Rect) -> Self {
        Self {
            x: r.x as f64,
            y: r.y as f64,
            width: r.width as f64,
            height: r.height as f64,
        }
    }
}

/// A single-script text drawing, positioned on its baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRun {
    /// Readable form of `bytes`, for inspection only
    pub text: String,
    /// The encoded bytes exactly as the layout engine emitted them
    pub bytes: Vec<u8>,
    pub encoding: TextEncoding,
    pub font: FontId,
    /// Font size in points
    pub font_size: f64,
    /// Horizontal scale in percent
    pub scale_pct: u16,
    pub decorations: Decorations,
    /// Extra advance after every character
    pub spacing: f64,
    /// Position (baseline start)
    pub x: f64,
    pub y: f64,
}

/// Render item types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RenderItem {
    /// A glyph run (text)
    GlyphRun(GlyphRun),
    /// An autoshape, drawn by the geometry renderer
    Shape { handle: String, bounds: Rect },
    /// An image
    Image { resource: String, bounds: Rect },
    /// A chart; `spec` is handed to the chart renderer unchanged
    Chart { spec: serde_json::Value, bounds: Rect },
}

impl RenderItem {
    pub fn as_glyph_run(&self) -> Option<&GlyphRun> {
        match self {
            RenderItem::GlyphRun(run) => Some(run),
            _ => None,
        }
    }

    /// Box of an inline object; text has none
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            RenderItem::GlyphRun(_) => None,
            RenderItem::Shape { bounds, .. } | RenderItem::Image { bounds, .. } | RenderItem::Chart { bounds, .. } => {
                Some(*bounds)
            }
        }
    }
}

/// A rendered page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRender {
    pub page_index: u32,
    pub width: f64,
    pub height: f64,
    /// Area inside the margins
    pub body: Rect,
    pub items: Vec<RenderItem>,
    /// Font resources the page uses, as reported when it was closed
    pub fonts: Vec<FontId>,
}

impl PageRender {
    pub fn new(page_index: u32, geometry: &PageGeometry) -> Self {
        Self {
            page_index,
            width: geometry.width as f64,
            height: geometry.height as f64,
            body: geometry.body().into(),
            items: Vec::new(),
            fonts: Vec::new(),
        }
    }

    pub fn glyph_runs(&self) -> impl Iterator<Item = &GlyphRun> {
        self.items.iter().filter_map(RenderItem::as_glyph_run)
    }

    /// Concatenated text of every glyph run, in drawing order
    pub fn text(&self) -> String {
        self.glyph_runs().map(|run| run.text.as_str()).collect()
    }
}

/// A font referenced by id from the pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontEntry {
    pub id: FontId,
    pub name: String,
    /// Simple fonts take single-byte codes, composite fonts multi-byte ones
    #[serde(default)]
    pub kind: FontKind,
}

/// The complete render model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub pages: Vec<PageRender>,
    #[serde(default)]
    pub fonts: Vec<FontEntry>,
}

impl RenderModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self, page: PageRender) {
        self.pages.push(page);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn font_name(&self, id: FontId) -> Option<&str> {
        self.fonts.iter().find(|f| f.id == id).map(|f| f.name.as_str())
    }
}

/// Decode encoded run text into a readable string.
///
/// UTF-16 units map to their scalar values. Legacy narrow bytes map to ASCII;
/// legacy wide units have no table here and become U+FFFD, as do malformed
/// units in either encoding.
pub fn display_text(bytes: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Utf16 => decode_units::<Utf16Be>(bytes, char::from_u32),
        TextEncoding::Legacy => decode_units::<LegacyDbcs>(bytes, |code| {
            u8::try_from(code).ok().filter(u8::is_ascii).map(char::from)
        }),
    }
}

fn decode_units<C: CharCodec>(bytes: &[u8], to_char: impl Fn(u32) -> Option<char>) -> String {
    Units::<C>::new(bytes)
        .map(|(_, unit)| {
            if unit.malformed {
                char::REPLACEMENT_CHARACTER
            } else {
                to_char(unit.code).unwrap_or(char::REPLACEMENT_CHARACTER)
            }
        })
        .collect()
}
