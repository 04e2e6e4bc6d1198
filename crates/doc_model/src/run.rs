//! Text run - an immutable request to render encoded text in one font pair

use serde::{Deserialize, Serialize};

/// Storage encoding of run text
///
/// Run text is kept exactly as it was imported; the layout engine classifies
/// and measures the encoded bytes directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    /// Legacy double-byte code page (single-byte Latin, two-byte East-Asian)
    #[default]
    Legacy,
    /// UTF-16, big-endian byte pairs
    Utf16,
}

impl TextEncoding {
    /// Encode a Rust string into this storage encoding.
    ///
    /// Only meaningful for `Utf16` and for ASCII text in `Legacy`; non-ASCII
    /// characters in `Legacy` are replaced with `?` since the code page tables
    /// live outside this crate.
    pub fn encode_str(&self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Legacy => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
            TextEncoding::Utf16 => text.encode_utf16().flat_map(|u| u.to_be_bytes()).collect(),
        }
    }
}

/// The two fonts a run may draw with
///
/// Narrow (Latin) text is drawn with `primary`, wide (East-Asian) text with
/// `fallback`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontPair {
    pub primary: String,
    pub fallback: String,
}

impl FontPair {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
        }
    }

    /// Use the same face for both scripts
    pub fn single(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            primary: name.clone(),
            fallback: name,
        }
    }
}

impl Default for FontPair {
    fn default() -> Self {
        Self::new("Helvetica", "Batang")
    }
}

/// Character decoration flags, passed through to the content writer untouched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Decorations {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub highlight: bool,
    /// Annotation text is drawn above the run
    pub ruby: bool,
    /// Annotation text is drawn over the run
    pub overlap: bool,
    pub boxed: bool,
    pub double_line: bool,
    pub embossed: bool,
    pub hyperlink: bool,
}

impl Decorations {
    /// No decoration at all
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Whether an annotation (ruby or overlap) is active
    pub fn has_annotation(&self) -> bool {
        self.ruby || self.overlap
    }
}

/// Auxiliary text rendered above (ruby) or over (overlap) a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Encoded in the owning run's encoding
    pub text: Vec<u8>,
    /// Font size in points
    pub size: f32,
}

/// A text run - encoded text with a single set of character properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Encoded text bytes
    pub text: Vec<u8>,
    /// Encoding of `text` and of the annotation text
    pub encoding: TextEncoding,
    /// Primary (narrow) and fallback (wide) font names
    pub fonts: FontPair,
    /// Font size in points
    pub size: f32,
    /// Horizontal scale in percent (100 = natural width)
    pub scale_pct: u16,
    /// Decoration flags
    #[serde(default)]
    pub decorations: Decorations,
    /// Fixed advance in points applied before the first glyph
    #[serde(default)]
    pub tab_advance: Option<f32>,
    /// Extra spacing per character in points (may be negative)
    #[serde(default)]
    pub letter_spacing: Option<f32>,
    /// Ruby/overlap annotation
    #[serde(default)]
    pub annotation: Option<Annotation>,
}

impl Run {
    /// Create a run from already-encoded bytes
    pub fn new(text: impl Into<Vec<u8>>, encoding: TextEncoding, fonts: FontPair, size: f32) -> Self {
        Self {
            text: text.into(),
            encoding,
            fonts,
            size,
            scale_pct: 100,
            decorations: Decorations::default(),
            tab_advance: None,
            letter_spacing: None,
            annotation: None,
        }
    }

    /// Create a run by encoding a Rust string as UTF-16
    pub fn utf16(text: &str, fonts: FontPair, size: f32) -> Self {
        Self::new(TextEncoding::Utf16.encode_str(text), TextEncoding::Utf16, fonts, size)
    }

    /// Create a legacy-encoded run from raw code page bytes
    pub fn legacy(bytes: impl Into<Vec<u8>>, fonts: FontPair, size: f32) -> Self {
        Self::new(bytes, TextEncoding::Legacy, fonts, size)
    }

    pub fn with_scale(mut self, scale_pct: u16) -> Self {
        self.scale_pct = scale_pct;
        self
    }

    pub fn with_decorations(mut self, decorations: Decorations) -> Self {
        self.decorations = decorations;
        self
    }

    pub fn with_tab_advance(mut self, advance: f32) -> Self {
        self.tab_advance = Some(advance);
        self
    }

    pub fn with_letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = Some(spacing);
        self
    }

    /// Attach a ruby annotation (sets the `ruby` decoration)
    pub fn with_ruby(mut self, text: impl Into<Vec<u8>>, size: f32) -> Self {
        self.decorations.ruby = true;
        self.annotation = Some(Annotation {
            text: text.into(),
            size,
        });
        self
    }

    /// Attach an overlap annotation (sets the `overlap` decoration)
    pub fn with_overlap(mut self, text: impl Into<Vec<u8>>, size: f32) -> Self {
        self.decorations.overlap = true;
        self.annotation = Some(Annotation {
            text: text.into(),
            size,
        });
        self
    }

    /// Size of the active annotation, or zero
    pub fn annotation_size(&self) -> f32 {
        match &self.annotation {
            Some(annotation) if self.decorations.has_annotation() => annotation.size,
            _ => 0.0,
        }
    }

    /// Vertical extent this run needs on a line: font size plus annotation
    pub fn extent(&self) -> f32 {
        self.size + self.annotation_size()
    }

    /// Horizontal scale as a factor
    pub fn scale(&self) -> f32 {
        self.scale_pct as f32 / 100.0
    }

    /// Length of the encoded text in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
