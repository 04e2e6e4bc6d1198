//! Font identifiers and per-font width tables

use crate::metrics::{NARROW_FALLBACK_WIDTH, WIDE_FALLBACK_WIDTH};
use crate::{CharUnit, Script};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a font resolved through the [`FontRegistry`](crate::FontRegistry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontId(pub u32);

impl std::fmt::Display for FontId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "F{}", self.0)
    }
}

/// How the page-description writer addresses glyphs of a font
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontKind {
    /// Single-byte codes, one width table
    #[default]
    Simple,
    /// Multi-byte codes mapped to glyphs
    Composite,
}

/// Font metrics: vertical metrics plus the width tables used for line breaking
///
/// Widths are in thousandths of an em.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontMetrics {
    pub name: String,
    pub kind: FontKind,
    /// Units per em
    pub units_per_em: u16,
    /// Ascender (positive)
    pub ascender: i16,
    /// Descender (negative)
    pub descender: i16,
    /// First code covered by `widths`
    pub first_char: u32,
    /// Narrow widths indexed by `code - first_char`
    pub widths: Vec<u16>,
    /// Wide widths keyed by character code
    pub glyph_widths: HashMap<u32, u16>,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: FontKind::Simple,
            units_per_em: 1000,
            ascender: 800,
            descender: -200,
            first_char: 0,
            widths: Vec::new(),
            glyph_widths: HashMap::new(),
        }
    }
}

impl FontMetrics {
    /// Metrics with no width entries; every lookup resolves to the fallback widths
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Every ASCII code gets the same narrow width
    pub fn monospace(name: impl Into<String>, kind: FontKind, width: u16) -> Self {
        Self {
            name: name.into(),
            kind,
            widths: vec![width; 0x80],
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: FontKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the narrow width of one code, growing the table as needed
    pub fn with_narrow_width(mut self, code: u32, width: u16) -> Self {
        if code < self.first_char {
            return self;
        }
        let slot = (code - self.first_char) as usize;
        if self.widths.len() <= slot {
            self.widths.resize(slot + 1, NARROW_FALLBACK_WIDTH);
        }
        self.widths[slot] = width;
        self
    }

    pub fn with_glyph_width(mut self, code: u32, width: u16) -> Self {
        self.glyph_widths.insert(code, width);
        self
    }

    /// Tabulated width of a unit, or `None` when the table has no entry
    pub fn lookup(&self, unit: &CharUnit) -> Option<u16> {
        if unit.malformed {
            return None;
        }
        match unit.script {
            Script::Narrow => {
                let slot = unit.code.checked_sub(self.first_char)?;
                self.widths.get(slot as usize).copied()
            }
            Script::Wide => self.glyph_widths.get(&unit.code).copied(),
        }
    }

    /// Width of a unit with the fallback policy applied
    pub fn width(&self, unit: &CharUnit) -> u16 {
        match self.lookup(unit) {
            Some(width) => width,
            None => {
                let fallback = fallback_width(unit);
                tracing::trace!(
                    font = %self.name,
                    code = unit.code,
                    malformed = unit.malformed,
                    width = fallback,
                    "width table gap, using fallback"
                );
                fallback
            }
        }
    }
}

/// Half box for narrow and malformed units, full box for wide ones
pub fn fallback_width(unit: &CharUnit) -> u16 {
    match unit.script {
        Script::Wide if !unit.malformed => WIDE_FALLBACK_WIDTH,
        _ => NARROW_FALLBACK_WIDTH,
    }
}
