//! Font registration
//!
//! The registry resolves a font name and encoding to metrics once and caches
//! the result for the lifetime of the document. Entries are never replaced or
//! removed, so a `FontId` stays valid for every page.

use crate::{FontId, FontKind, FontMetrics, MetricsProvider, Result, TextError};
use doc_model::TextEncoding;
use std::collections::HashMap;
use std::path::PathBuf;

/// Loads metrics for a font name
pub trait FontSource {
    fn load(&self, name: &str, encoding: TextEncoding) -> Result<FontMetrics>;
}

/// In-memory metrics keyed by font name
#[derive(Debug, Clone, Default)]
pub struct StaticFontSource {
    fonts: HashMap<String, FontMetrics>,
}

impl StaticFontSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, metrics: FontMetrics) -> Self {
        self.insert(metrics);
        self
    }

    pub fn insert(&mut self, metrics: FontMetrics) {
        self.fonts.insert(metrics.name.clone(), metrics);
    }
}

impl FontSource for StaticFontSource {
    fn load(&self, name: &str, _encoding: TextEncoding) -> Result<FontMetrics> {
        self.fonts
            .get(name)
            .cloned()
            .ok_or_else(|| TextError::FontNotFound(name.to_string()))
    }
}

/// Metrics stored as `<name>.json` files in a directory
#[derive(Debug, Clone)]
pub struct DirectoryFontSource {
    root: PathBuf,
}

impl DirectoryFontSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FontSource for DirectoryFontSource {
    fn load(&self, name: &str, _encoding: TextEncoding) -> Result<FontMetrics> {
        let path = self.root.join(format!("{}.json", name));
        if !path.exists() {
            return Err(TextError::FontNotFound(name.to_string()));
        }
        let contents = std::fs::read_to_string(&path)?;
        let mut metrics: FontMetrics = serde_json::from_str(&contents)?;
        if metrics.units_per_em == 0 {
            return Err(TextError::InvalidFontData(format!("{}: units_per_em is zero", name)));
        }
        if metrics.name.is_empty() {
            metrics.name = name.to_string();
        }
        Ok(metrics)
    }
}

struct RegisteredFont {
    name: String,
    encoding: TextEncoding,
    metrics: FontMetrics,
}

/// Append-only font cache
pub struct FontRegistry {
    source: Box<dyn FontSource>,
    fonts: Vec<RegisteredFont>,
    index: HashMap<(String, TextEncoding), FontId>,
}

impl FontRegistry {
    pub fn new(source: impl FontSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            fonts: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Resolve a font, loading it on first use.
    ///
    /// A font the source cannot provide is registered with empty metrics so
    /// that every width resolves through the fallback policy.
    pub fn resolve(&mut self, name: &str, encoding: TextEncoding) -> FontId {
        if let Some(&id) = self.index.get(&(name.to_string(), encoding)) {
            return id;
        }

        let metrics = match self.source.load(name, encoding) {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::warn!(font = name, ?encoding, error = %e, "font unavailable, using fallback widths");
                let kind = match encoding {
                    TextEncoding::Legacy => FontKind::Simple,
                    TextEncoding::Utf16 => FontKind::Composite,
                };
                FontMetrics::empty(name).with_kind(kind)
            }
        };

        let id = FontId(self.fonts.len() as u32);
        self.fonts.push(RegisteredFont {
            name: name.to_string(),
            encoding,
            metrics,
        });
        self.index.insert((name.to_string(), encoding), id);
        tracing::debug!(font = name, ?encoding, %id, "font registered");
        id
    }

    pub fn name(&self, id: FontId) -> Option<&str> {
        self.fonts.get(id.0 as usize).map(|f| f.name.as_str())
    }

    pub fn encoding(&self, id: FontId) -> Option<TextEncoding> {
        self.fonts.get(id.0 as usize).map(|f| f.encoding)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl MetricsProvider for FontRegistry {
    fn metrics(&self, font: FontId) -> Option<&FontMetrics> {
        self.fonts.get(font.0 as usize).map(|f| &f.metrics)
    }
}

impl std::fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRegistry")
            .field("fonts", &self.fonts.len())
            .finish()
    }
}

/// Fonts used on one page, in first-use order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFonts {
    ids: Vec<FontId>,
}

impl PageFonts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: FontId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    pub fn contains(&self, id: FontId) -> bool {
        self.ids.contains(&id)
    }

    pub fn as_slice(&self) -> &[FontId] {
        &self.ids
    }

    /// Take the set, leaving it empty for the next page
    pub fn flush(&mut self) -> Vec<FontId> {
        std::mem::take(&mut self.ids)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
