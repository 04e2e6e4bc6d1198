//! Layout settings
//!
//! Settings are plain serde structs with defaults for every field, so a
//! settings file only needs the values it changes.

use crate::{LayoutError, Margins, PageGeometry, Rect, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Standard page sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    /// US Letter (8.5" x 11")
    #[default]
    Letter,
    /// A4 (210mm x 297mm)
    A4,
    /// Legal (8.5" x 14")
    Legal,
    /// Custom size in points
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// Get the width and height in points
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),   // 8.5" x 11" at 72 dpi
            PageSize::A4 => (595.276, 841.89),    // 210mm x 297mm at 72 dpi
            PageSize::Legal => (612.0, 1008.0),   // 8.5" x 14" at 72 dpi
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Header/footer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderFooterConfig {
    /// Distance from the top page edge to the header; the header area ends at
    /// the top margin
    pub header_margin: f32,
    /// Height of the footer area, which starts at the bottom margin
    pub footer_height: f32,
    /// Whether to include header on first page
    pub header_on_first_page: bool,
    /// Whether to include footer on first page
    pub footer_on_first_page: bool,
}

impl Default for HeaderFooterConfig {
    fn default() -> Self {
        Self {
            header_margin: 36.0, // 0.5 inch from edge
            footer_height: 36.0, // 0.5 inch
            header_on_first_page: true,
            footer_on_first_page: true,
        }
    }
}

/// Page layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Page size; the page dimensions always come from it
    pub page_size: PageSize,
    pub margins: Margins,
    /// Header and footer configuration
    pub header_footer: HeaderFooterConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::letter()
    }
}

impl PageConfig {
    fn sized(page_size: PageSize) -> Self {
        Self {
            page_size,
            margins: Margins::default(),
            header_footer: HeaderFooterConfig::default(),
        }
    }

    /// Create a Letter-sized page configuration
    pub fn letter() -> Self {
        Self::sized(PageSize::Letter)
    }

    /// Create an A4-sized page configuration
    pub fn a4() -> Self {
        Self::sized(PageSize::A4)
    }

    /// Create a custom page configuration
    pub fn custom(width: f32, height: f32) -> Self {
        Self::sized(PageSize::Custom { width, height })
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Page width in points
    pub fn page_width(&self) -> f32 {
        self.page_size.dimensions().0
    }

    /// Page height in points
    pub fn page_height(&self) -> f32 {
        self.page_size.dimensions().1
    }

    /// Get the content area width (excluding margins)
    pub fn content_width(&self) -> f32 {
        self.page_width() - self.margins.left - self.margins.right
    }

    /// Get the content area height (excluding margins)
    pub fn content_height(&self) -> f32 {
        self.page_height() - self.margins.top - self.margins.bottom
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry {
            width: self.page_width(),
            height: self.page_height(),
            margins: self.margins,
        }
    }

    /// Header area for a page, or `None` when the page has no header
    pub fn header_area(&self, page_index: usize) -> Option<Rect> {
        let hf = &self.header_footer;
        if page_index == 0 && !hf.header_on_first_page {
            return None;
        }
        let height = self.margins.top - hf.header_margin;
        (height > 0.0).then(|| Rect::new(self.margins.left, hf.header_margin, self.content_width(), height))
    }

    /// Footer area for a page, or `None` when the page has no footer
    pub fn footer_area(&self, page_index: usize) -> Option<Rect> {
        let hf = &self.header_footer;
        if page_index == 0 && !hf.footer_on_first_page {
            return None;
        }
        (hf.footer_height > 0.0).then(|| {
            Rect::new(
                self.margins.left,
                self.page_height() - self.margins.bottom,
                self.content_width(),
                hf.footer_height,
            )
        })
    }

    /// Reject configurations that leave no room for body text
    pub fn validate(&self) -> Result<()> {
        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return Err(LayoutError::InvalidPageSetup(format!(
                "body area is {}x{} after margins",
                self.content_width(),
                self.content_height()
            )));
        }
        Ok(())
    }
}

/// Settings for one layout run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub page: PageConfig,
    /// Line pitch unit for paragraphs that declare none, in points
    pub default_baseline: f32,
    /// Upper bound on pages produced by one pagination run
    pub max_pages: usize,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            default_baseline: 14.0,
            max_pages: 10_000,
        }
    }
}

impl LayoutSettings {
    /// Parse settings from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        if settings.default_baseline <= 0.0 {
            return Err(LayoutError::Config(format!(
                "default_baseline must be positive, got {}",
                settings.default_baseline
            )));
        }
        Ok(settings)
    }

    /// Load settings from a file, or return defaults if it doesn't exist or
    /// can't be parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match Self::from_json_str(&content) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!("Failed to parse layout settings {}, using defaults: {}", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    pub fn with_page(mut self, page: PageConfig) -> Self {
        self.page = page;
        self
    }

    pub fn with_default_baseline(mut self, baseline: f32) -> Self {
        self.default_baseline = baseline;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_config_letter() {
        let config = PageConfig::letter();
        assert_eq!(config.page_width(), 612.0);
        assert_eq!(config.page_height(), 792.0);
        assert_eq!(config.content_width(), 468.0); // 612 - 72 - 72
        assert_eq!(config.content_height(), 648.0); // 792 - 72 - 72
    }

    #[test]
    fn test_page_config_a4() {
        let config = PageConfig::a4();
        assert!((config.page_width() - 595.276).abs() < 0.01);
        assert!((config.page_height() - 841.89).abs() < 0.01);
    }

    #[test]
    fn test_header_and_footer_areas() {
        let config = PageConfig::letter();
        let header = config.header_area(0).unwrap();
        assert_eq!(header.y, 36.0);
        assert_eq!(header.bottom(), 72.0);

        let footer = config.footer_area(3).unwrap();
        assert_eq!(footer.y, 720.0);
        assert_eq!(footer.height, 36.0);
    }

    #[test]
    fn test_first_page_switches() {
        let mut config = PageConfig::letter();
        config.header_footer.header_on_first_page = false;
        assert!(config.header_area(0).is_none());
        assert!(config.header_area(1).is_some());
        assert!(config.footer_area(0).is_some());
    }

    #[test]
    fn test_invalid_margins_rejected() {
        let config = PageConfig::custom(100.0, 100.0).with_margins(Margins::uniform(60.0));
        assert!(matches!(config.validate(), Err(LayoutError::InvalidPageSetup(_))));
    }

    #[test]
    fn test_partial_settings_json_uses_defaults() {
        let settings = LayoutSettings::from_json_str(r#"{"default_baseline": 18.0}"#).unwrap();
        assert_eq!(settings.default_baseline, 18.0);
        assert_eq!(settings.page, PageConfig::letter());
        assert_eq!(settings.max_pages, 10_000);
    }

    #[test]
    fn test_custom_page_size_from_json() {
        let json = r#"{"page": {"page_size": {"Custom": {"width": 300.0, "height": 400.0}}}}"#;
        let settings = LayoutSettings::from_json_str(json).unwrap();
        assert_eq!(settings.page.page_size.dimensions(), (300.0, 400.0));
        assert_eq!(settings.page.margins, Margins::default());
    }

    #[test]
    fn test_named_page_size_sets_dimensions() {
        let settings = LayoutSettings::from_json_str(r#"{"page": {"page_size": "A4"}}"#).unwrap();
        let geometry = settings.page.geometry();
        assert_eq!((geometry.width, geometry.height), PageSize::A4.dimensions());
        assert_eq!(settings.page.page_width(), 595.276);
        assert_eq!(settings.page.content_width(), 595.276 - 72.0 - 72.0);
    }

    #[test]
    fn test_non_positive_baseline_rejected() {
        let result = LayoutSettings::from_json_str(r#"{"default_baseline": 0.0}"#);
        assert!(matches!(result, Err(LayoutError::Config(_))));
    }

    #[test]
    fn test_load_missing_and_malformed_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = LayoutSettings::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(missing, LayoutSettings::default());

        let broken = dir.path().join("layout.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert_eq!(LayoutSettings::load(&broken).unwrap(), LayoutSettings::default());

        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{"max_pages": 3}"#).unwrap();
        assert_eq!(LayoutSettings::load(&good).unwrap().max_pages, 3);
    }
}
