//! Text metrics calculations

use crate::{CharCodec, CharUnit, FontId, FontKind, FontMetrics, Units};

/// Width of a narrow unit missing from its font's table (half box)
pub const NARROW_FALLBACK_WIDTH: u16 = 500;

/// Width of a wide unit missing from its font's glyph map (full box)
pub const WIDE_FALLBACK_WIDTH: u16 = 1000;

/// Source of per-font widths, in thousandths of an em
pub trait MetricsProvider {
    fn metrics(&self, font: FontId) -> Option<&FontMetrics>;

    /// Width of one unit; gaps resolve through the fallback policy
    fn width(&self, font: FontId, unit: &CharUnit) -> u16 {
        match self.metrics(font) {
            Some(metrics) => metrics.width(unit),
            None => crate::fallback_width(unit),
        }
    }

    fn font_type(&self, font: FontId) -> FontKind {
        self.metrics(font).map(|m| m.kind).unwrap_or_default()
    }
}

/// Sum of unit widths over an encoded byte slice
pub fn measure<C: CharCodec>(provider: &dyn MetricsProvider, font: FontId, bytes: &[u8]) -> u32 {
    Units::<C>::new(bytes)
        .map(|(_, unit)| provider.width(font, &unit) as u32)
        .sum()
}

/// Convert thousandths of an em to points
pub fn em_to_points(width: u32, font_size: f32, scale: f32) -> f32 {
    width as f32 / 1000.0 * font_size * scale
}

/// Slack allowed when flooring a point width back to em units. A width that
/// came from `em_to_points` must convert back to the same integer.
const EM_ROUNDING_TOLERANCE: f32 = 0.05;

/// Convert points back to thousandths of an em, rounding down
pub fn points_to_em(points: f32, font_size: f32, scale: f32) -> u32 {
    let per_em = font_size * scale;
    if per_em <= 0.0 || points <= 0.0 {
        return 0;
    }
    (points / per_em * 1000.0 + EM_ROUNDING_TOLERANCE).floor() as u32
}

/// Letter spacing in points as per-unit tracking in thousandths of an em
pub fn tracking_em(spacing: f32, font_size: f32, scale: f32) -> i32 {
    let per_em = font_size * scale;
    if per_em <= 0.0 {
        return 0;
    }
    (spacing / per_em * 1000.0).round() as i32
}

/// Advance of one unit with tracking applied, never negative
pub fn tracked_advance(glyph: u16, tracking: i32) -> u32 {
    (glyph as i64 + tracking as i64).max(0) as u32
}
