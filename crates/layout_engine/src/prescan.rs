//! Alignment pre-scan
//!
//! Before the first glyph of a line is drawn, the scanner walks the rest of
//! the paragraph to learn how wide the line's content is (for alignment) and
//! how tall (for the line pitch). It stops at the first hard break, at the
//! first inline object, or as soon as the width is known to exceed the line.

use crate::fonts::RunFonts;
use doc_model::{Alignment, InlineItem, ListMarker, Paragraph, TextEncoding};
use text_engine::{
    em_to_points, tracked_advance, tracking_em, CharCodec, FontRegistry, LegacyDbcs, MetricsProvider, Utf16Be, Units,
};

/// Where the scan starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStart {
    pub item: usize,
    pub offset: usize,
    /// The run at `item` has already started drawing
    pub partial: bool,
    /// The paragraph's first line, which carries the list marker
    pub first_line: bool,
}

/// Why the scan stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStop {
    EndOfParagraph,
    HardBreak,
    InlineObject,
    Overflow,
}

/// Result of scanning one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineScan {
    /// Content width in points, including tab advances and the marker
    pub width: f32,
    /// Tallest run size plus annotation
    pub extent: f32,
    /// Advance reserved for the list marker on this line
    pub marker_advance: f32,
    pub stop: ScanStop,
}

/// Horizontal frame of a line, relative to the flow area's left edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFrame {
    /// Area width
    pub available: f32,
    /// Left indent of this line (first-line indent included)
    pub indent: f32,
    pub right_indent: f32,
}

impl LineFrame {
    /// Width left for content
    pub fn content_width(&self) -> f32 {
        (self.available - self.indent - self.right_indent).max(0.0)
    }

    /// Offset of the first glyph for a line of `width`, never left of the indent
    pub fn start_offset(&self, alignment: Alignment, width: f32) -> f32 {
        let offset = match alignment {
            Alignment::Start | Alignment::Justify => self.indent,
            Alignment::End => self.available - width - self.right_indent,
            Alignment::Center => self.indent + (self.available - width - self.indent - self.right_indent) / 2.0,
        };
        offset.max(self.indent)
    }
}

/// Smallest multiple of `baseline` that holds `extent`, at least one baseline
pub fn line_pitch(extent: f32, baseline: f32) -> f32 {
    if baseline <= 0.0 {
        return extent;
    }
    (extent / baseline).ceil().max(1.0) * baseline
}

/// Scan the line that starts at `start`
pub fn scan_line(
    paragraph: &Paragraph,
    start: ScanStart,
    limit: f32,
    registry: &mut FontRegistry,
) -> LineScan {
    let mut scan = LineScan {
        width: 0.0,
        extent: 0.0,
        marker_advance: 0.0,
        stop: ScanStop::EndOfParagraph,
    };

    if start.first_line {
        if let Some(marker) = &paragraph.properties.list {
            scan.marker_advance = marker_advance(marker, registry);
            scan.width += scan.marker_advance;
            scan.extent = scan.extent.max(marker.size);
        }
    }

    for (index, item) in paragraph.items.iter().enumerate().skip(start.item) {
        let InlineItem::TextRun(run_index) = *item else {
            scan.stop = ScanStop::InlineObject;
            return scan;
        };
        // Structural errors are reported by the flow controller
        let Some(run) = paragraph.runs.get(run_index) else {
            return scan;
        };

        scan.extent = scan.extent.max(run.extent());

        let resumed = index == start.item;
        if let Some(tab) = run.tab_advance {
            if !(resumed && start.partial) {
                scan.width += tab;
            }
        }

        let offset = if resumed { start.offset.min(run.text.len()) } else { 0 };
        let fonts = RunFonts::resolve(registry, &run.fonts, run.encoding);
        let scale = run.scale();
        let text = TextWidth {
            fonts,
            size: run.size,
            scale,
            tracking: run.letter_spacing.map_or(0, |spacing| tracking_em(spacing, run.size, scale)),
        };
        let stop = match run.encoding {
            TextEncoding::Legacy => text.scan::<LegacyDbcs>(&run.text[offset..], &*registry, limit, &mut scan.width),
            TextEncoding::Utf16 => text.scan::<Utf16Be>(&run.text[offset..], &*registry, limit, &mut scan.width),
        };
        if let Some(stop) = stop {
            scan.stop = stop;
            return scan;
        }
    }

    scan
}

/// Advance reserved for a list marker: its width or the hanging indent
pub fn marker_advance(marker: &ListMarker, registry: &mut FontRegistry) -> f32 {
    let fonts = RunFonts::resolve(registry, &marker.fonts, marker.encoding);
    let text = TextWidth {
        fonts,
        size: marker.size,
        scale: 1.0,
        tracking: 0,
    };
    let mut width = 0.0;
    match marker.encoding {
        TextEncoding::Legacy => text.scan::<LegacyDbcs>(&marker.text, &*registry, f32::INFINITY, &mut width),
        TextEncoding::Utf16 => text.scan::<Utf16Be>(&marker.text, &*registry, f32::INFINITY, &mut width),
    };
    width.max(marker.hanging)
}

struct TextWidth {
    fonts: RunFonts,
    size: f32,
    scale: f32,
    /// Per-unit tracking in thousandths of an em, as the breaker applies it
    tracking: i32,
}

impl TextWidth {
    /// Add the width of `bytes` to `width`. Units are summed in em the way the
    /// line breaker counts them and converted to points once per run.
    fn scan<C: CharCodec>(
        &self,
        bytes: &[u8],
        provider: &dyn MetricsProvider,
        limit: f32,
        width: &mut f32,
    ) -> Option<ScanStop> {
        let before = *width;
        let mut em = 0u32;
        for (_, unit) in Units::<C>::new(bytes) {
            if !unit.malformed && C::is_hard_break(unit.code) {
                return Some(ScanStop::HardBreak);
            }
            let font = self.fonts.for_script(unit.script);
            em += tracked_advance(provider.width(font, &unit), self.tracking);
            *width = before + em_to_points(em, self.size, self.scale);
            if *width > limit {
                return Some(ScanStop::Overflow);
            }
        }
        None
    }
}
