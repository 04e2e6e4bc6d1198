//! Run emitter
//!
//! Turns a finished line fragment into one `draw_text` call and reports how
//! far the cursor moves.

use crate::fonts::RunFonts;
use crate::{ContentWriter, Point, TextDraw};
use doc_model::{Decorations, ListMarker, Run, TextEncoding};
use text_engine::{em_to_points, CharCodec, FontId, LegacyDbcs, PageFonts, Script, Utf16Be};

/// Per-character spacing applied to a fragment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpacingMode {
    Natural,
    /// Fixed extra advance per character, in points
    Explicit(f32),
    /// Spread `slack` points evenly over the fragment's characters
    Justify { slack: f32 },
}

impl SpacingMode {
    /// Spacing for a run: its explicit letter spacing wins over justification
    pub fn for_run(run: &Run, justify_slack: Option<f32>) -> Self {
        match (run.letter_spacing, justify_slack) {
            (Some(spacing), _) => SpacingMode::Explicit(spacing),
            (None, Some(slack)) if slack > 0.0 => SpacingMode::Justify { slack },
            _ => SpacingMode::Natural,
        }
    }

    pub fn per_char(&self, chars: usize) -> f32 {
        match *self {
            SpacingMode::Natural => 0.0,
            SpacingMode::Explicit(spacing) => spacing,
            SpacingMode::Justify { slack } if chars > 0 => slack / chars as f32,
            SpacingMode::Justify { .. } => 0.0,
        }
    }
}

/// The part of a run placed by one breaker call
#[derive(Debug, Clone, Copy)]
pub struct FragmentText<'a> {
    pub bytes: &'a [u8],
    pub font: FontId,
    /// Glyph width in thousandths of an em
    pub glyph_width: u32,
    /// Measured width with tracking, as the breaker counted it
    pub width: u32,
    pub chars: usize,
}

/// Draw one fragment at `origin` (on the baseline) and return the advance.
/// The advance is the measured width the line was broken against, plus any
/// justification slack.
pub fn emit(
    writer: &mut dyn ContentWriter,
    fonts: &mut PageFonts,
    run: &Run,
    fragment: &FragmentText<'_>,
    origin: Point,
    mode: SpacingMode,
) -> f32 {
    let spacing = mode.per_char(fragment.chars);
    let measured = em_to_points(fragment.width, run.size, run.scale());

    if !fragment.bytes.is_empty() {
        fonts.insert(fragment.font);
        writer.draw_text(&TextDraw {
            text: fragment.bytes,
            encoding: run.encoding,
            origin,
            font: fragment.font,
            size: run.size,
            scale_pct: run.scale_pct,
            decorations: run.decorations,
            spacing,
        });
    }

    match mode {
        SpacingMode::Justify { .. } => measured + spacing * fragment.chars as f32,
        _ => measured,
    }
}

/// Draw a run's ruby or overlap text for a run whose first glyph sits at
/// `x` on `baseline`. Ruby text sits one font size above the baseline,
/// overlap text on it.
pub fn emit_annotation(
    writer: &mut dyn ContentWriter,
    fonts: &mut PageFonts,
    run: &Run,
    run_fonts: &RunFonts,
    x: f32,
    baseline: f32,
) {
    let Some(annotation) = run.annotation.as_ref().filter(|_| run.decorations.has_annotation()) else {
        return;
    };
    if annotation.text.is_empty() {
        return;
    }

    let Some(script) = first_script(run.encoding, &annotation.text) else {
        return;
    };
    let font = run_fonts.for_script(script);
    let y = if run.decorations.ruby { baseline - run.size } else { baseline };

    fonts.insert(font);
    writer.draw_text(&TextDraw {
        text: &annotation.text,
        encoding: run.encoding,
        origin: Point::new(x, y),
        font,
        size: annotation.size,
        scale_pct: 100,
        decorations: run.decorations,
        spacing: 0.0,
    });
}

/// Draw a list marker with its first glyph at `origin`
pub fn emit_marker(
    writer: &mut dyn ContentWriter,
    fonts: &mut PageFonts,
    marker: &ListMarker,
    marker_fonts: &RunFonts,
    origin: Point,
) {
    let Some(script) = first_script(marker.encoding, &marker.text) else {
        return;
    };
    let font = marker_fonts.for_script(script);

    fonts.insert(font);
    writer.draw_text(&TextDraw {
        text: &marker.text,
        encoding: marker.encoding,
        origin,
        font,
        size: marker.size,
        scale_pct: 100,
        decorations: Decorations::none(),
        spacing: 0.0,
    });
}

fn first_script(encoding: TextEncoding, bytes: &[u8]) -> Option<Script> {
    match encoding {
        TextEncoding::Legacy => LegacyDbcs::decode(bytes).map(|u| u.script),
        TextEncoding::Utf16 => Utf16Be::decode(bytes).map(|u| u.script),
    }
}
