//! Line Breaking Algorithm
//!
//! Greedy fill over encoded run text, one font and one script per call:
//! 1. Accumulate units while the width budget holds; a hard break (CR, LF and
//!    its complementary pair) ends the line immediately
//! 2. A closing-class unit at the overflow point is pulled onto the line,
//!    together with every closing-class unit after it (they hang past the limit)
//! 3. Otherwise the boundary walks back over trailing opening-class units and,
//!    between two alphanumeric units, over the whole trailing word
//! 4. When nothing fits the fragment is empty; the caller decides how to make
//!    progress (`break_forced`)
//!
//! Widths are thousandths of an em of the segment's font. The breaker never
//! loops internally and never reads past the end of its buffer.

use std::marker::PhantomData;
use std::ops::Range;
use text_engine::punctuation::completes_break_pair;
use text_engine::{tracked_advance, CharCodec, CharUnit, FontId, MetricsProvider};

/// Why a fragment ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentEnding {
    /// A hard line break was consumed
    HardBreak,
    /// Line full; broken at an admissible, possibly rule-adjusted, boundary
    Wrap,
    /// Broken exactly at the width limit
    WidthExhausted,
    /// The input ran out while the line still had room
    EndOfInput,
}

impl FragmentEnding {
    /// Whether the line is complete after this fragment
    pub fn ends_line(&self) -> bool {
        !matches!(self, FragmentEnding::EndOfInput)
    }

    /// Whether the line ended because it was full
    pub fn is_wrap(&self) -> bool {
        matches!(self, FragmentEnding::Wrap | FragmentEnding::WidthExhausted)
    }
}

/// Budget and rule switches for one breaker call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakOptions {
    /// Width budget in thousandths of an em
    pub limit: u32,
    /// Extra advance per unit in thousandths of an em
    pub tracking: i32,
    /// Push a trailing word to the next line instead of splitting it
    pub avoid_word_split: bool,
}

impl BreakOptions {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            tracking: 0,
            avoid_word_split: true,
        }
    }

    pub fn with_tracking(mut self, tracking: i32) -> Self {
        self.tracking = tracking;
        self
    }
}

/// The result of one breaker call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFragment {
    /// Bytes to draw; hard-break terminators are not included
    pub range: Range<usize>,
    /// Stream position after the call
    pub next: usize,
    /// Measured width including tracking and any hanging suffix
    pub width: u32,
    /// Width of the glyphs alone
    pub glyph_width: u32,
    /// Width of closing-class units hanging past the limit
    pub hang_width: u32,
    /// Number of units in `range`
    pub chars: usize,
    pub ending: FragmentEnding,
}

impl LineFragment {
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Width that counts against the budget
    pub fn fitted_width(&self) -> u32 {
        self.width - self.hang_width
    }
}

#[derive(Debug, Clone, Copy)]
struct Placed {
    at: usize,
    unit: CharUnit,
    glyph: u32,
    advance: u32,
    hanging: bool,
}

impl Placed {
    fn end(&self) -> usize {
        self.at + self.unit.len
    }
}

/// Breaks one encoded byte stream measured in one font
pub struct LineBreaker<'a, C> {
    bytes: &'a [u8],
    provider: &'a dyn MetricsProvider,
    font: FontId,
    _codec: PhantomData<C>,
}

impl<'a, C: CharCodec> LineBreaker<'a, C> {
    pub fn new(bytes: &'a [u8], provider: &'a dyn MetricsProvider, font: FontId) -> Self {
        Self {
            bytes,
            provider,
            font,
            _codec: PhantomData,
        }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn font(&self) -> FontId {
        self.font
    }

    fn unit_at(&self, pos: usize) -> Option<CharUnit> {
        C::decode(self.bytes.get(pos..)?)
    }

    fn measure(&self, unit: &CharUnit, tracking: i32) -> (u32, u32) {
        let glyph = self.provider.width(self.font, unit);
        (glyph as u32, tracked_advance(glyph, tracking))
    }

    fn place(&self, at: usize, unit: CharUnit, tracking: i32, hanging: bool) -> Placed {
        let (glyph, advance) = self.measure(&unit, tracking);
        Placed {
            at,
            unit,
            glyph,
            advance,
            hanging,
        }
    }

    /// Position after a hard break unit and its complementary partner
    fn skip_break(&self, pos: usize, unit: CharUnit) -> usize {
        let after = pos + unit.len;
        match self.unit_at(after) {
            Some(next) if !next.malformed && completes_break_pair(unit.code, next.code) => after + next.len,
            _ => after,
        }
    }

    /// Produce the longest admissible fragment starting at `cursor`, moving
    /// `cursor` past it.
    pub fn break_line(&self, cursor: &mut usize, opts: &BreakOptions) -> LineFragment {
        let start = *cursor;
        let mut placed: Vec<Placed> = Vec::new();
        let mut width: u32 = 0;
        let mut pos = start;

        let ending = loop {
            let Some(unit) = self.unit_at(pos) else {
                break FragmentEnding::EndOfInput;
            };

            if unit.malformed {
                if placed.is_empty() {
                    tracing::trace!(offset = pos, len = unit.len, "malformed unit placed alone");
                    placed.push(self.place(pos, unit, opts.tracking, false));
                    pos += unit.len;
                }
                break FragmentEnding::EndOfInput;
            }

            if C::is_hard_break(unit.code) {
                pos = self.skip_break(pos, unit);
                break FragmentEnding::HardBreak;
            }

            let entry = self.place(pos, unit, opts.tracking, false);
            if width + entry.advance > opts.limit {
                return self.overflow(start, placed, entry, opts, cursor);
            }

            width += entry.advance;
            pos += unit.len;
            placed.push(entry);
        };

        self.finish(start, &placed, pos, ending, cursor)
    }

    /// Place exactly the next unit (plus any closing-class units hanging after
    /// it) regardless of the budget. Used when a line with no content could
    /// not fit anything.
    pub fn break_forced(&self, cursor: &mut usize, tracking: i32) -> LineFragment {
        let limit = match self.unit_at(*cursor) {
            Some(unit) => self.measure(&unit, tracking).1,
            None => 0,
        };
        tracing::debug!(offset = *cursor, width = limit, "forced placement");

        let opts = BreakOptions {
            limit,
            tracking,
            avoid_word_split: false,
        };
        self.break_line(cursor, &opts)
    }

    fn overflow(
        &self,
        start: usize,
        mut placed: Vec<Placed>,
        first: Placed,
        opts: &BreakOptions,
        cursor: &mut usize,
    ) -> LineFragment {
        if C::is_closing_or_space(first.unit.code) {
            let mut next = first;
            loop {
                let pos = next.end();
                placed.push(Placed { hanging: true, ..next });
                match self.unit_at(pos) {
                    Some(unit) if !unit.malformed && C::is_hard_break(unit.code) => {
                        let after = self.skip_break(pos, unit);
                        return self.finish(start, &placed, after, FragmentEnding::HardBreak, cursor);
                    }
                    Some(unit) if !unit.malformed && C::is_closing_or_space(unit.code) => {
                        next = self.place(pos, unit, opts.tracking, true);
                    }
                    Some(_) => return self.finish(start, &placed, pos, FragmentEnding::Wrap, cursor),
                    None => return self.finish(start, &placed, pos, FragmentEnding::EndOfInput, cursor),
                }
            }
        }

        let limit_pos = first.at;
        if placed.is_empty() || !opts.avoid_word_split {
            return self.finish(start, &placed, limit_pos, FragmentEnding::WidthExhausted, cursor);
        }

        match Self::admissible_boundary(&placed, first.unit) {
            Some(keep) => {
                placed.truncate(keep);
                let end = placed.last().map_or(start, Placed::end);
                self.finish(start, &placed, end, FragmentEnding::Wrap, cursor)
            }
            None => self.finish(start, &placed, limit_pos, FragmentEnding::WidthExhausted, cursor),
        }
    }

    /// Number of placed units to keep so that the line neither ends with an
    /// opening-class unit nor splits an alphanumeric word. `None` when no
    /// such boundary exists on this line.
    fn admissible_boundary(placed: &[Placed], overflow: CharUnit) -> Option<usize> {
        let mut keep = placed.len();
        let mut next = overflow;

        loop {
            while keep > 0 && C::is_opening(placed[keep - 1].unit.code) {
                next = placed[keep - 1].unit;
                keep -= 1;
            }
            if keep == 0 {
                return None;
            }

            if placed[keep - 1].unit.is_alnum() && next.is_alnum() {
                while keep > 0 && placed[keep - 1].unit.is_alnum() {
                    keep -= 1;
                }
                if keep == 0 {
                    return None;
                }
                next = placed[keep].unit;
                continue;
            }

            return Some(keep);
        }
    }

    fn finish(
        &self,
        start: usize,
        placed: &[Placed],
        next: usize,
        ending: FragmentEnding,
        cursor: &mut usize,
    ) -> LineFragment {
        *cursor = next;
        let end = placed.last().map_or(start, Placed::end);
        LineFragment {
            range: start..end,
            next,
            width: placed.iter().map(|p| p.advance).sum(),
            glyph_width: placed.iter().map(|p| p.glyph).sum(),
            hang_width: placed.iter().filter(|p| p.hanging).map(|p| p.advance).sum(),
            chars: placed.len(),
            ending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::TextEncoding;
    use text_engine::{FontKind, FontMetrics, FontRegistry, LegacyDbcs, StaticFontSource, Utf16Be};

    /// Letters 1000, space and period 500, wide units fall back to 1000
    fn registry() -> (FontRegistry, FontId) {
        let metrics = FontMetrics::monospace("Mono", FontKind::Simple, 1000)
            .with_narrow_width(' ' as u32, 500)
            .with_narrow_width('.' as u32, 500);
        let mut registry = FontRegistry::new(StaticFontSource::new().with_font(metrics));
        let font = registry.resolve("Mono", TextEncoding::Utf16);
        (registry, font)
    }

    fn utf16(text: &str) -> Vec<u8> {
        TextEncoding::Utf16.encode_str(text)
    }

    fn decode(bytes: &[u8]) -> String {
        let units: Vec<u16> = bytes.chunks(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect();
        String::from_utf16_lossy(&units)
    }

    fn lines(text: &str, limit: u32) -> Vec<(String, FragmentEnding)> {
        let (registry, font) = registry();
        let bytes = utf16(text);
        let breaker = LineBreaker::<Utf16Be>::new(&bytes, &registry, font);
        let mut cursor = 0;
        let mut out = Vec::new();
        while cursor < bytes.len() {
            let mut fragment = breaker.break_line(&mut cursor, &BreakOptions::new(limit));
            if fragment.is_empty() && fragment.next == fragment.range.start {
                fragment = breaker.break_forced(&mut cursor, 0);
            }
            out.push((decode(&bytes[fragment.range.clone()]), fragment.ending));
        }
        out
    }

    #[test]
    fn test_fits_on_one_line() {
        assert_eq!(lines("ABC", 5000), vec![("ABC".to_string(), FragmentEnding::EndOfInput)]);
    }

    #[test]
    fn test_closing_punctuation_hangs() {
        let (registry, font) = registry();
        let bytes = utf16("AB C. D");
        let breaker = LineBreaker::<Utf16Be>::new(&bytes, &registry, font);
        let mut cursor = 0;

        let first = breaker.break_line(&mut cursor, &BreakOptions::new(3500));
        assert_eq!(decode(&bytes[first.range.clone()]), "AB C. ");
        assert_eq!(first.ending, FragmentEnding::Wrap);
        assert_eq!(first.width, 4500);
        assert_eq!(first.hang_width, 1000);
        assert_eq!(first.fitted_width(), 3500);

        let second = breaker.break_line(&mut cursor, &BreakOptions::new(3500));
        assert_eq!(decode(&bytes[second.range.clone()]), "D");
        assert_eq!(second.ending, FragmentEnding::EndOfInput);
    }

    #[test]
    fn test_period_never_starts_a_line() {
        let result = lines("A BC. D", 3000);
        assert_eq!(result[0].0, "A ");
        assert_eq!(result[1].0, "BC. ");
        assert!(result.iter().skip(1).all(|(text, _)| !text.starts_with('.')));
    }

    #[test]
    fn test_word_is_pushed_to_next_line() {
        let result = lines("AB CDE", 4000);
        assert_eq!(result[0], ("AB ".to_string(), FragmentEnding::Wrap));
        assert_eq!(result[1], ("CDE".to_string(), FragmentEnding::EndOfInput));
    }

    #[test]
    fn test_long_word_breaks_at_limit() {
        let result = lines("ABCDE", 2000);
        assert_eq!(result[0], ("AB".to_string(), FragmentEnding::WidthExhausted));
        assert_eq!(result[1], ("CD".to_string(), FragmentEnding::WidthExhausted));
        assert_eq!(result[2], ("E".to_string(), FragmentEnding::EndOfInput));
    }

    #[test]
    fn test_opening_bracket_moves_to_next_line() {
        // "(" fits at the end of the first line but may not end it
        let result = lines("AB (CD", 3500);
        assert_eq!(result[0].0, "AB ");
        assert_eq!(result[1].0, "(CD");
    }

    #[test]
    fn test_opening_before_word_is_kept_with_word() {
        let result = lines("X (ABC", 4000);
        assert_eq!(result[0].0, "X ");
        assert_eq!(result[1].0, "(ABC");
    }

    #[test]
    fn test_wide_text_breaks_anywhere() {
        let result = lines("\u{AC00}\u{AC01}\u{AC02}", 2000);
        assert_eq!(result[0], ("\u{AC00}\u{AC01}".to_string(), FragmentEnding::Wrap));
        assert_eq!(result[1].0, "\u{AC02}");
    }

    #[test]
    fn test_ideographic_comma_hangs() {
        let result = lines("\u{AC00}\u{AC01}\u{3001}\u{AC02}", 2000);
        assert_eq!(result[0].0, "\u{AC00}\u{AC01}\u{3001}");
        assert_eq!(result[1].0, "\u{AC02}");
    }

    #[test]
    fn test_hard_break_consumes_pair() {
        let (registry, font) = registry();
        let bytes = utf16("AB\r\nCD");
        let breaker = LineBreaker::<Utf16Be>::new(&bytes, &registry, font);
        let mut cursor = 0;

        let first = breaker.break_line(&mut cursor, &BreakOptions::new(10_000));
        assert_eq!(first.range, 0..4);
        assert_eq!(first.next, 8);
        assert_eq!(first.ending, FragmentEnding::HardBreak);

        let second = breaker.break_line(&mut cursor, &BreakOptions::new(10_000));
        assert_eq!(decode(&bytes[second.range]), "CD");
    }

    #[test]
    fn test_double_newline_is_two_breaks() {
        let result = lines("A\n\nB", 10_000);
        assert_eq!(result.len(), 3);
        assert_eq!(result[1], (String::new(), FragmentEnding::HardBreak));
    }

    #[test]
    fn test_hang_then_hard_break() {
        let result = lines("AB.\nC", 2000);
        assert_eq!(result[0], ("AB.".to_string(), FragmentEnding::HardBreak));
        assert_eq!(result[1].0, "C");
    }

    #[test]
    fn test_nothing_fits_yields_empty_fragment() {
        let (registry, font) = registry();
        let bytes = utf16("\u{AC00}");
        let breaker = LineBreaker::<Utf16Be>::new(&bytes, &registry, font);
        let mut cursor = 0;

        let fragment = breaker.break_line(&mut cursor, &BreakOptions::new(400));
        assert!(fragment.is_empty());
        assert_eq!(cursor, 0);

        let forced = breaker.break_forced(&mut cursor, 0);
        assert_eq!(forced.range, 0..2);
        assert_eq!(forced.width, 1000);
        assert_eq!(cursor, 2);
    }

    #[test]
    fn test_forced_placement_keeps_hanging_punctuation() {
        let (registry, font) = registry();
        let bytes = utf16("\u{AC00}\u{3002}\u{AC01}");
        let breaker = LineBreaker::<Utf16Be>::new(&bytes, &registry, font);
        let mut cursor = 0;

        let forced = breaker.break_forced(&mut cursor, 0);
        assert_eq!(forced.range, 0..4);
        assert_eq!(forced.hang_width, 1000);
    }

    #[test]
    fn test_tracking_counts_against_limit() {
        let (registry, font) = registry();
        let bytes = utf16("ABCD");
        let breaker = LineBreaker::<Utf16Be>::new(&bytes, &registry, font);
        let mut cursor = 0;

        let fragment = breaker.break_line(&mut cursor, &BreakOptions::new(3000).with_tracking(500));
        assert_eq!(fragment.chars, 2);
        assert_eq!(fragment.width, 3000);
        assert_eq!(fragment.glyph_width, 2000);
    }

    #[test]
    fn test_truncated_unit_ends_fragment_then_stands_alone() {
        let (registry, font) = registry();
        let bytes = [b'A', b'B', 0xB0];
        let breaker = LineBreaker::<LegacyDbcs>::new(&bytes, &registry, font);
        let mut cursor = 0;

        let first = breaker.break_line(&mut cursor, &BreakOptions::new(10_000));
        assert_eq!(first.range, 0..2);
        assert_eq!(cursor, 2);

        let second = breaker.break_line(&mut cursor, &BreakOptions::new(10_000));
        assert_eq!(second.range, 2..3);
        assert_eq!(second.width, 500);
        assert_eq!(cursor, 3);
    }

    #[test]
    fn test_legacy_wide_closing_hangs() {
        let (registry, font) = registry();
        // two wide syllables then a legacy full stop (0xA1A3)
        let bytes = [0xB0, 0xA1, 0xB0, 0xA2, 0xA1, 0xA3, 0xB0, 0xA3];
        let breaker = LineBreaker::<LegacyDbcs>::new(&bytes, &registry, font);
        let mut cursor = 0;

        let first = breaker.break_line(&mut cursor, &BreakOptions::new(2000));
        assert_eq!(first.range, 0..6);
        assert_eq!(first.ending, FragmentEnding::Wrap);
    }
}
