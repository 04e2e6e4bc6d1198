//! Script classification and character-unit decoding
//!
//! Run text stays in its storage encoding. A codec decodes one logical
//! character ("unit") at a time from a byte slice and never reads past the
//! end of it: a unit cut short by the end of the buffer is reported as
//! malformed instead.

use crate::punctuation;
use doc_model::TextEncoding;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Script class of a character unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Script {
    /// Single-unit characters, typically Latin/ASCII
    Narrow,
    /// Double-unit characters, typically East-Asian
    Wide,
}

/// One decoded logical character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharUnit {
    /// Decoded value: a code page value for the legacy encoding, a Unicode
    /// scalar value for UTF-16
    pub code: u32,
    /// Number of bytes the unit occupies
    pub len: usize,
    pub script: Script,
    /// Truncated at the end of the buffer
    pub malformed: bool,
}

impl CharUnit {
    fn narrow(code: u32, len: usize) -> Self {
        Self {
            code,
            len,
            script: Script::Narrow,
            malformed: false,
        }
    }

    fn wide(code: u32, len: usize) -> Self {
        Self {
            code,
            len,
            script: Script::Wide,
            malformed: false,
        }
    }

    fn truncated(code: u32, len: usize) -> Self {
        Self {
            code,
            len,
            script: Script::Narrow,
            malformed: true,
        }
    }

    pub fn is_narrow(&self) -> bool {
        self.script == Script::Narrow
    }

    /// ASCII letter or digit in the narrow class
    pub fn is_alnum(&self) -> bool {
        self.is_narrow()
            && !self.malformed
            && char::from_u32(self.code).is_some_and(|c| c.is_ascii_alphanumeric())
    }
}

/// Decoding and punctuation rules for one storage encoding
pub trait CharCodec {
    const ENCODING: TextEncoding;

    /// Decode the unit at the start of `bytes`, or `None` when empty
    fn decode(bytes: &[u8]) -> Option<CharUnit>;

    fn is_hard_break(code: u32) -> bool {
        punctuation::is_hard_break(code)
    }

    /// Must not be the last character on a line
    fn is_opening(code: u32) -> bool;

    /// Must not be the first character on a line
    fn is_closing_or_space(code: u32) -> bool;
}

/// Legacy double-byte code page
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyDbcs;

impl LegacyDbcs {
    fn is_lead(byte: u8) -> bool {
        (0x81..=0xFE).contains(&byte)
    }
}

impl CharCodec for LegacyDbcs {
    const ENCODING: TextEncoding = TextEncoding::Legacy;

    fn decode(bytes: &[u8]) -> Option<CharUnit> {
        let lead = *bytes.first()?;
        if !Self::is_lead(lead) {
            return Some(CharUnit::narrow(lead as u32, 1));
        }
        match bytes.get(1) {
            Some(&trail) => Some(CharUnit::wide(((lead as u32) << 8) | trail as u32, 2)),
            None => Some(CharUnit::truncated(lead as u32, 1)),
        }
    }

    fn is_opening(code: u32) -> bool {
        punctuation::LEGACY_OPENING.contains(&code)
    }

    fn is_closing_or_space(code: u32) -> bool {
        punctuation::LEGACY_CLOSING.contains(&code)
    }
}

/// UTF-16 stored as big-endian byte pairs
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf16Be;

impl Utf16Be {
    fn code_unit(bytes: &[u8], at: usize) -> Option<u16> {
        match (bytes.get(at), bytes.get(at + 1)) {
            (Some(&hi), Some(&lo)) => Some(u16::from_be_bytes([hi, lo])),
            _ => None,
        }
    }
}

impl CharCodec for Utf16Be {
    const ENCODING: TextEncoding = TextEncoding::Utf16;

    fn decode(bytes: &[u8]) -> Option<CharUnit> {
        let first = *bytes.first()?;
        let Some(unit) = Self::code_unit(bytes, 0) else {
            return Some(CharUnit::truncated(first as u32, 1));
        };

        if first == 0 && unit <= 0x7F {
            return Some(CharUnit::narrow(unit as u32, 2));
        }

        if (0xD800..=0xDBFF).contains(&unit) {
            return match Self::code_unit(bytes, 2) {
                Some(low) if (0xDC00..=0xDFFF).contains(&low) => {
                    let scalar = 0x10000 + (((unit as u32) - 0xD800) << 10) + ((low as u32) - 0xDC00);
                    Some(CharUnit::wide(scalar, 4))
                }
                // unpaired high surrogate mid-stream: keep it as a plain wide unit
                Some(_) => Some(CharUnit::wide(unit as u32, 2)),
                None => Some(CharUnit::truncated(unit as u32, bytes.len())),
            };
        }

        Some(CharUnit::wide(unit as u32, 2))
    }

    fn is_opening(code: u32) -> bool {
        punctuation::UTF16_OPENING.contains(&code)
    }

    fn is_closing_or_space(code: u32) -> bool {
        punctuation::UTF16_CLOSING.contains(&code)
    }
}

/// Classify the unit at the start of `bytes`
pub fn classify<C: CharCodec>(bytes: &[u8]) -> Option<Script> {
    C::decode(bytes).map(|unit| unit.script)
}

/// Iterator over the units of a byte slice, yielding `(offset, unit)`
pub struct Units<'a, C> {
    bytes: &'a [u8],
    pos: usize,
    _codec: std::marker::PhantomData<C>,
}

impl<'a, C: CharCodec> Units<'a, C> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            _codec: std::marker::PhantomData,
        }
    }
}

impl<C: CharCodec> Iterator for Units<'_, C> {
    type Item = (usize, CharUnit);

    fn next(&mut self) -> Option<Self::Item> {
        let unit = C::decode(&self.bytes[self.pos..])?;
        let at = self.pos;
        self.pos += unit.len;
        Some((at, unit))
    }
}

/// A maximal single-script byte range of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSegment {
    pub range: Range<usize>,
    pub script: Script,
}

/// Split `bytes` into maximal single-script segments, in order
pub fn segments<C: CharCodec>(bytes: &[u8]) -> Vec<ScriptSegment> {
    let mut out: Vec<ScriptSegment> = Vec::new();
    for (at, unit) in Units::<C>::new(bytes) {
        let end = at + unit.len;
        match out.last_mut() {
            Some(last) if last.script == unit.script => last.range.end = end,
            _ => out.push(ScriptSegment {
                range: at..end,
                script: unit.script,
            }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_lead_byte_makes_wide_unit() {
        let unit = LegacyDbcs::decode(&[0xB0, 0xA1, b'a']).unwrap();
        assert_eq!(unit.script, Script::Wide);
        assert_eq!(unit.code, 0xB0A1);
        assert_eq!(unit.len, 2);

        let unit = LegacyDbcs::decode(b"a").unwrap();
        assert_eq!(unit, CharUnit::narrow(b'a' as u32, 1));
    }

    #[test]
    fn test_legacy_truncated_lead_byte() {
        let unit = LegacyDbcs::decode(&[0xB0]).unwrap();
        assert!(unit.malformed);
        assert_eq!(unit.script, Script::Narrow);
        assert_eq!(unit.len, 1);
    }

    #[test]
    fn test_utf16_narrow_requires_zero_high_byte() {
        assert_eq!(classify::<Utf16Be>(&[0x00, 0x41]), Some(Script::Narrow));
        // U+00E9 is outside the narrow range
        assert_eq!(classify::<Utf16Be>(&[0x00, 0xE9]), Some(Script::Wide));
        assert_eq!(classify::<Utf16Be>(&[0x30, 0x01]), Some(Script::Wide));
        assert_eq!(classify::<Utf16Be>(&[]), None);
    }

    #[test]
    fn test_utf16_surrogate_pair_is_one_unit() {
        let bytes = TextEncoding::Utf16.encode_str("\u{20000}");
        let unit = Utf16Be::decode(&bytes).unwrap();
        assert_eq!(unit.len, 4);
        assert_eq!(unit.code, 0x20000);
        assert!(!unit.malformed);
    }

    #[test]
    fn test_utf16_truncation() {
        let odd = Utf16Be::decode(&[0x00]).unwrap();
        assert!(odd.malformed);
        assert_eq!(odd.len, 1);

        let lone_high = Utf16Be::decode(&[0xD8, 0x40, 0x00]).unwrap();
        assert!(lone_high.malformed);
        assert_eq!(lone_high.len, 3);
    }

    #[test]
    fn test_units_cover_whole_buffer() {
        let bytes = [b'a', 0xB0, 0xA1, b'b', 0xC7];
        let lens: Vec<usize> = Units::<LegacyDbcs>::new(&bytes).map(|(_, u)| u.len).collect();
        assert_eq!(lens, vec![1, 2, 1, 1]);
    }

    #[test]
    fn test_segments_split_on_script_change() {
        let bytes = TextEncoding::Utf16.encode_str("ab\u{AC00}\u{AC01}c");
        let segs = segments::<Utf16Be>(&bytes);
        assert_eq!(
            segs,
            vec![
                ScriptSegment { range: 0..4, script: Script::Narrow },
                ScriptSegment { range: 4..8, script: Script::Wide },
                ScriptSegment { range: 8..10, script: Script::Narrow },
            ]
        );
    }

    #[test]
    fn test_alnum_is_ascii_only() {
        assert!(Utf16Be::decode(&[0x00, b'7']).unwrap().is_alnum());
        assert!(!Utf16Be::decode(&[0x00, b'.']).unwrap().is_alnum());
        assert!(!Utf16Be::decode(&[0xFF, 0x21]).unwrap().is_alnum());
    }
}
