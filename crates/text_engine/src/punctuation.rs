//! Line-break punctuation tables
//!
//! These are exact data tables, one per encoding. Legacy values are code page
//! values (two-byte characters as `lead << 8 | trail`); UTF-16 values are
//! Unicode scalar values. Existing documents depend on this exact break
//! behavior, so entries are not derived from Unicode line-break classes.

/// Characters that may not end a line, legacy code page
pub const LEGACY_OPENING: &[u32] = &[
    0x28, 0x5B, 0x7B, // ( [ {
    0xA1AE, 0xA1B0, 0xA1B2, 0xA1B4, 0xA1B6, 0xA1B8, 0xA1BA, 0xA1BC,
    0xA3A8, 0xA3DB, 0xA3FB,
];

/// Characters that may not start a line, legacy code page
pub const LEGACY_CLOSING: &[u32] = &[
    0x20, // space
    0x21, 0x29, 0x2C, 0x2E, 0x3A, 0x3B, 0x3F, 0x5D, 0x7D, // ! ) , . : ; ? ] }
    0xA1A1, // ideographic space
    0xA1A2, 0xA1A3, 0xA1A4, 0xA1A5, 0xA1A6,
    0xA1AF, 0xA1B1, 0xA1B3, 0xA1B5, 0xA1B7, 0xA1B9, 0xA1BB, 0xA1BD,
    0xA3A1, 0xA3A9, 0xA3AC, 0xA3AE, 0xA3BA, 0xA3BB, 0xA3BF, 0xA3DD, 0xA3FD,
];

/// Characters that may not end a line, UTF-16
pub const UTF16_OPENING: &[u32] = &[
    0x28, 0x5B, 0x7B, // ( [ {
    0x00AB, 0x2018, 0x201C,
    0x3008, 0x300A, 0x300C, 0x300E, 0x3010, 0x3014,
    0xFF08, 0xFF3B, 0xFF5B, 0xFF62,
];

/// Characters that may not start a line, UTF-16
pub const UTF16_CLOSING: &[u32] = &[
    0x20, // space
    0x21, 0x29, 0x2C, 0x2E, 0x3A, 0x3B, 0x3F, 0x5D, 0x7D, // ! ) , . : ; ? ] }
    0x00BB, 0x2019, 0x201D,
    0x2025, 0x2026, 0x2015, // leaders, ellipsis, dash
    0x3000, 0x3001, 0x3002,
    0x3009, 0x300B, 0x300D, 0x300F, 0x3011, 0x3015,
    0x30FB, 0x30FC,
    0xFF01, 0xFF09, 0xFF0C, 0xFF0E, 0xFF1A, 0xFF1B, 0xFF1F, 0xFF3D, 0xFF5D, 0xFF63,
];

const CR: u32 = 0x0D;
const LF: u32 = 0x0A;

/// CR or LF
pub fn is_hard_break(code: u32) -> bool {
    code == CR || code == LF
}

/// Whether `next` completes a CR LF or LF CR pair started by `first`
pub fn completes_break_pair(first: u32, next: u32) -> bool {
    matches!((first, next), (CR, LF) | (LF, CR))
}
