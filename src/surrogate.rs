//! UTF-16 surrogate arithmetic and pattern token encoding.

pub const SUPPLEMENTARY_START: u32 = 0x10000;
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

const HIGH_SURROGATE_START: u32 = 0xD800;
const LOW_SURROGATE_START: u32 = 0xDC00;
const SURROGATE_OFFSET_BITS: u32 = 10;
const SURROGATE_OFFSET_MASK: u32 = 0x3FF;

/// High (leading) surrogate of a supplementary code point.
pub fn high_surrogate(code_point: u32) -> u32 {
    (code_point - SUPPLEMENTARY_START) / 0x400 + HIGH_SURROGATE_START
}

/// Low (trailing) surrogate of a supplementary code point.
pub fn low_surrogate(code_point: u32) -> u32 {
    (code_point - SUPPLEMENTARY_START) % 0x400 + LOW_SURROGATE_START
}

pub fn combine_surrogates(high: u32, low: u32) -> u32 {
    ((high & SURROGATE_OFFSET_MASK) << SURROGATE_OFFSET_BITS)
        + (low & SURROGATE_OFFSET_MASK)
        + SUPPLEMENTARY_START
}

pub fn is_high_surrogate(unit: u32) -> bool {
    (unit & 0xFFFF_FC00) == HIGH_SURROGATE_START
}

pub fn is_low_surrogate(unit: u32) -> bool {
    (unit & 0xFFFF_FC00) == LOW_SURROGATE_START
}

/// Decodes UTF-16 code units into code points.
///
/// A high surrogate followed by a low surrogate yields one supplementary
/// code point. Every other unit, unpaired surrogates included, is passed
/// through as its own code point.
pub fn decode_utf16(units: &[u16]) -> Vec<u32> {
    char::decode_utf16(units.iter().copied())
        .map(|decoded| match decoded {
            Ok(ch) => u32::from(ch),
            Err(err) => u32::from(err.unpaired_surrogate()),
        })
        .collect()
}

/// Encodes a code point as a regex-safe token.
///
/// ASCII digits and letters are emitted as themselves, other BMP values as
/// `\uXXXX`, and supplementary values as the escapes of their surrogate pair.
pub fn encode_code_point(code_point: u32) -> String {
    let mut out = String::new();
    push_encoded_code_point(&mut out, code_point);
    out
}

pub(crate) fn push_encoded_code_point(out: &mut String, code_point: u32) {
    if is_safe_ascii(code_point) {
        out.push(code_point as u8 as char);
    } else if code_point <= 0xFFFF {
        push_unit_escape(out, code_point as u16);
    } else {
        push_encoded_code_point(out, high_surrogate(code_point));
        push_encoded_code_point(out, low_surrogate(code_point));
    }
}

fn is_safe_ascii(code_point: u32) -> bool {
    u8::try_from(code_point).is_ok_and(|b| b.is_ascii_alphanumeric())
}

fn push_unit_escape(out: &mut String, unit: u16) {
    out.push('\\');
    out.push('u');
    out.push(to_hex_upper(((unit >> 12) & 0x0F) as u8));
    out.push(to_hex_upper(((unit >> 8) & 0x0F) as u8));
    out.push(to_hex_upper(((unit >> 4) & 0x0F) as u8));
    out.push(to_hex_upper((unit & 0x0F) as u8));
}

pub(crate) fn to_hex_upper(nibble: u8) -> char {
    match nibble {
        0..=9 => (b'0' + nibble) as char,
        10..=15 => (b'A' + (nibble - 10)) as char,
        _ => '?',
    }
}

pub(crate) fn from_hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
