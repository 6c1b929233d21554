//! Runs JavaScript-style patterns over UTF-16 code units.
//!
//! Patterns produced by [`crate::CharacterSet::to_regexp`] name surrogate
//! code units with `\uXXXX` escapes, which a UTF-8 engine cannot express.
//! Both the pattern and the haystack are mapped unit by unit onto Rust
//! `char`s: units below `0xD800` map to themselves, the rest are shifted up
//! by `0x10000`. The mapping is order preserving, so class ranges keep their
//! meaning.

use std::fmt;

use crate::surrogate::from_hex_digit;

const SHIFT_START: u32 = 0xD800;
const SHIFT: u32 = 0x10000;

#[derive(Debug, Clone)]
pub struct Utf16Regex {
    backend: fancy_regex::Regex,
}

impl Utf16Regex {
    pub fn new(pattern: &str) -> Result<Self, RegexError> {
        Utf16RegexBuilder::new(pattern).build()
    }

    pub fn is_match(&self, input: &str) -> Result<bool, RegexError> {
        let haystack = internalize_str(input);
        self.backend.is_match(&haystack).map_err(RegexError::from)
    }

    /// Matches raw code units, which may contain unpaired surrogates.
    pub fn is_match_utf16(&self, units: &[u16]) -> Result<bool, RegexError> {
        let haystack = internalize_units(units);
        self.backend.is_match(&haystack).map_err(RegexError::from)
    }

    pub fn find_all(&self, input: &str) -> Result<Vec<String>, RegexError> {
        let haystack = internalize_str(input);
        let mut out = Vec::new();
        for matched in self.backend.find_iter(&haystack) {
            let matched = matched.map_err(RegexError::from)?;
            out.push(deinternalize_str(matched.as_str()));
        }
        Ok(out)
    }
}

#[derive(Debug, Clone)]
pub struct Utf16RegexBuilder {
    pattern: String,
    anchored: bool,
    multi_line: bool,
}

impl Utf16RegexBuilder {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            anchored: false,
            multi_line: false,
        }
    }

    /// Require the whole haystack to match.
    pub fn anchored(&mut self, enabled: bool) -> &mut Self {
        self.anchored = enabled;
        self
    }

    pub fn multi_line(&mut self, enabled: bool) -> &mut Self {
        self.multi_line = enabled;
        self
    }

    pub fn build(&self) -> Result<Utf16Regex, RegexError> {
        let mut pattern = internalize_pattern(&self.pattern);
        if self.anchored {
            pattern = format!("^(?:{pattern})$");
        }
        let mut builder = fancy_regex::RegexBuilder::new(&pattern);
        builder.multi_line(self.multi_line);
        let backend = builder.build().map_err(RegexError::from)?;
        Ok(Utf16Regex { backend })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexError {
    message: String,
}

impl RegexError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RegexError {}

impl From<fancy_regex::Error> for RegexError {
    fn from(value: fancy_regex::Error) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

pub(crate) fn internalize_utf16_code_unit(unit: u16) -> char {
    let value = u32::from(unit);
    let mapped = if value < SHIFT_START { value } else { value + SHIFT };
    char::from_u32(mapped).unwrap_or(char::REPLACEMENT_CHARACTER)
}

pub(crate) fn deinternalize_code_unit(ch: char) -> u16 {
    let value = u32::from(ch);
    let unit = if value >= SHIFT_START + SHIFT {
        value - SHIFT
    } else {
        value
    };
    u16::try_from(unit).unwrap_or(0xFFFD)
}

fn internalize_units(units: &[u16]) -> String {
    units.iter().copied().map(internalize_utf16_code_unit).collect()
}

fn internalize_str(input: &str) -> String {
    input.encode_utf16().map(internalize_utf16_code_unit).collect()
}

fn deinternalize_str(input: &str) -> String {
    let units: Vec<u16> = input.chars().map(deinternalize_code_unit).collect();
    String::from_utf16_lossy(&units)
}

fn push_internalized_escape(out: &mut String, unit: u16) {
    let ch = internalize_utf16_code_unit(unit);
    if ch.is_ascii_alphanumeric() {
        out.push(ch);
    } else {
        out.push_str(&format!("\\x{{{:X}}}", u32::from(ch)));
    }
}

fn parse_unit_escape(bytes: &[u8]) -> Option<u16> {
    if bytes.len() < 4 {
        return None;
    }
    let mut unit = 0u16;
    for &b in &bytes[..4] {
        unit = (unit << 4) | u16::from(from_hex_digit(b)?);
    }
    Some(unit)
}

/// Rewrites `\uXXXX` escapes and non-ASCII literals into the internal
/// alphabet. Every other escape is passed through untouched.
pub(crate) fn internalize_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.char_indices();

    while let Some((i, ch)) = chars.next() {
        if ch == '\\' {
            let rest = &pattern.as_bytes()[i + 1..];
            if rest.first() == Some(&b'u') {
                if let Some(unit) = parse_unit_escape(&rest[1..]) {
                    push_internalized_escape(&mut out, unit);
                    for _ in 0..5 {
                        chars.next();
                    }
                    continue;
                }
            }
            out.push('\\');
            if let Some((_, escaped)) = chars.next() {
                out.push(escaped);
            }
            continue;
        }

        if u32::from(ch) >= SHIFT_START {
            let mut buf = [0u16; 2];
            for unit in ch.encode_utf16(&mut buf).iter().copied() {
                push_internalized_escape(&mut out, unit);
            }
            continue;
        }

        out.push(ch);
    }

    out
}
