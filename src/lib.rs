//! Unicode code point sets.
//!
//! [`CharacterSet`] is an ordered set of code points with set algebra,
//! compression into range lists, and serializers for regex character
//! classes, CSS `unicode-range` notation and UTF-16 aware regex patterns.
//!
//! ```
//! use characterset::{CharacterSet, parse_unicode_range};
//!
//! let latin = parse_unicode_range("U+41-5A");
//! let digits = CharacterSet::from("0123456789");
//! let both = latin.union(&digits);
//! assert_eq!(both.to_range_string(), "[0-9A-Z]");
//! assert_eq!(both.to_hex_range_string(), "U+30-39,U+41-5A");
//! ```

use std::error::Error as StdError;
use std::fmt;

mod character_set;
mod js_regex;
mod range;
mod regexp;
mod surrogate;
mod trace;
mod unicode_range;

pub use character_set::CharacterSet;
pub use js_regex::{RegexError, Utf16Regex, Utf16RegexBuilder};
pub use range::{CodePointRange, RangeList, compress_range, expand_range};
pub use surrogate::{
    MAX_CODE_POINT, SUPPLEMENTARY_START, combine_surrogates, decode_utf16, encode_code_point,
    high_surrogate, is_high_surrogate, is_low_surrogate, low_surrogate,
};
pub use unicode_range::{UnicodeRangeParser, parse_unicode_range, try_parse_unicode_range};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InvalidCodePoint(u32),
    InvalidRange { start: u32, end: u32 },
    InvalidUnicodeRange(String),
    InvalidConfig(String),
    Regex(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCodePoint(code_point) => {
                write!(f, "code point out of range: U+{code_point:X}")
            }
            Self::InvalidRange { start, end } => {
                write!(f, "reversed range: U+{start:X}-{end:X}")
            }
            Self::InvalidUnicodeRange(token) => write!(f, "invalid unicode-range token: {token}"),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Regex(msg) => write!(f, "regex error: {msg}"),
        }
    }
}

impl StdError for Error {}

impl From<RegexError> for Error {
    fn from(value: RegexError) -> Self {
        Self::Regex(value.message().to_string())
    }
}
