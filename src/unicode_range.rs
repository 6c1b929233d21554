//! CSS `unicode-range` parsing.
//!
//! Accepts comma separated `U+XXXX`, `U+XXXX-YYYY` and wildcard `U+1??`
//! tokens. The permissive parser silently skips tokens it cannot read, the
//! strict one reports them.

use crate::surrogate::{MAX_CODE_POINT, from_hex_digit};
use crate::trace::TraceState;
use crate::{CharacterSet, Error, Result};

const MAX_HEX_DIGITS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UnicodeRangeToken {
    start: u32,
    end: u32,
    ignored_end: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UnicodeRangeParser {
    strict: bool,
    trace: TraceState,
}

impl UnicodeRangeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report malformed tokens, reversed ranges and values above `U+10FFFF`
    /// as errors instead of skipping them.
    pub fn strict(&mut self, enabled: bool) -> &mut Self {
        self.strict = enabled;
        self
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace.enabled = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace.to_stderr = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        self.trace.set_log_limit(max_entries)
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace.take_logs()
    }

    pub fn parse(&mut self, input: &str) -> Result<CharacterSet> {
        let mut result = CharacterSet::new();

        let last = input.split(',').count() - 1;
        for (index, raw) in input.split(',').enumerate() {
            // Only whitespace next to a comma is insignificant.
            let token = match (index, index == last) {
                (0, true) => raw,
                (0, false) => raw.trim_end(),
                (_, true) => raw.trim_start(),
                (_, false) => raw.trim(),
            };
            if token.is_empty() {
                continue;
            }

            let Some(parsed) = parse_token(token) else {
                self.trace
                    .line(format!("[unicode-range] skipped malformed token {token:?}"));
                if self.strict {
                    return Err(Error::InvalidUnicodeRange(token.to_string()));
                }
                continue;
            };

            if self.strict {
                if parsed.ignored_end {
                    return Err(Error::InvalidUnicodeRange(token.to_string()));
                }
                if parsed.start > parsed.end {
                    return Err(Error::InvalidRange {
                        start: parsed.start,
                        end: parsed.end,
                    });
                }
                if parsed.end > MAX_CODE_POINT {
                    return Err(Error::InvalidCodePoint(parsed.end));
                }
            }

            let before = result.size();
            result.extend(parsed.start..=parsed.end);
            self.trace.line(format!(
                "[unicode-range] {token} -> U+{:X}..U+{:X} added={}",
                parsed.start,
                parsed.end,
                result.size() - before
            ));
        }

        Ok(result)
    }
}

/// Parses CSS unicode-range notation, skipping tokens that do not match.
///
/// ```
/// use characterset::parse_unicode_range;
///
/// let set = parse_unicode_range("U+0041-0043, u+1?, bogus");
/// assert_eq!(set.size(), 3 + 16);
/// ```
pub fn parse_unicode_range(input: &str) -> CharacterSet {
    let mut parser = UnicodeRangeParser::new();
    parser.parse(input).unwrap_or_default()
}

/// Strict form of [`parse_unicode_range`].
pub fn try_parse_unicode_range(input: &str) -> Result<CharacterSet> {
    UnicodeRangeParser::new().strict(true).parse(input)
}

fn parse_token(token: &str) -> Option<UnicodeRangeToken> {
    let bytes = token.as_bytes();
    if bytes.len() < 3 || !matches!(bytes[0], b'u' | b'U') || bytes[1] != b'+' {
        return None;
    }
    let body = &bytes[2..];

    let (start_digits, end_digits) = match body.iter().position(|&b| b == b'-') {
        Some(dash) => (&body[..dash], Some(&body[dash + 1..])),
        None => (body, None),
    };

    if start_digits.is_empty() || start_digits.len() > MAX_HEX_DIGITS {
        return None;
    }
    if !start_digits
        .iter()
        .all(|&b| b == b'?' || from_hex_digit(b).is_some())
    {
        return None;
    }
    let end = match end_digits {
        Some(digits) => Some(parse_hex(digits)?),
        None => None,
    };

    if start_digits.contains(&b'?') {
        return Some(UnicodeRangeToken {
            start: parse_wildcard(start_digits, 0x0),
            end: parse_wildcard(start_digits, 0xF),
            ignored_end: end.is_some(),
        });
    }

    let start = parse_hex(start_digits)?;
    Some(UnicodeRangeToken {
        start,
        end: end.unwrap_or(start),
        ignored_end: false,
    })
}

fn parse_hex(digits: &[u8]) -> Option<u32> {
    if digits.is_empty() || digits.len() > MAX_HEX_DIGITS {
        return None;
    }
    digits.iter().try_fold(0u32, |acc, &b| {
        from_hex_digit(b).map(|digit| (acc << 4) | u32::from(digit))
    })
}

fn parse_wildcard(digits: &[u8], fill: u8) -> u32 {
    digits.iter().fold(0u32, |acc, &b| {
        (acc << 4) | u32::from(from_hex_digit(b).unwrap_or(fill))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_parser() -> UnicodeRangeParser {
        let mut parser = UnicodeRangeParser::new();
        parser.enable_trace(true);
        parser.set_trace_stderr(false);
        parser
    }

    #[test]
    fn single_code_point() {
        assert_eq!(parse_unicode_range("U+41").to_array(), vec![0x41]);
        assert_eq!(parse_unicode_range("u+1D306").to_array(), vec![0x1D306]);
    }

    #[test]
    fn explicit_range() {
        assert_eq!(
            parse_unicode_range("U+0041-0044").to_array(),
            vec![0x41, 0x42, 0x43, 0x44]
        );
    }

    #[test]
    fn wildcard_range() {
        let set = parse_unicode_range("u+1?");
        assert_eq!(set.to_array(), (0x10..=0x1F).collect::<Vec<_>>());
    }

    #[test]
    fn every_wildcard_is_substituted() {
        let set = parse_unicode_range("U+4??");
        assert_eq!(set.size(), 0x100);
        assert!(set.contains(0x400));
        assert!(set.contains(0x4FF));
        assert!(!set.contains(0x500));
    }

    #[test]
    fn wildcard_ignores_explicit_end() {
        let set = parse_unicode_range("u+1?-FF");
        assert_eq!(set.to_array(), (0x10..=0x1F).collect::<Vec<_>>());
    }

    #[test]
    fn multiple_tokens_with_whitespace() {
        let set = parse_unicode_range("U+41 ,  U+61-63,U+7A");
        assert_eq!(set.to_array(), vec![0x41, 0x61, 0x62, 0x63, 0x7A]);
    }

    #[test]
    fn malformed_tokens_are_skipped() {
        let set = parse_unicode_range("U+41, X+42, U+, U+1234567, U+4G, U+41-, 0x43, U+44");
        assert_eq!(set.to_array(), vec![0x41, 0x44]);
        assert!(parse_unicode_range("").is_empty());
    }

    #[test]
    fn whitespace_is_only_trimmed_around_commas() {
        assert!(parse_unicode_range("  U+41").is_empty());
        assert!(parse_unicode_range("U+41\n").is_empty());
        assert_eq!(
            parse_unicode_range(" U+41 ,\tU+42 , U+43 ").to_array(),
            vec![0x42]
        );
        assert_eq!(parse_unicode_range("U+41\n,\nU+42").to_array(), vec![0x41, 0x42]);
    }

    #[test]
    fn strict_parser_rejects_leading_whitespace() {
        assert_eq!(
            try_parse_unicode_range(" U+41"),
            Err(Error::InvalidUnicodeRange(" U+41".into()))
        );
    }

    #[test]
    fn strict_parser_rejects_wildcard_with_explicit_end() {
        assert_eq!(
            try_parse_unicode_range("U+1?-FF"),
            Err(Error::InvalidUnicodeRange("U+1?-FF".into()))
        );
        assert_eq!(try_parse_unicode_range("U+1?").map(|set| set.size()), Ok(16));
    }

    #[test]
    fn reversed_range_adds_nothing() {
        assert!(parse_unicode_range("U+50-40").is_empty());
    }

    #[test]
    fn round_trips_through_hex_range_string() {
        let set = parse_unicode_range("U+10000-10FFF");
        assert_eq!(set.to_hex_range_string(), "U+10000-10FFF");
        assert_eq!(parse_unicode_range(&set.to_hex_range_string()), set);
    }

    #[test]
    fn strict_parser_reports_problems() {
        assert_eq!(
            try_parse_unicode_range("U+41, nope"),
            Err(Error::InvalidUnicodeRange("nope".into()))
        );
        assert_eq!(
            try_parse_unicode_range("U+50-40"),
            Err(Error::InvalidRange {
                start: 0x50,
                end: 0x40
            })
        );
        assert_eq!(
            try_parse_unicode_range("U+110000"),
            Err(Error::InvalidCodePoint(0x110000))
        );
        assert_eq!(
            try_parse_unicode_range("U+41,").map(|set| set.to_array()),
            Ok(vec![0x41])
        );
    }

    #[test]
    fn trace_records_accepted_and_skipped_tokens() -> Result<()> {
        let mut parser = quiet_parser();
        parser.parse("U+41-43, bogus, U+42")?;
        let logs = parser.take_trace_logs();
        assert_eq!(
            logs,
            vec![
                "[unicode-range] U+41-43 -> U+41..U+43 added=3".to_string(),
                "[unicode-range] skipped malformed token \"bogus\"".to_string(),
                "[unicode-range] U+42 -> U+42..U+42 added=0".to_string(),
            ]
        );
        Ok(())
    }

    #[test]
    fn trace_is_off_by_default() -> Result<()> {
        let mut parser = UnicodeRangeParser::new();
        parser.parse("U+41")?;
        assert!(parser.take_trace_logs().is_empty());
        Ok(())
    }

    #[test]
    fn trace_log_limit_must_be_positive() {
        let mut parser = UnicodeRangeParser::new();
        assert!(matches!(
            parser.set_trace_log_limit(0),
            Err(Error::InvalidConfig(_))
        ));
    }
}
