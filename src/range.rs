//! Range lists: the compressed form of a code point set.

use std::fmt;
use std::ops::RangeInclusive;

/// One element of a range list.
///
/// `Span` bounds are inclusive. Spans produced by [`compress_range`] always
/// satisfy `start < end` and cover at least three code points; spans accepted
/// as input may be anything, a reversed span simply expands to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodePointRange {
    Single(u32),
    Span(u32, u32),
}

/// An ordered sequence of singles and inclusive spans.
pub type RangeList = Vec<CodePointRange>;

impl CodePointRange {
    pub fn start(&self) -> u32 {
        match *self {
            Self::Single(cp) => cp,
            Self::Span(start, _) => start,
        }
    }

    pub fn end(&self) -> u32 {
        match *self {
            Self::Single(cp) => cp,
            Self::Span(_, end) => end,
        }
    }

    pub fn code_points(&self) -> RangeInclusive<u32> {
        self.start()..=self.end()
    }
}

impl From<u32> for CodePointRange {
    fn from(value: u32) -> Self {
        Self::Single(value)
    }
}

impl From<(u32, u32)> for CodePointRange {
    fn from((start, end): (u32, u32)) -> Self {
        Self::Span(start, end)
    }
}

impl From<[u32; 2]> for CodePointRange {
    fn from([start, end]: [u32; 2]) -> Self {
        Self::Span(start, end)
    }
}

impl From<RangeInclusive<u32>> for CodePointRange {
    fn from(value: RangeInclusive<u32>) -> Self {
        Self::Span(*value.start(), *value.end())
    }
}

impl fmt::Display for CodePointRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(cp) => write!(f, "{cp}"),
            Self::Span(start, end) => write!(f, "[{start},{end}]"),
        }
    }
}

/// Expands a range list into a flat list of code points.
///
/// Input order is kept and duplicates are not removed.
pub fn expand_range(range: &[CodePointRange]) -> Vec<u32> {
    let mut out = Vec::new();
    for item in range {
        match *item {
            CodePointRange::Single(cp) => out.push(cp),
            CodePointRange::Span(start, end) => out.extend(start..=end),
        }
    }
    out
}

/// Compresses sorted, deduplicated code points into a range list.
///
/// Runs of three or more consecutive values become a span. A run of exactly
/// two values stays as two singles.
pub fn compress_range(code_points: &[u32]) -> RangeList {
    let mut out = Vec::new();
    let mut i = 0usize;

    while i < code_points.len() {
        let start = code_points[i];
        let mut j = i;
        while j + 1 < code_points.len() && code_points[j + 1] == code_points[j].wrapping_add(1) {
            j += 1;
        }

        match j - i {
            0 => out.push(CodePointRange::Single(start)),
            1 => {
                out.push(CodePointRange::Single(start));
                out.push(CodePointRange::Single(code_points[j]));
            }
            _ => out.push(CodePointRange::Span(start, code_points[j])),
        }
        i = j + 1;
    }

    out
}
