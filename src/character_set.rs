use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt;
use std::ops::{BitAnd, BitOr, Sub};

use crate::js_regex::{Utf16Regex, Utf16RegexBuilder};
use crate::range::{CodePointRange, RangeList, compress_range, expand_range};
use crate::surrogate::{self, MAX_CODE_POINT, push_encoded_code_point};
use crate::{Error, Result, regexp};

/// An ordered set of Unicode code points.
///
/// Members are plain `u32` values. The permissive API never rejects values
/// above `U+10FFFF`; use the `try_*` constructors when validation matters.
///
/// ```
/// use characterset::CharacterSet;
///
/// let mut set = CharacterSet::from("abc");
/// set.add(&[0x1D306]);
/// assert_eq!(set.size(), 4);
/// assert_eq!(set.to_regexp(), "[a-c]|\\uD834\\uDF06");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CharacterSet {
    members: BTreeSet<u32>,
}

impl CharacterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_code_point(code_point: u32) -> Self {
        let mut set = Self::new();
        set.insert(code_point);
        set
    }

    /// Builds a set from raw UTF-16 code units, combining surrogate pairs.
    /// Unpaired surrogates become members in their own right.
    pub fn from_utf16(units: &[u16]) -> Self {
        surrogate::decode_utf16(units).into_iter().collect()
    }

    pub fn from_range(range: &[CodePointRange]) -> Self {
        expand_range(range).into_iter().collect()
    }

    /// Like [`CharacterSet::from_range`], but rejects reversed spans and
    /// code points above `U+10FFFF`.
    pub fn try_from_range(range: &[CodePointRange]) -> Result<Self> {
        for item in range {
            if item.start() > item.end() {
                return Err(Error::InvalidRange {
                    start: item.start(),
                    end: item.end(),
                });
            }
            check_code_point(item.end())?;
        }
        Ok(Self::from_range(range))
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, code_point: u32) -> bool {
        self.members.contains(&code_point)
    }

    /// Adds one code point. Returns `true` if it was not already a member.
    pub fn insert(&mut self, code_point: u32) -> bool {
        self.members.insert(code_point)
    }

    /// Removes one code point. Returns `true` if it was a member.
    pub fn delete(&mut self, code_point: u32) -> bool {
        self.members.remove(&code_point)
    }

    pub fn add(&mut self, code_points: &[u32]) {
        self.members.extend(code_points.iter().copied());
    }

    /// Validating form of [`CharacterSet::add`]. Nothing is added when any
    /// value is out of range.
    pub fn try_add(&mut self, code_points: &[u32]) -> Result<()> {
        for &code_point in code_points {
            check_code_point(code_point)?;
        }
        self.add(code_points);
        Ok(())
    }

    pub fn remove(&mut self, code_points: &[u32]) {
        for code_point in code_points {
            self.members.remove(code_point);
        }
    }

    pub fn iter(&self) -> btree_set::Iter<'_, u32> {
        self.members.iter()
    }

    /// Members in ascending numeric order.
    pub fn to_array(&self) -> Vec<u32> {
        self.members.iter().copied().collect()
    }

    pub fn equals(&self, other: &CharacterSet) -> bool {
        self.size() == other.size() && self.subset(other)
    }

    pub fn union(&self, other: &CharacterSet) -> CharacterSet {
        let mut result = self.clone();
        result.members.extend(other.iter().copied());
        result
    }

    pub fn intersect(&self, other: &CharacterSet) -> CharacterSet {
        self.iter()
            .copied()
            .filter(|code_point| other.contains(*code_point))
            .collect()
    }

    pub fn difference(&self, other: &CharacterSet) -> CharacterSet {
        self.iter()
            .copied()
            .filter(|code_point| !other.contains(*code_point))
            .collect()
    }

    pub fn subset(&self, other: &CharacterSet) -> bool {
        self.iter().all(|code_point| other.contains(*code_point))
    }

    pub fn to_range(&self) -> RangeList {
        compress_range(&self.to_array())
    }

    /// Renders the compressed set as a regex character class.
    ///
    /// Supplementary code points are encoded as surrogate pairs but the set
    /// is not split by plane, so a span crossing planes renders as
    /// `\uHHHH\uLLLL-\uHHHH\uLLLL` inside the class. Use
    /// [`CharacterSet::to_regexp`] for UTF-16 correct output.
    pub fn to_range_string(&self) -> String {
        let range = self.to_range();
        let mut body = String::new();
        let mut contains_span = false;

        for item in &range {
            match *item {
                CodePointRange::Single(code_point) => {
                    push_encoded_code_point(&mut body, code_point);
                }
                CodePointRange::Span(start, end) => {
                    contains_span = true;
                    push_encoded_code_point(&mut body, start);
                    body.push('-');
                    push_encoded_code_point(&mut body, end);
                }
            }
        }

        match range.len() {
            0 => String::new(),
            1 if !contains_span => body,
            _ => format!("[{body}]"),
        }
    }

    /// `U+<HEX>` per member, comma separated.
    pub fn to_hex_string(&self) -> String {
        self.iter()
            .map(|code_point| format!("U+{code_point:X}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Compressed CSS unicode-range notation, e.g. `U+41-5A,U+61`.
    pub fn to_hex_range_string(&self) -> String {
        self.to_range()
            .iter()
            .map(|item| match *item {
                CodePointRange::Single(code_point) => format!("U+{code_point:X}"),
                CodePointRange::Span(start, end) => format!("U+{start:X}-{end:X}"),
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Pattern fragment matching exactly this set over UTF-16 text.
    ///
    /// No flags, anchors or groups are added.
    pub fn to_regexp(&self) -> String {
        regexp::to_regexp(self)
    }

    /// Compiles [`CharacterSet::to_regexp`] into an anchored matcher that
    /// accepts exactly one member.
    pub fn to_matcher(&self) -> Result<Utf16Regex> {
        let pattern = if self.is_empty() {
            "[^\\s\\S]".to_string()
        } else {
            self.to_regexp()
        };
        Ok(Utf16RegexBuilder::new(&pattern).anchored(true).build()?)
    }
}

fn check_code_point(code_point: u32) -> Result<()> {
    if code_point > MAX_CODE_POINT {
        return Err(Error::InvalidCodePoint(code_point));
    }
    Ok(())
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for &code_point in self.iter() {
            push_encoded_code_point(&mut out, code_point);
        }
        f.write_str(&out)
    }
}

impl From<u32> for CharacterSet {
    fn from(value: u32) -> Self {
        Self::from_code_point(value)
    }
}

impl From<&str> for CharacterSet {
    fn from(value: &str) -> Self {
        value.chars().map(u32::from).collect()
    }
}

impl From<&[CodePointRange]> for CharacterSet {
    fn from(value: &[CodePointRange]) -> Self {
        Self::from_range(value)
    }
}

impl<const N: usize> From<[CodePointRange; N]> for CharacterSet {
    fn from(value: [CodePointRange; N]) -> Self {
        Self::from_range(&value)
    }
}

impl FromIterator<u32> for CharacterSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

impl Extend<u32> for CharacterSet {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, iter: I) {
        self.members.extend(iter);
    }
}

impl<'a> IntoIterator for &'a CharacterSet {
    type Item = &'a u32;
    type IntoIter = btree_set::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl BitOr for &CharacterSet {
    type Output = CharacterSet;

    fn bitor(self, rhs: Self) -> CharacterSet {
        self.union(rhs)
    }
}

impl BitAnd for &CharacterSet {
    type Output = CharacterSet;

    fn bitand(self, rhs: Self) -> CharacterSet {
        self.intersect(rhs)
    }
}

impl Sub for &CharacterSet {
    type Output = CharacterSet;

    fn sub(self, rhs: Self) -> CharacterSet {
        self.difference(rhs)
    }
}
