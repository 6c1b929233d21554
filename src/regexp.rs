//! UTF-16 aware regex synthesis.
//!
//! Supplementary code points are matched as a high surrogate followed by a
//! low surrogate. High surrogates sharing the same set of low surrogates are
//! merged into a single `[highs][lows]` alternative.

use std::collections::{BTreeMap, HashMap};

use crate::CharacterSet;
use crate::surrogate::{high_surrogate, low_surrogate};

// The lower bound has five hex digits, so no code point lands in this bucket.
const LONE_SURROGATE_START: u32 = 0xD8000;
const LONE_SURROGATE_END: u32 = 0xDBFF;

const BMP_END: u32 = 0xFFFF;

#[derive(Debug, Default)]
struct Partition {
    bmp: CharacterSet,
    lone_surrogates: CharacterSet,
    lows_by_high: BTreeMap<u32, CharacterSet>,
}

fn partition(set: &CharacterSet) -> Partition {
    let mut out = Partition::default();
    for &code_point in set {
        if is_lone_surrogate(code_point) {
            out.lone_surrogates.insert(code_point);
        } else if code_point <= BMP_END {
            out.bmp.insert(code_point);
        } else {
            out.lows_by_high
                .entry(high_surrogate(code_point))
                .or_default()
                .insert(low_surrogate(code_point));
        }
    }
    out
}

fn is_lone_surrogate(code_point: u32) -> bool {
    code_point >= LONE_SURROGATE_START && code_point <= LONE_SURROGATE_END
}

/// Regroups `high -> lows` into `lows range-string -> highs`, keeping the
/// order in which each distinct low set is first seen.
fn group_by_low_surrogates(lows_by_high: BTreeMap<u32, CharacterSet>) -> Vec<(String, CharacterSet)> {
    let mut groups: Vec<(String, CharacterSet)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (high, lows) in lows_by_high {
        let key = lows.to_range_string();
        match index.get(&key) {
            Some(&slot) => {
                groups[slot].1.insert(high);
            }
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, CharacterSet::from_code_point(high)));
            }
        }
    }

    groups
}

pub(crate) fn to_regexp(set: &CharacterSet) -> String {
    let Partition {
        bmp,
        lone_surrogates,
        lows_by_high,
    } = partition(set);
    let mut alternatives = Vec::new();

    if !bmp.is_empty() {
        alternatives.push(bmp.to_range_string());
    }

    for (lows, highs) in group_by_low_surrogates(lows_by_high) {
        alternatives.push(format!("{}{}", highs.to_range_string(), lows));
    }

    if !lone_surrogates.is_empty() {
        alternatives.push(lone_surrogates.to_range_string());
    }

    alternatives.join("|")
}
