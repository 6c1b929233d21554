use characterset::{
    CharacterSet, CodePointRange, combine_surrogates, compress_range, expand_range,
    high_surrogate, low_surrogate,
};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseResult};

const PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/character_set_property_test.txt";
const DEFAULT_PROPTEST_CASES: u32 = 128;

fn proptest_cases() -> u32 {
    std::env::var("CHARACTERSET_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_PROPTEST_CASES)
}

// Clustered around the interesting boundaries so runs and plane crossings
// actually show up.
fn code_point_strategy() -> BoxedStrategy<u32> {
    prop_oneof![
        3 => 0x20u32..0x80,
        2 => 0xFFF0u32..0x10010,
        2 => 0x1D300u32..0x1D340,
        1 => 0x103F0u32..0x10810,
        1 => 0u32..=0x10FFFF,
    ]
    .boxed()
}

fn set_strategy() -> BoxedStrategy<CharacterSet> {
    vec(code_point_strategy(), 0..=40)
        .prop_map(|values| values.into_iter().collect())
        .boxed()
}

fn range_item_strategy() -> BoxedStrategy<CodePointRange> {
    prop_oneof![
        code_point_strategy().prop_map(CodePointRange::Single),
        (code_point_strategy(), 0u32..8)
            .prop_map(|(start, len)| CodePointRange::Span(start, start + len)),
    ]
    .boxed()
}

fn utf16_strategy() -> BoxedStrategy<Vec<u16>> {
    vec(
        prop_oneof![
            3 => 0x20u16..0x80,
            1 => 0xD800u16..0xDC00,
            1 => 0xDC00u16..0xE000,
            1 => any::<u16>(),
        ],
        0..=24,
    )
    .boxed()
}

fn encode_units(code_point: u32) -> Vec<u16> {
    if code_point > 0xFFFF {
        vec![
            high_surrogate(code_point) as u16,
            low_surrogate(code_point) as u16,
        ]
    } else {
        vec![code_point as u16]
    }
}

fn assert_regexp_matches_exactly_members(set: &CharacterSet, probes: &[u32]) -> TestCaseResult {
    let matcher = set
        .to_matcher()
        .map_err(|err| TestCaseError::fail(format!("{err:?} pattern={}", set.to_regexp())))?;

    for &code_point in set.iter().chain(probes) {
        let matched = matcher
            .is_match_utf16(&encode_units(code_point))
            .map_err(|err| TestCaseError::fail(format!("{err:?}")))?;
        prop_assert_eq!(
            matched,
            set.contains(code_point),
            "code point U+{:X} pattern={}",
            code_point,
            set.to_regexp()
        );
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn union_size_follows_inclusion_exclusion(a in set_strategy(), b in set_strategy()) {
        let union = a.union(&b);
        prop_assert!(union.size() >= a.size().max(b.size()));
        prop_assert_eq!(union.size(), a.size() + b.size() - a.intersect(&b).size());
    }

    #[test]
    fn self_difference_is_empty_and_self_subset_holds(a in set_strategy()) {
        prop_assert!(a.difference(&a).is_empty());
        prop_assert!(a.subset(&a));
        prop_assert!(CharacterSet::new().subset(&a));
    }

    #[test]
    fn difference_and_intersection_partition_the_set(a in set_strategy(), b in set_strategy()) {
        let left = a.difference(&b);
        let common = a.intersect(&b);
        prop_assert!(left.intersect(&common).is_empty());
        prop_assert!(left.union(&common).equals(&a));
        prop_assert!(common.subset(&b));
    }

    #[test]
    fn to_array_is_strictly_ascending(a in set_strategy()) {
        let values = a.to_array();
        prop_assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(values.len(), a.size());
    }

    #[test]
    fn compress_of_expand_keeps_membership(range in vec(range_item_strategy(), 0..=12)) {
        let original = CharacterSet::from_range(&range);
        let compressed = compress_range(&original.to_array());
        let rebuilt: CharacterSet = expand_range(&compressed).into_iter().collect();
        prop_assert_eq!(&rebuilt, &original);

        for item in &compressed {
            if let CodePointRange::Span(start, end) = *item {
                prop_assert!(end - start >= 2);
            }
        }
    }

    #[test]
    fn surrogate_pair_round_trip(code_point in 0x10000u32..=0x10FFFF) {
        let high = high_surrogate(code_point);
        let low = low_surrogate(code_point);
        prop_assert!((0xD800..=0xDBFF).contains(&high));
        prop_assert!((0xDC00..=0xDFFF).contains(&low));
        prop_assert_eq!(combine_surrogates(high, low), code_point);
    }

    #[test]
    fn utf16_decoding_agrees_with_std_for_valid_text(text in "\\PC{0,16}") {
        let units: Vec<u16> = text.encode_utf16().collect();
        prop_assert_eq!(CharacterSet::from_utf16(&units), CharacterSet::from(text.as_str()));
    }

    #[test]
    fn utf16_decoding_never_loses_units(units in utf16_strategy()) {
        let set = CharacterSet::from_utf16(&units);
        let reencoded: usize = set.iter().map(|&cp| encode_units(cp).len()).sum();
        prop_assert!(reencoded <= units.len());
        prop_assert!(set.size() <= units.len());
    }

    #[test]
    fn regexp_matches_exactly_the_members(
        set in set_strategy(),
        probes in vec(code_point_strategy(), 0..=24),
    ) {
        assert_regexp_matches_exactly_members(&set, &probes)?;
    }

    #[test]
    fn hex_range_string_round_trips_through_parser(set in set_strategy()) {
        let rendered = set.to_hex_range_string();
        prop_assert_eq!(characterset::parse_unicode_range(&rendered), set);
    }
}
