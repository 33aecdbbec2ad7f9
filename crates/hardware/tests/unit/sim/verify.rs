//! # Verification Tests
//!
//! Signed reinterpretation and exhaustive golden comparison.

use pretty_assertions::assert_eq;
use rstest::rstest;

use rvbringup_core::sim::verify::{Mismatch, as_signed, compare, compare_word};

#[rstest]
#[case(0x0000_0000, 0)]
#[case(0x7FFF_FFFF, i32::MAX)]
#[case(0x8000_0000, i32::MIN)]
#[case(0xFFFF_FFFF, -1)]
#[case(0xFFFF_FC18, -1000)]
fn test_as_signed(#[case] word: u32, #[case] value: i32) {
    assert_eq!(as_signed(word), value);
}

#[test]
fn test_exact_match_has_no_mismatches() {
    let golden = [-5, 0, 7, 999];
    let words: Vec<u32> = golden.iter().map(|&v| v as u32).collect();
    assert!(compare(&golden, &words).is_empty());
}

#[rstest]
#[case(0)]
#[case(13)]
#[case(31)]
fn test_single_difference_reports_exactly_that_index(#[case] j: usize) {
    let golden: Vec<i32> = (0..32).map(|i| i * 3 - 40).collect();
    let mut words: Vec<u32> = golden.iter().map(|&v| v as u32).collect();
    words[j] = 0xFFFF_FFFF;

    let mismatches = compare(&golden, &words);

    assert_eq!(
        mismatches,
        vec![Mismatch {
            index: j,
            expected: golden[j],
            actual: Some(-1),
        }]
    );
}

#[test]
fn test_all_differences_collected_in_order() {
    let golden = [1, 2, 3, 4, 5];
    let words = [1, 9, 3, 9, 9];
    let indices: Vec<usize> = compare(&golden, &words).iter().map(|m| m.index).collect();
    assert_eq!(indices, vec![1, 3, 4]);
}

#[test]
fn test_short_readback_reports_missing_words() {
    let mismatches = compare(&[1, 2, 3], &[1]);
    assert_eq!(mismatches.len(), 2);
    assert_eq!(mismatches[0].actual, None);
    assert_eq!(mismatches[1].index, 2);
}

#[test]
fn test_extra_words_ignored() {
    assert!(compare(&[1, 2], &[1, 2, 3, 4]).is_empty());
}

#[test]
fn test_mismatch_display() {
    let m = Mismatch {
        index: 4,
        expected: -12,
        actual: Some(30),
    };
    assert_eq!(m.to_string(), "Mismatch [4]: expected -12, got 30");

    let missing = Mismatch {
        index: 9,
        expected: 1,
        actual: None,
    };
    assert_eq!(missing.to_string(), "Mismatch [9]: expected 1, got nothing");
}

#[test]
fn test_compare_word() {
    assert_eq!(compare_word(0xDEAD_BEEF, 0xDEAD_BEEF), None);
    let m = compare_word(0xDEAD_BEEF, 0).unwrap();
    assert_eq!(m.expected, 0xDEAD_BEEF_u32 as i32);
    assert_eq!(m.actual, Some(0));
}
