//! Result verification against golden values.
//!
//! Words come off the bus unsigned; programs compute on signed integers, so
//! every word is reinterpreted as two's complement before comparison.
//! Comparison is exact and never stops early.

use std::fmt;

/// Reinterprets a bus word as a 32-bit two's-complement integer.
///
/// Words at or above `0x8000_0000` map to negative values.
#[inline]
pub const fn as_signed(word: u32) -> i32 {
    word as i32
}

/// One word that differs from its golden value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    /// Index into the golden sequence.
    pub index: usize,
    /// Golden value.
    pub expected: i32,
    /// Value read back, or `None` if fewer words were read than expected.
    pub actual: Option<i32>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.actual {
            Some(actual) => write!(
                f,
                "Mismatch [{}]: expected {}, got {}",
                self.index, self.expected, actual
            ),
            None => write!(
                f,
                "Mismatch [{}]: expected {}, got nothing",
                self.index, self.expected
            ),
        }
    }
}

/// Compares read-back words against a golden sequence.
///
/// Every index of `golden` is checked; all differences are returned in index
/// order. Extra words in `actual` beyond `golden.len()` are ignored.
pub fn compare(golden: &[i32], actual: &[u32]) -> Vec<Mismatch> {
    golden
        .iter()
        .enumerate()
        .filter_map(|(index, &expected)| {
            let actual = actual.get(index).copied().map(as_signed);
            (actual != Some(expected)).then_some(Mismatch {
                index,
                expected,
                actual,
            })
        })
        .collect()
}

/// Compares a single word against an expected raw value, e.g. a completion marker.
pub fn compare_word(expected: u32, actual: u32) -> Option<Mismatch> {
    (expected != actual).then_some(Mismatch {
        index: 0,
        expected: as_signed(expected),
        actual: Some(as_signed(actual)),
    })
}
