//! Program loading.
//!
//! This module gets hand-assembled programs into block RAM. It performs:
//! 1. **Parsing:** Hex text, one 32-bit word per line, into instruction words.
//! 2. **Writing:** Consecutive word stores into a region starting at a base offset.
//! 3. **Verification:** Reads every word back and records any that differ.

use std::fs;
use std::path::Path;

use crate::common::{BringupError, Result, WORD_BYTES};
use crate::soc::traits::{Device, check_block};

/// A word that did not read back as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadVerificationFailure {
    /// Byte offset within the region.
    pub offset: u64,
    /// Value written.
    pub written: u32,
    /// Value read back.
    pub read: u32,
}

/// Outcome of writing a block of words into a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Region name.
    pub region: String,
    /// Number of words written.
    pub words: usize,
    /// Words that read back differently.
    pub failures: Vec<LoadVerificationFailure>,
}

impl LoadReport {
    /// Returns `true` if every word read back as written.
    pub fn is_verified(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parses one hex word with an optional `0x`/`0X` prefix.
///
/// Only hex digits are accepted after the prefix, so signs and embedded
/// whitespace are rejected.
pub fn parse_hex_word(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Parses a hex program: one hexadecimal word per line, in execution order.
///
/// Surrounding whitespace is ignored, blank lines are skipped, and an
/// optional `0x`/`0X` prefix is accepted.
///
/// # Errors
///
/// Returns [`BringupError::HexParse`] with the 1-based line number of the
/// first line that is not a 32-bit hex value.
pub fn parse_hex_program(text: &str) -> Result<Vec<u32>> {
    let mut program = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let word = parse_hex_word(line).ok_or_else(|| BringupError::HexParse {
            line: idx + 1,
            text: line.to_string(),
        })?;
        program.push(word);
    }
    Ok(program)
}

/// Reads and parses a hex program file.
///
/// # Errors
///
/// Returns [`BringupError::Io`] if the file cannot be read, or
/// [`BringupError::HexParse`] if its contents are malformed.
pub fn load_hex_program(path: impl AsRef<Path>) -> Result<Vec<u32>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| BringupError::io(path, e))?;
    parse_hex_program(&text)
}

/// Writes `words` into `device` at `base + 4 * i` and verifies them by read-back.
///
/// Read-back differences do not stop the load: they are logged and returned
/// in the report so the caller can decide whether results are trustworthy.
///
/// # Errors
///
/// Returns [`BringupError::OutOfRange`] or [`BringupError::Misaligned`] without
/// writing anything if the block does not fit in `device`.
pub fn write_words<D: Device + ?Sized>(
    device: &mut D,
    base: u64,
    words: &[u32],
) -> Result<LoadReport> {
    check_block(device, base, words.len())?;
    device.write_words(base, words);

    let failures: Vec<_> = words
        .iter()
        .enumerate()
        .filter_map(|(i, &written)| {
            let offset = base + i as u64 * WORD_BYTES;
            let read = device.read_u32(offset);
            (read != written).then_some(LoadVerificationFailure {
                offset,
                written,
                read,
            })
        })
        .collect();

    let report = LoadReport {
        region: device.name().to_string(),
        words: words.len(),
        failures,
    };

    if report.is_verified() {
        tracing::info!("{}: {} words loaded, verify OK", report.region, report.words);
    } else {
        for f in &report.failures {
            tracing::warn!(
                "{}: word at {:#x} reads back {:#010x}, wrote {:#010x}",
                report.region,
                f.offset,
                f.read,
                f.written
            );
        }
    }

    Ok(report)
}
