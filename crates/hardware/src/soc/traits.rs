//! Device trait for memory-mapped I/O.
//!
//! This module defines the `Device` trait implemented by every region the
//! handshake talks to. It provides:
//! 1. **Identification:** `name` and `address_range` for logging and bounds.
//! 2. **Access:** 32-bit word read/write at region-relative byte offsets.
//! 3. **Bulk helpers:** Default word-slice writes built on `write_u32`.
//!
//! The bring-up hardware exposes its block RAMs and GPIO through AXI slaves
//! that only accept aligned 32-bit transfers, so narrower accesses are not
//! part of the interface.

use crate::common::{BringupError, Result, WORD_BYTES};

/// Trait for memory-mapped regions exposed by the hardware under test.
///
/// Offsets are byte offsets relative to the start of the region and must be
/// word aligned and inside `address_range().1`; implementations panic otherwise.
/// Callers with untrusted offsets check them first with [`check_block`].
pub trait Device {
    /// Returns a short name for this region (e.g., `"IRAM"`, `"GPIO"`).
    fn name(&self) -> &str;
    /// Returns (`base_address`, `size_in_bytes`) for this region.
    fn address_range(&self) -> (u64, u64);
    /// Reads four bytes at the given region-relative offset.
    fn read_u32(&mut self, offset: u64) -> u32;
    /// Writes four bytes at the given region-relative offset.
    fn write_u32(&mut self, offset: u64, val: u32);

    /// Writes consecutive words starting at `offset` (default: word-by-word).
    fn write_words(&mut self, offset: u64, words: &[u32]) {
        for (i, word) in words.iter().enumerate() {
            self.write_u32(offset + i as u64 * WORD_BYTES, *word);
        }
    }

    /// Reads `count` consecutive words starting at `offset`.
    fn read_words(&mut self, offset: u64, count: usize) -> Vec<u32> {
        (0..count)
            .map(|i| self.read_u32(offset + i as u64 * WORD_BYTES))
            .collect()
    }
}

impl<D: Device + ?Sized> Device for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn address_range(&self) -> (u64, u64) {
        (**self).address_range()
    }

    fn read_u32(&mut self, offset: u64) -> u32 {
        (**self).read_u32(offset)
    }

    fn write_u32(&mut self, offset: u64, val: u32) {
        (**self).write_u32(offset, val);
    }
}

/// Panics with a descriptive message if a word access falls outside a region.
///
/// # Panics
///
/// When `offset` is misaligned or the word would extend past `size`.
#[track_caller]
pub fn check_word_access(name: &str, offset: u64, size: u64) {
    assert!(
        offset % WORD_BYTES == 0,
        "{name}: misaligned word access at offset {offset:#x}"
    );
    assert!(
        offset + WORD_BYTES <= size,
        "{name}: offset {offset:#x} outside region of {size:#x} bytes"
    );
}

/// Checks that `words` consecutive words starting at `offset` fit inside `device`.
///
/// # Errors
///
/// Returns [`BringupError::Misaligned`] for an offset that is not word aligned and
/// [`BringupError::OutOfRange`] if the block extends past the end of the region.
pub fn check_block<D: Device + ?Sized>(device: &D, offset: u64, words: usize) -> Result<()> {
    if offset % WORD_BYTES != 0 {
        return Err(BringupError::Misaligned {
            region: device.name().to_string(),
            offset,
        });
    }
    let size = device.address_range().1;
    let fits = (words as u64)
        .checked_mul(WORD_BYTES)
        .and_then(|len| offset.checked_add(len))
        .is_some_and(|end| end <= size);
    if fits {
        Ok(())
    } else {
        Err(BringupError::OutOfRange {
            region: device.name().to_string(),
            offset,
            words,
            size,
        })
    }
}
