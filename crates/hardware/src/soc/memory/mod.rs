//! Block RAM regions.
//!
//! This module implements the word-addressed memories the core executes from. It provides:
//! 1. **Bram:** A host-side buffer implementing [`Device`], used for offline runs and tests.
//! 2. **Physical:** A `/dev/mem` window onto the real AXI BRAM controllers (unix only).

/// Physical memory windows mapped through `/dev/mem`.
#[cfg(unix)]
pub mod phys;

use crate::common::WORD_BYTES;
use crate::soc::traits::{Device, check_word_access};

/// Word-addressed RAM held in host memory.
///
/// Behaves like an AXI BRAM controller: aligned 32-bit accesses only,
/// contents start zeroed.
#[derive(Clone, Debug)]
pub struct Bram {
    /// Region name used in diagnostics.
    name: String,
    /// Base address reported by `address_range`.
    base_addr: u64,
    /// Backing words.
    words: Vec<u32>,
}

impl Bram {
    /// Creates a zeroed BRAM of `size` bytes.
    ///
    /// # Arguments
    ///
    /// * `name` - Region name (e.g., `"IRAM"`).
    /// * `base_addr` - Address reported for this region.
    /// * `size` - Size in bytes; rounded down to a whole number of words.
    pub fn new(name: impl Into<String>, base_addr: u64, size: u64) -> Self {
        Self {
            name: name.into(),
            base_addr,
            words: vec![0; (size / WORD_BYTES) as usize],
        }
    }

    /// Returns the backing words.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Returns the size of the region in bytes.
    pub fn len(&self) -> u64 {
        self.words.len() as u64 * WORD_BYTES
    }

    /// Returns `true` if the region holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Device for Bram {
    fn name(&self) -> &str {
        &self.name
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, self.len())
    }

    fn read_u32(&mut self, offset: u64) -> u32 {
        check_word_access(&self.name, offset, self.len());
        self.words[(offset / WORD_BYTES) as usize]
    }

    fn write_u32(&mut self, offset: u64, val: u32) {
        check_word_access(&self.name, offset, self.len());
        self.words[(offset / WORD_BYTES) as usize] = val;
    }
}
