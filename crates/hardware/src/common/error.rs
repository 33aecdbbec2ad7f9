//! Error definitions for bring-up operations.
//!
//! This module defines the single error type returned by fallible operations in this crate. It covers:
//! 1. **Input errors:** Unreadable or malformed program files and configuration documents.
//! 2. **Codec errors:** Branch offsets that cannot be represented in the B-type immediate.
//! 3. **Hardware errors:** Failed physical mappings, blocks that do not fit their region, and runs
//!    that never signalled completion.
//!
//! Verification mismatches and load read-back failures are deliberately *not* errors: they are
//! collected as data (see [`crate::sim::verify::Mismatch`] and [`crate::sim::loader::LoadReport`])
//! so that every difference can be reported together.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BringupError>;

/// Errors raised while decoding, loading, or driving the hardware under test.
#[derive(Debug, Error)]
pub enum BringupError {
    /// A file could not be read.
    #[error("could not read '{}': {source}", .path.display())]
    Io {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A line of a hex program file is not a valid 32-bit hexadecimal word.
    #[error("line {line}: '{text}' is not a 32-bit hex word")]
    HexParse {
        /// 1-based line number.
        line: usize,
        /// Offending text after trimming.
        text: String,
    },

    /// A branch offset is odd or outside the 13-bit signed immediate range.
    #[error("branch offset {offset} is not an even value in [-4096, 4094]")]
    InvalidBranchOffset {
        /// Requested offset in bytes.
        offset: i64,
    },

    /// The done flag was never observed before the deadline.
    #[error(
        "timed out after {:.3}s ({iterations} polls), last status {last_status:#x}",
        .elapsed.as_secs_f64()
    )]
    Timeout {
        /// Time spent polling.
        elapsed: Duration,
        /// Number of failed polls.
        iterations: u64,
        /// Last value read from the status register.
        last_status: u32,
    },

    /// A block of words does not fit inside its region.
    #[error("{region}: {words} words at offset {offset:#x} do not fit in {size:#x} bytes")]
    OutOfRange {
        /// Region name.
        region: String,
        /// Byte offset of the first word.
        offset: u64,
        /// Number of words in the block.
        words: usize,
        /// Region size in bytes.
        size: u64,
    },

    /// A word offset is not a multiple of four.
    #[error("{region}: misaligned word offset {offset:#x}")]
    Misaligned {
        /// Region name.
        region: String,
        /// Requested byte offset.
        offset: u64,
    },

    /// A configuration value is outside what the handshake can use.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A physical address window could not be mapped.
    #[error("failed to map {size:#x} bytes at {base:#x}: {reason}")]
    Map {
        /// Physical base address.
        base: u64,
        /// Window size in bytes.
        size: u64,
        /// OS-level reason.
        reason: String,
    },

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl BringupError {
    /// Wraps an I/O error together with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this error is a polling timeout.
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
