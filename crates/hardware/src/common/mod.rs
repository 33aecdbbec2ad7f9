//! Common utilities and types used throughout the bring-up tooling.
//!
//! This module provides building blocks shared by all other modules:
//! 1. **Constants:** Word size, completion marker, and sentinel values.
//! 2. **Error Handling:** The crate-wide [`BringupError`] and [`Result`] alias.

/// Common constants used throughout the crate.
pub mod constants;

/// Error types.
pub mod error;

pub use constants::{MAGIC_DONE, SENTINEL_CLEAR, WORD_BYTES};
pub use error::{BringupError, Result};
