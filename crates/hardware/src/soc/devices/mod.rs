//! Memory-mapped control devices.
//!
//! The bring-up design exposes a single control device: an AXI GPIO block
//! wired to the core's reset input and done output.

/// GPIO-based reset and done-flag control.
pub mod gpio;

pub use gpio::ControlBlock;
pub use crate::soc::traits::Device;
