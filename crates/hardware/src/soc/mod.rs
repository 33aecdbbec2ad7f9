//! Hardware-facing components.
//!
//! This module organizes the regions the host drives during a run:
//! instruction and data block RAMs, the GPIO control block, and the
//! builder that assembles them into a [`Platform`].

/// Platform assembly from configuration.
pub mod builder;

/// Control devices (GPIO reset/done block).
pub mod devices;

/// Block RAM regions (host buffers and physical windows).
pub mod memory;

/// Device trait definitions for MMIO access.
pub mod traits;

pub use builder::Platform;
pub use traits::Device;
