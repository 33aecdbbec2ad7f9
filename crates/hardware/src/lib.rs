//! RISC-V core bring-up library.
//!
//! This crate drives a pipelined RV32I core implemented in FPGA fabric and
//! checks its results from the host:
//! 1. **ISA:** B-type branch immediate decode/encode and branch disassembly.
//! 2. **SoC:** Instruction/data block RAM and the GPIO control block, either
//!    mapped from `/dev/mem` or backed by host memory.
//! 3. **Simulation:** Program loading, the reset/run/poll handshake, golden
//!    comparison, and the built-in workloads.
//! 4. **Configuration:** Memory map, control register layout, and timing.

/// Common types and constants (errors, word size, completion marker).
pub mod common;
/// Bring-up configuration (memory map, control block, layout, handshake timing).
pub mod config;
/// Instruction set helpers (field extraction, branch immediates, disassembly).
pub mod isa;
/// Loader, handshake, verification, and workloads.
pub mod sim;
/// Memory regions, control block, and platform assembly.
pub mod soc;

/// Error type shared by every fallible operation.
pub use crate::common::{BringupError, Result};
/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Handshake driver; construct with `Handshake::new` over a `Platform`.
pub use crate::sim::Handshake;
/// Instruction memory, data memory, and control block of one board.
pub use crate::soc::Platform;
