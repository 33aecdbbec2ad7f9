//! RISC-V Base Integer Instruction Set (RV32I).
//!
//! Only the encodings needed to recognise and assemble conditional branches live here.
//!
//! # Structure
//!
//! - `opcodes`: Major opcodes (bits 6-0).
//! - `funct3`: Branch condition codes (bits 14-12).

/// Function code 3 definitions for conditional branches.
pub mod funct3;

/// Base integer instruction set opcodes.
pub mod opcodes;
