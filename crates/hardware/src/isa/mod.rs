//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the encodings and codecs needed to inspect hand-assembled test
//! programs before they are loaded into the core.
//!
//! # Modules
//!
//! * `branch`: B-Type immediate decode/encode and branch target arithmetic.
//! * `disasm`: Branch disassembly for human review.
//! * `instruction`: Fixed-position field extraction.
//! * `rv32i`: Base integer opcodes and branch function codes.

/// B-Type immediate codec.
pub mod branch;

/// Branch disassembler for diagnostics.
pub mod disasm;

/// Instruction bit extraction utilities.
pub mod instruction;

/// Base integer instruction set (32-bit RISC-V core instructions).
pub mod rv32i;

pub use branch::{decode_b_type_imm, encode_b_type_imm};
