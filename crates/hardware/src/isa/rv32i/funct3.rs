//! RISC-V Base Integer (I) Branch Function Codes (funct3).
//!
//! The `funct3` field (bits 14-12) selects the comparison performed by a
//! conditional branch. Encodings `0b010` and `0b011` are reserved.

/// Branch Equal.
pub const BEQ: u32 = 0b000;
/// Branch Not Equal.
pub const BNE: u32 = 0b001;
/// Branch Less Than (signed).
pub const BLT: u32 = 0b100;
/// Branch Greater or Equal (signed).
pub const BGE: u32 = 0b101;
/// Branch Less Than Unsigned.
pub const BLTU: u32 = 0b110;
/// Branch Greater or Equal Unsigned.
pub const BGEU: u32 = 0b111;
