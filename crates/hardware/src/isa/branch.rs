//! B-Type (conditional branch) immediate codec.
//!
//! The branch immediate is a 13-bit signed byte offset whose bit 0 is always
//! zero. The remaining twelve bits are scattered across the instruction so
//! that the register and funct3 fields stay at the same positions as in the
//! other formats:
//!
//! ```text
//!  31      30..25     24..20 19..15 14..12   11..8     7      6..0
//! +-------+----------+------+------+------+---------+-------+--------+
//! |imm[12]|imm[10:5] | rs2  | rs1  |funct3|imm[4:1] |imm[11]| opcode |
//! +-------+----------+------+------+------+---------+-------+--------+
//! ```
//!
//! [`decode_b_type_imm`] is total over `u32`; [`encode_b_type_imm`] is its
//! inverse over the even offsets in [`B_IMM_MIN`]..=[`B_IMM_MAX`].

use std::fmt;

use crate::common::{BringupError, Result};
use crate::isa::rv32i::opcodes::OP_BRANCH;

/// Total width of a RISC-V instruction in bits.
const INSTRUCTION_WIDTH: u32 = 32;

/// Bit shift for extracting B-Type immediate bit 11 (bit 7 of instruction).
const B_IMM_11_SHIFT: u32 = 7;

/// Bit mask for B-Type immediate bit 11.
const B_IMM_11_MASK: u32 = 1;

/// Bit shift for extracting B-Type immediate bits 4-1 (bits 8-11 of instruction).
const B_IMM_4_1_SHIFT: u32 = 8;

/// Bit mask for B-Type immediate bits 4-1 (4 bits).
const B_IMM_4_1_MASK: u32 = 0xF;

/// Bit shift for extracting B-Type immediate bits 10-5 (bits 25-30 of instruction).
const B_IMM_10_5_SHIFT: u32 = 25;

/// Bit mask for B-Type immediate bits 10-5 (6 bits).
const B_IMM_10_5_MASK: u32 = 0x3F;

/// Bit shift for extracting B-Type immediate bit 12 (bit 31 of instruction).
const B_IMM_12_SHIFT: u32 = 31;

/// Bit mask for B-Type immediate bit 12 (sign bit).
const B_IMM_12_MASK: u32 = 1;

/// Total number of bits in B-Type immediate (13 bits, sign-extended).
const B_IMM_BITS: u32 = 13;

/// Bit position of bit 12 in the reconstructed B-Type immediate.
const B_IMM_12_POS: u32 = 12;

/// Bit position of bit 11 in the reconstructed B-Type immediate.
const B_IMM_11_POS: u32 = 11;

/// Bit position of bits 10-5 in the reconstructed B-Type immediate.
const B_IMM_10_5_POS: u32 = 5;

/// Bit position of bits 4-1 in the reconstructed B-Type immediate.
const B_IMM_4_1_POS: u32 = 1;

/// Instruction bits occupied by the B-Type immediate.
pub const B_IMM_FIELD_MASK: u32 = 0xFE00_0F80;

/// Most negative encodable branch offset.
pub const B_IMM_MIN: i32 = -4096;

/// Most positive encodable branch offset.
pub const B_IMM_MAX: i32 = 4094;

/// The raw immediate fields of a B-Type instruction, as they sit in the encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BranchFields {
    /// `imm[12]`, instruction bit 31.
    pub sign: u32,
    /// `imm[11]`, instruction bit 7.
    pub bit_11: u32,
    /// `imm[10:5]`, instruction bits 30-25.
    pub bits_10_5: u32,
    /// `imm[4:1]`, instruction bits 11-8.
    pub bits_4_1: u32,
}

impl BranchFields {
    /// Extracts the immediate fields from an instruction word.
    pub const fn extract(inst: u32) -> Self {
        Self {
            sign: (inst >> B_IMM_12_SHIFT) & B_IMM_12_MASK,
            bit_11: (inst >> B_IMM_11_SHIFT) & B_IMM_11_MASK,
            bits_10_5: (inst >> B_IMM_10_5_SHIFT) & B_IMM_10_5_MASK,
            bits_4_1: (inst >> B_IMM_4_1_SHIFT) & B_IMM_4_1_MASK,
        }
    }

    /// Reassembles the 13-bit unsigned immediate with bit 0 forced to zero.
    pub const fn unsigned(self) -> u32 {
        (self.sign << B_IMM_12_POS)
            | (self.bit_11 << B_IMM_11_POS)
            | (self.bits_10_5 << B_IMM_10_5_POS)
            | (self.bits_4_1 << B_IMM_4_1_POS)
    }

    /// Returns the sign-extended byte offset.
    pub const fn offset(self) -> i32 {
        sign_extend(self.unsigned(), B_IMM_BITS)
    }

    /// Places the fields back at their instruction bit positions.
    pub const fn to_bits(self) -> u32 {
        (self.sign << B_IMM_12_SHIFT)
            | (self.bits_10_5 << B_IMM_10_5_SHIFT)
            | (self.bits_4_1 << B_IMM_4_1_SHIFT)
            | (self.bit_11 << B_IMM_11_SHIFT)
    }
}

impl fmt::Display for BranchFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "imm[12]   (bit 31):     {}", self.sign)?;
        writeln!(f, "imm[11]   (bit 7):      {}", self.bit_11)?;
        writeln!(
            f,
            "imm[10:5] (bits 30-25): {:06b} = {}",
            self.bits_10_5, self.bits_10_5
        )?;
        write!(
            f,
            "imm[4:1]  (bits 11-8):  {:04b} = {}",
            self.bits_4_1, self.bits_4_1
        )
    }
}

/// Decodes the immediate value of a B-Type instruction.
///
/// Every input is accepted; bits outside the immediate fields are ignored.
/// The result is always even and lies in [`B_IMM_MIN`]..=[`B_IMM_MAX`].
///
/// # Arguments
///
/// * `inst` - The 32-bit instruction encoding.
///
/// # Returns
///
/// The signed branch displacement in bytes, relative to the branch's PC.
pub const fn decode_b_type_imm(inst: u32) -> i32 {
    BranchFields::extract(inst).offset()
}

/// Encodes a branch offset into its B-Type immediate bit pattern.
///
/// Only the immediate bits are set (see [`B_IMM_FIELD_MASK`]); OR the result
/// with the opcode, register, and funct3 fields to form an instruction.
///
/// # Errors
///
/// Returns [`BringupError::InvalidBranchOffset`] when `offset` is odd or
/// outside [`B_IMM_MIN`]..=[`B_IMM_MAX`].
pub fn encode_b_type_imm(offset: i32) -> Result<u32> {
    if offset % 2 != 0 || !(B_IMM_MIN..=B_IMM_MAX).contains(&offset) {
        return Err(BringupError::InvalidBranchOffset {
            offset: i64::from(offset),
        });
    }

    let v = offset as u32;
    let fields = BranchFields {
        sign: (v >> B_IMM_12_POS) & B_IMM_12_MASK,
        bit_11: (v >> B_IMM_11_POS) & B_IMM_11_MASK,
        bits_10_5: (v >> B_IMM_10_5_POS) & B_IMM_10_5_MASK,
        bits_4_1: (v >> B_IMM_4_1_POS) & B_IMM_4_1_MASK,
    };
    Ok(fields.to_bits())
}

/// Assembles a complete conditional branch instruction.
///
/// # Arguments
///
/// * `funct3` - Branch condition (see [`crate::isa::rv32i::funct3`]).
/// * `rs1` - First source register index.
/// * `rs2` - Second source register index.
/// * `offset` - Byte displacement from the branch to its target.
///
/// # Errors
///
/// Propagates [`BringupError::InvalidBranchOffset`] from [`encode_b_type_imm`].
pub fn encode_branch(funct3: u32, rs1: u32, rs2: u32, offset: i32) -> Result<u32> {
    let imm = encode_b_type_imm(offset)?;
    Ok(imm | ((rs2 & 0x1F) << 20) | ((rs1 & 0x1F) << 15) | ((funct3 & 0x7) << 12) | OP_BRANCH)
}

/// Computes the address a branch at `pc` jumps to when taken.
///
/// Uses 32-bit wrapping arithmetic, matching the core's PC adder.
pub const fn branch_target(pc: u32, inst: u32) -> u32 {
    pc.wrapping_add_signed(decode_b_type_imm(inst))
}

/// Sign extends a value of `bits` width to a 32-bit signed integer.
const fn sign_extend(val: u32, bits: u32) -> i32 {
    let shift = INSTRUCTION_WIDTH - bits;
    (val as i32) << shift >> shift
}
