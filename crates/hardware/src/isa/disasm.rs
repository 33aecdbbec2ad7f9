//! Branch disassembler.
//!
//! Converts B-Type instruction encodings into the `beq x9, x0, +68` notation
//! used when hand-checking assembled test programs.
//!
//! # Usage
//!
//! ```
//! use rvbringup_core::isa::disasm::disassemble_branch;
//! let text = disassemble_branch(0x04048263);
//! assert_eq!(text.as_deref(), Some("beq x9, x0, +68"));
//! ```

use crate::isa::branch::decode_b_type_imm;
use crate::isa::instruction::InstructionBits;
use crate::isa::rv32i::{funct3, opcodes};

/// Returns the mnemonic for a branch `funct3`, or `None` for the reserved encodings.
pub const fn branch_mnemonic(f3: u32) -> Option<&'static str> {
    match f3 {
        funct3::BEQ => Some("beq"),
        funct3::BNE => Some("bne"),
        funct3::BLT => Some("blt"),
        funct3::BGE => Some("bge"),
        funct3::BLTU => Some("bltu"),
        funct3::BGEU => Some("bgeu"),
        _ => None,
    }
}

/// Returns the instruction class for a major opcode, for diagnostics.
pub const fn opcode_name(op: u32) -> Option<&'static str> {
    match op {
        opcodes::OP_LOAD => Some("load"),
        opcodes::OP_IMM => Some("op-imm"),
        opcodes::OP_AUIPC => Some("auipc"),
        opcodes::OP_STORE => Some("store"),
        opcodes::OP_REG => Some("op"),
        opcodes::OP_LUI => Some("lui"),
        opcodes::OP_BRANCH => Some("branch"),
        opcodes::OP_JALR => Some("jalr"),
        opcodes::OP_JAL => Some("jal"),
        _ => None,
    }
}

/// Disassembles a conditional branch.
///
/// Returns `None` when `inst` is not a branch or uses a reserved `funct3`.
pub fn disassemble_branch(inst: u32) -> Option<String> {
    if inst.opcode() != opcodes::OP_BRANCH {
        return None;
    }
    let mnemonic = branch_mnemonic(inst.funct3())?;
    Some(format!(
        "{} x{}, x{}, {:+}",
        mnemonic,
        inst.rs1(),
        inst.rs2(),
        decode_b_type_imm(inst)
    ))
}
