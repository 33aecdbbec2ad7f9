//! # Branch Disassembly Tests

use rstest::rstest;

use rvbringup_core::isa::branch::encode_branch;
use rvbringup_core::isa::disasm::{branch_mnemonic, disassemble_branch, opcode_name};
use rvbringup_core::isa::instruction::InstructionBits;
use rvbringup_core::isa::rv32i::{funct3, opcodes};

#[rstest]
#[case(0x0404_8263, "beq x9, x0, +68")]
#[case(0x0204_8663, "beq x9, x0, +44")]
#[case(0x0004_8663, "beq x9, x0, +12")]
#[case(0xFC00_0AE3, "beq x0, x0, -44")]
#[case(0xFA00_0EE3, "beq x0, x0, -68")]
fn test_disassemble_vectors(#[case] inst: u32, #[case] text: &str) {
    assert_eq!(disassemble_branch(inst).as_deref(), Some(text));
}

#[rstest]
#[case(funct3::BEQ, "beq")]
#[case(funct3::BNE, "bne")]
#[case(funct3::BLT, "blt")]
#[case(funct3::BGE, "bge")]
#[case(funct3::BLTU, "bltu")]
#[case(funct3::BGEU, "bgeu")]
fn test_every_condition(#[case] f3: u32, #[case] mnemonic: &str) {
    let inst = encode_branch(f3, 5, 6, -8).unwrap();
    assert_eq!(
        disassemble_branch(inst),
        Some(format!("{mnemonic} x5, x6, -8"))
    );
}

#[test]
fn test_reserved_funct3_is_none() {
    assert_eq!(branch_mnemonic(0b010), None);
    assert_eq!(branch_mnemonic(0b011), None);
    // beq x0, x0 with funct3 = 2
    assert_eq!(disassemble_branch(0x0000_2063), None);
}

#[test]
fn test_non_branch_is_none() {
    // addi a0, a0, 64
    assert_eq!(disassemble_branch(0x0405_0513), None);
    // jal zero, -16
    assert_eq!(disassemble_branch(0xFF1F_F06F), None);
}

#[test]
fn test_field_extraction() {
    let inst: u32 = 0x0404_8263;
    assert_eq!(inst.opcode(), opcodes::OP_BRANCH);
    assert_eq!(inst.funct3(), funct3::BEQ);
    assert_eq!(inst.rs1(), 9);
    assert_eq!(inst.rs2(), 0);

    // lw t3, 4(a1)
    let load: u32 = 0x0045_AE03;
    assert_eq!(load.opcode(), opcodes::OP_LOAD);
    assert_eq!(load.rd(), 28);
    assert_eq!(load.rs1(), 11);
}

#[rstest]
#[case(0x0000_1537, "lui")]
#[case(0x0405_0513, "op-imm")]
#[case(0x0005_A383, "load")]
#[case(0x007E_2EB3, "op")]
#[case(0x01C5_A023, "store")]
#[case(0xFDDF_F06F, "jal")]
#[case(0x0202_8E63, "branch")]
fn test_opcode_names_in_sort_program(#[case] inst: u32, #[case] name: &str) {
    assert_eq!(opcode_name(inst.opcode()), Some(name));
}

#[test]
fn test_unknown_opcode() {
    assert_eq!(opcode_name(0x7F), None);
}
