//! # B-Type Immediate Codec Tests
//!
//! Fixed regression vectors taken from hand-assembled test programs, the
//! range boundaries, sign behaviour, and the encode/decode round trip.

use proptest::prelude::*;
use rstest::rstest;

use rvbringup_core::BringupError;
use rvbringup_core::isa::branch::*;
use rvbringup_core::isa::rv32i::funct3;
use rvbringup_core::isa::{decode_b_type_imm, encode_b_type_imm};

// ══════════════════════════════════════════════════════════
// 1. Regression vectors
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::beq_forward_68(0x0404_8263, 68)]
#[case::beq_forward_44(0x0204_8663, 44)]
#[case::beq_forward_12(0x0004_8663, 12)]
#[case::beq_back_44(0xFC00_0AE3, -44)]
#[case::beq_back_68(0xFA00_0EE3, -68)]
fn test_decode_vectors(#[case] inst: u32, #[case] offset: i32) {
    assert_eq!(decode_b_type_imm(inst), offset);
}

#[test]
fn test_fields_of_back_branch() {
    let fields = BranchFields::extract(0xFA00_0EE3);
    assert_eq!(fields.sign, 1);
    assert_eq!(fields.bit_11, 1);
    assert_eq!(fields.bits_10_5, 0b11_1101);
    assert_eq!(fields.bits_4_1, 0b1110);
    assert_eq!(fields.unsigned(), 8124);
    assert_eq!(fields.offset(), -68);
}

#[test]
fn test_fields_display_lists_every_field() {
    let text = BranchFields::extract(0x0404_8263).to_string();
    assert!(text.contains("imm[12]"), "{text}");
    assert!(text.contains("imm[11]"), "{text}");
    assert!(text.contains("imm[10:5]"), "{text}");
    assert!(text.contains("imm[4:1]"), "{text}");
}

// ══════════════════════════════════════════════════════════
// 2. Range and sign
// ══════════════════════════════════════════════════════════

#[test]
fn test_boundaries_decode_in_range() {
    // Only the sign bit set: most negative offset.
    assert_eq!(decode_b_type_imm(0x8000_0063), B_IMM_MIN);
    // Every immediate bit set except sign: most positive offset.
    assert_eq!(decode_b_type_imm(0x7E00_0FE3), B_IMM_MAX);
    assert_eq!(decode_b_type_imm(B_IMM_FIELD_MASK), -2);
    assert_eq!(decode_b_type_imm(0), 0);
}

#[test]
fn test_boundaries_encode() {
    assert_eq!(encode_b_type_imm(B_IMM_MIN).unwrap(), 0x8000_0000);
    assert_eq!(encode_b_type_imm(B_IMM_MAX).unwrap(), 0x7E00_0F80);
    assert_eq!(encode_b_type_imm(0).unwrap(), 0);
}

#[test]
fn test_sign_bit_selects_sign() {
    assert!(decode_b_type_imm(0xFA00_0EE3) < 0);
    assert!(decode_b_type_imm(0x0404_8263) >= 0);
}

#[rstest]
#[case::odd(3)]
#[case::odd_negative(-1)]
#[case::past_max(4096)]
#[case::past_min(-4098)]
#[case::far(1 << 20)]
fn test_encode_rejects(#[case] offset: i32) {
    let err = encode_b_type_imm(offset).unwrap_err();
    assert!(matches!(
        err,
        BringupError::InvalidBranchOffset { offset: o } if o == i64::from(offset)
    ));
}

// ══════════════════════════════════════════════════════════
// 3. Round trip
// ══════════════════════════════════════════════════════════

#[test]
fn test_round_trip_every_even_offset() {
    for offset in (B_IMM_MIN..=B_IMM_MAX).step_by(2) {
        let bits = encode_b_type_imm(offset).unwrap();
        assert_eq!(bits & !B_IMM_FIELD_MASK, 0, "offset {offset}");
        assert_eq!(decode_b_type_imm(bits), offset, "offset {offset}");
    }
}

proptest! {
    #[test]
    fn prop_decode_is_even_and_in_range(inst in any::<u32>()) {
        let offset = decode_b_type_imm(inst);
        prop_assert_eq!(offset % 2, 0);
        prop_assert!((B_IMM_MIN..=B_IMM_MAX).contains(&offset));
    }

    #[test]
    fn prop_decode_ignores_non_immediate_bits(inst in any::<u32>()) {
        prop_assert_eq!(
            decode_b_type_imm(inst),
            decode_b_type_imm(inst & B_IMM_FIELD_MASK)
        );
    }

    #[test]
    fn prop_encode_of_decode_is_identity_on_fields(inst in any::<u32>()) {
        let bits = encode_b_type_imm(decode_b_type_imm(inst)).unwrap();
        prop_assert_eq!(bits, inst & B_IMM_FIELD_MASK);
    }

    #[test]
    fn prop_branch_round_trip(
        half in (B_IMM_MIN / 2)..=(B_IMM_MAX / 2),
        rs1 in 0u32..32,
        rs2 in 0u32..32,
    ) {
        let offset = half * 2;
        let inst = encode_branch(funct3::BNE, rs1, rs2, offset).unwrap();
        prop_assert_eq!(decode_b_type_imm(inst), offset);
    }
}

// ══════════════════════════════════════════════════════════
// 4. Whole instructions and targets
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(9, 68, 0x0404_8263)]
#[case(9, 44, 0x0204_8663)]
#[case(9, 12, 0x0004_8663)]
#[case(0, -44, 0xFC00_0AE3)]
#[case(0, -68, 0xFA00_0EE3)]
fn test_encode_branch_reproduces_vectors(#[case] rs1: u32, #[case] offset: i32, #[case] inst: u32) {
    assert_eq!(encode_branch(funct3::BEQ, rs1, 0, offset).unwrap(), inst);
}

#[test]
fn test_encode_branch_propagates_invalid_offset() {
    assert!(encode_branch(funct3::BEQ, 1, 2, 7).is_err());
}

#[test]
fn test_branch_target() {
    assert_eq!(branch_target(0x54, 0xFA00_0EE3), 0x54 - 68);
    assert_eq!(branch_target(0x0C, 0x0404_8263), 0x0C + 68);
}

#[test]
fn test_branch_target_wraps() {
    assert_eq!(branch_target(0, 0xFA00_0EE3), 0u32.wrapping_sub(68));
    assert_eq!(branch_target(u32::MAX - 3, 0x0004_8663), 8);
}
