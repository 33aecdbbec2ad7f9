//! # Sort Workload Tests

use rvbringup_core::config::LayoutConfig;
use rvbringup_core::isa::branch::branch_target;
use rvbringup_core::isa::instruction::InstructionBits;
use rvbringup_core::isa::rv32i::opcodes;
use rvbringup_core::sim::handshake::Expectation;
use rvbringup_core::sim::workloads::{
    RANDOM_MAX, RANDOM_MIN, SORT_PROGRAM, random_array, sort_job,
};

#[test]
fn test_program_shape() {
    assert_eq!(SORT_PROGRAM.len(), 23);
    // lui a3, 0xdeadc; addi a3, a3, -273
    assert_eq!(SORT_PROGRAM[19], 0xDEAD_C6B7);
    assert_eq!(SORT_PROGRAM[20], 0xEEF6_8693);
}

#[test]
fn test_branches_stay_inside_program() {
    let end = SORT_PROGRAM.len() as u32 * 4;
    let targets: Vec<u32> = SORT_PROGRAM
        .iter()
        .enumerate()
        .filter(|(_, inst)| inst.opcode() == opcodes::OP_BRANCH)
        .map(|(i, &inst)| branch_target(i as u32 * 4, inst))
        .collect();

    assert_eq!(targets, vec![0x48, 0x40, 0x34]);
    assert!(targets.iter().all(|&t| t < end));
}

#[test]
fn test_random_array_is_reproducible() {
    assert_eq!(random_array(42, 32), random_array(42, 32));
    assert_ne!(random_array(42, 32), random_array(43, 32));
}

#[test]
fn test_random_array_range() {
    let values = random_array(5, 1000);
    assert_eq!(values.len(), 1000);
    assert!(values.iter().all(|v| (RANDOM_MIN..RANDOM_MAX).contains(v)));
    assert!(values.iter().any(|&v| v < 0));
}

#[test]
fn test_sort_job_layout() {
    let layout = LayoutConfig::default();
    let values = vec![3, -1, 2, -1000];
    let job = sort_job(&layout, &values);

    assert_eq!(job.name, "bubble_sort");
    assert_eq!(job.program, SORT_PROGRAM.to_vec());
    assert_eq!(job.sentinel, Some(0x2000));
    assert_eq!(job.preloads.len(), 1);
    assert_eq!(job.preloads[0].offset, 0x1040);
    assert_eq!(job.preloads[0].words, vec![3, 0xFFFF_FFFF, 2, 0xFFFF_FC18]);
    assert_eq!(
        job.expectation,
        Expectation::Words {
            offset: 0x1040,
            golden: vec![-1000, -1, 2, 3],
        }
    );
}
