//! Built-in validation workloads.
//!
//! The bubble-sort program exercises forwarding, load-use stalls, taken and
//! not-taken branches, and jumps in one run, and its result is easy to check
//! on the host: the array at `array_base` must come back sorted.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::LayoutConfig;
use crate::sim::handshake::Job;

/// In-place ascending bubble sort over 32 words at `0x1040`.
///
/// Writes `0xDEADBEEF` to `0x2000` when finished, then spins.
pub const SORT_PROGRAM: [u32; 23] = [
    0x00001537, // lui   a0, 0x1
    0x04050513, // addi  a0, a0, 64        ; a0 = 0x1040
    0x01f00293, // addi  t0, zero, 31      ; outer count
    0x02028e63, // beq   t0, zero, +60     ; -> done
    0x01f00313, // addi  t1, zero, 31      ; inner count
    0x00050593, // addi  a1, a0, 0
    0x02030463, // beq   t1, zero, +40     ; -> outer step
    0x0005a383, // lw    t2, 0(a1)
    0x0045ae03, // lw    t3, 4(a1)
    0x007e2eb3, // slt   t4, t3, t2
    0x000e8663, // beq   t4, zero, +12     ; skip swap
    0x01c5a023, // sw    t3, 0(a1)
    0x0075a223, // sw    t2, 4(a1)
    0x00458593, // addi  a1, a1, 4
    0xfff30313, // addi  t1, t1, -1
    0xfddff06f, // jal   zero, -36         ; -> inner test
    0xfff28293, // addi  t0, t0, -1
    0xfc9ff06f, // jal   zero, -56         ; -> outer test
    0x00002637, // lui   a2, 0x2
    0xdeadc6b7, // lui   a3, 0xdeadc
    0xeef68693, // addi  a3, a3, -273      ; a3 = 0xDEADBEEF
    0x00d62023, // sw    a3, 0(a2)
    0xff1ff06f, // jal   zero, -16         ; spin
];

/// Lower bound (inclusive) of generated array values.
pub const RANDOM_MIN: i32 = -1000;

/// Upper bound (exclusive) of generated array values.
pub const RANDOM_MAX: i32 = 1000;

/// Generates a reproducible array of `len` values in [`RANDOM_MIN`], [`RANDOM_MAX`]).
pub fn random_array(seed: u64, len: usize) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| rng.random_range(RANDOM_MIN..RANDOM_MAX))
        .collect()
}

/// Builds the sort job for `values`.
///
/// The array is preloaded at `layout.array_base()`, the status word is cleared,
/// and the golden result is `values` sorted ascending.
pub fn sort_job(layout: &LayoutConfig, values: &[i32]) -> Job {
    let mut golden = values.to_vec();
    golden.sort_unstable();

    Job::new("bubble_sort", SORT_PROGRAM.to_vec())
        .with_preload(
            layout.array_base(),
            values.iter().map(|&v| v as u32).collect(),
        )
        .with_sentinel(layout.status_addr())
        .expect_words(layout.array_base(), golden)
}
