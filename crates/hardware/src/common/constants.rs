//! Constants shared by the codec, loader, and handshake.

/// Width of one memory word in bytes. All BRAM traffic is word-sized.
pub const WORD_BYTES: u64 = 4;

/// Completion marker written by test programs when they finish.
pub const MAGIC_DONE: u32 = 0xDEAD_BEEF;

/// Value the sentinel word is cleared to before each run.
pub const SENTINEL_CLEAR: u32 = 0x0000_0000;
