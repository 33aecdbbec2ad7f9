//! Validation runs against the core.
//!
//! Provides the pieces a bring-up session is built from:
//! 1. **Loading:** Hex program parsing and verified word writes.
//! 2. **Handshake:** Hold, load, reset, release, and bounded polling for done.
//! 3. **Checking:** Signed comparison of read-back words against golden values.
//! 4. **Workloads:** The built-in sort program and the named test-program suite.

/// Time sources and the bounded poll loop.
pub mod clock;
/// Load / reset / run / poll / read-back sequence.
pub mod handshake;
/// Hex program parsing and verified loads.
pub mod loader;
/// Named test-program suite runner.
pub mod suite;
/// Golden comparison.
pub mod verify;
/// Built-in programs.
pub mod workloads;

pub use clock::{Clock, ManualClock, SystemClock};
pub use handshake::{Expectation, Handshake, HandshakeState, Job, RunReport};
