//! # Polling Tests
//!
//! `poll_until` driven by a `ManualClock`, so every deadline is exact.

use std::cell::Cell;
use std::time::Duration;

use rvbringup_core::sim::clock::{Clock, ManualClock, PollOutcome, PollPolicy, poll_until};

fn policy(interval_ms: u64, timeout_ms: u64) -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(interval_ms),
        timeout: Duration::from_millis(timeout_ms),
        progress_every: 0,
    }
}

#[test]
fn test_manual_clock_only_moves_when_told() {
    let mut clock = ManualClock::new();
    assert_eq!(clock.now(), Duration::ZERO);
    clock.sleep(Duration::from_millis(3));
    clock.advance(Duration::from_millis(2));
    assert_eq!(clock.now(), Duration::from_millis(5));
    assert_eq!(clock.sleeps(), 1);
}

#[test]
fn test_ready_on_first_check() {
    let mut clock = ManualClock::new();
    let outcome = poll_until(&mut clock, policy(1, 10), || 1, |v| v & 1 != 0);
    assert_eq!(
        outcome,
        PollOutcome::Ready {
            iterations: 0,
            elapsed: Duration::ZERO,
            value: 1,
        }
    );
    assert_eq!(clock.sleeps(), 0);
}

#[test]
fn test_ready_after_n_failed_checks() {
    let mut clock = ManualClock::new();
    let reads = Cell::new(0u64);
    let sample = || {
        reads.set(reads.get() + 1);
        u32::from(reads.get() > 7)
    };

    let outcome = poll_until(&mut clock, policy(2, 1000), sample, |v| v != 0);

    assert!(outcome.is_ready());
    assert_eq!(outcome.iterations(), 7);
    assert_eq!(clock.sleeps(), 7);
    assert_eq!(clock.now(), Duration::from_millis(14));
}

#[test]
fn test_expires_just_past_deadline() {
    let mut clock = ManualClock::new();
    let outcome = poll_until(&mut clock, policy(1, 10), || 0x10, |v| v & 1 != 0);

    assert_eq!(
        outcome,
        PollOutcome::Expired {
            iterations: 11,
            elapsed: Duration::from_millis(11),
            last_value: 0x10,
        }
    );
    assert!(!outcome.is_ready());
}

#[test]
fn test_default_policy_expires_after_ten_seconds() {
    let mut clock = ManualClock::new();
    let outcome = poll_until(&mut clock, policy(1, 10_000), || 0, |v| v != 0);

    match outcome {
        PollOutcome::Expired { elapsed, iterations, .. } => {
            assert!(elapsed > Duration::from_secs(10));
            assert!(elapsed <= Duration::from_millis(10_001));
            assert_eq!(iterations, 10_001);
        }
        other => panic!("expected expiry, got {other:?}"),
    }
}

#[test]
fn test_zero_timeout_still_checks() {
    let mut clock = ManualClock::new();
    let checks = Cell::new(0u32);
    let outcome = poll_until(
        &mut clock,
        policy(1, 0),
        || {
            checks.set(checks.get() + 1);
            0
        },
        |v| v != 0,
    );
    assert!(!outcome.is_ready());
    assert!(checks.get() >= 1);
}

fn nap<C: Clock>(mut clock: C, ms: u64) {
    clock.sleep(Duration::from_millis(ms));
}

#[test]
fn test_clock_through_mut_reference() {
    let mut clock = ManualClock::new();
    nap(&mut clock, 4);
    nap(&mut clock, 1);
    assert_eq!(clock.now(), Duration::from_millis(5));
    assert_eq!(clock.sleeps(), 2);
}
