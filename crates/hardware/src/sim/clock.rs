//! Time sources and bounded polling.
//!
//! The hardware exposes no interrupt, only a flag, so waiting for it is a
//! sleep-then-check loop with a deadline. The loop takes its notion of time
//! from a [`Clock`] so that tests can drive it with [`ManualClock`] and never
//! touch the wall clock.

use std::thread;
use std::time::{Duration, Instant};

/// A monotonic time source that can also block.
pub trait Clock {
    /// Time elapsed since an arbitrary, fixed origin.
    fn now(&self) -> Duration;
    /// Blocks (or pretends to) for `dur`.
    fn sleep(&mut self, dur: Duration);
}

/// Wall-clock time via [`Instant`] and [`thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose origin is the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, dur: Duration) {
        thread::sleep(dur);
    }
}

/// Virtual time that only moves when slept on or advanced explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: Duration,
    sleeps: u64,
}

impl ManualClock {
    /// Creates a clock at time zero.
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
            sleeps: 0,
        }
    }

    /// Moves time forward without counting a sleep.
    pub fn advance(&mut self, dur: Duration) {
        self.now += dur;
    }

    /// Number of `sleep` calls made so far.
    pub const fn sleeps(&self) -> u64 {
        self.sleeps
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, dur: Duration) {
        self.now += dur;
        self.sleeps += 1;
    }
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn sleep(&mut self, dur: Duration) {
        (**self).sleep(dur);
    }
}

/// Interval, deadline, and progress cadence for [`poll_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between checks.
    pub interval: Duration,
    /// Give up once this much time has passed since the first check.
    pub timeout: Duration,
    /// Log progress every this many failed checks (0 disables).
    pub progress_every: u64,
}

/// How a bounded poll ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The condition held.
    Ready {
        /// Failed checks before the successful one.
        iterations: u64,
        /// Time from the first check to the successful one.
        elapsed: Duration,
        /// Value observed on the successful check.
        value: u32,
    },
    /// The deadline passed first.
    Expired {
        /// Failed checks made.
        iterations: u64,
        /// Time from the first check to the last one.
        elapsed: Duration,
        /// Value observed on the last check.
        last_value: u32,
    },
}

impl PollOutcome {
    /// Returns `true` for [`PollOutcome::Ready`].
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Number of failed checks, whichever way the poll ended.
    pub const fn iterations(&self) -> u64 {
        match self {
            Self::Ready { iterations, .. } | Self::Expired { iterations, .. } => *iterations,
        }
    }
}

/// Repeatedly calls `sample` until `done` accepts the sample or the deadline passes.
///
/// Each round reads once, returns if the value is accepted, checks the
/// deadline, then sleeps for `policy.interval`. The condition is always
/// checked at least once, even with a zero timeout.
///
/// Time only moves through `clock`, so a zero `policy.interval` on a clock
/// that does not advance by itself (such as [`ManualClock`]) never expires.
/// [`crate::Config::validate`] rejects a zero interval for that reason.
///
/// # Arguments
///
/// * `clock` - Time source used for the deadline and the sleeps.
/// * `policy` - Interval, deadline, and progress cadence.
/// * `sample` - Reads the current status value.
/// * `done` - Decides whether a status value means completion.
pub fn poll_until<C, P, F>(
    clock: &mut C,
    policy: PollPolicy,
    mut sample: P,
    done: F,
) -> PollOutcome
where
    C: Clock + ?Sized,
    P: FnMut() -> u32,
    F: Fn(u32) -> bool,
{
    let start = clock.now();
    let mut iterations = 0u64;

    loop {
        let value = sample();
        let elapsed = clock.now().saturating_sub(start);

        if done(value) {
            return PollOutcome::Ready {
                iterations,
                elapsed,
                value,
            };
        }

        if elapsed > policy.timeout {
            return PollOutcome::Expired {
                iterations,
                elapsed,
                last_value: value,
            };
        }

        iterations += 1;
        if policy.progress_every != 0 && iterations % policy.progress_every == 0 {
            tracing::debug!(
                "  {iterations} iters ({:.2}s) flag={value:#x}",
                elapsed.as_secs_f64()
            );
        }

        clock.sleep(policy.interval);
    }
}
