//! Load / reset / run / poll / read-back handshake.
//!
//! Drives the core through one validation run:
//!
//! ```text
//!   Idle ──load──▶ Loaded ──reset──▶ ResetAsserted ──release──▶ Running ─┬─▶ Done
//!                                                                        └─▶ TimedOut
//! ```
//!
//! The core is held in reset while memories are written, the sentinel word is
//! cleared so a stale result from a previous run cannot pass, and the done flag
//! is polled (the hardware has no interrupt) until it sets or the deadline
//! passes. A timeout ends the run; no result words are read after one. A job
//! whose blocks do not fit the memories is rejected before anything is written.

use std::fmt;
use std::time::Duration;

use crate::common::{BringupError, Result, SENTINEL_CLEAR};
use crate::config::{Config, HandshakeConfig};
use crate::sim::clock::{Clock, PollOutcome, PollPolicy, SystemClock, poll_until};
use crate::sim::loader::{LoadReport, write_words};
use crate::sim::verify::{self, Mismatch};
use crate::soc::builder::Platform;
use crate::soc::traits::{Device, check_block};

/// Protocol phase of a [`Handshake`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Nothing written yet.
    Idle,
    /// Program and data are in memory, sentinel cleared.
    Loaded,
    /// Reset line held at its active level.
    ResetAsserted,
    /// Reset released; the core is executing.
    Running,
    /// The done flag was observed.
    Done,
    /// The deadline passed without the done flag.
    TimedOut,
}

impl fmt::Display for HandshakeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::Loaded => "LOADED",
            Self::ResetAsserted => "RESET_ASSERTED",
            Self::Running => "RUNNING",
            Self::Done => "DONE",
            Self::TimedOut => "TIMED_OUT",
        };
        f.write_str(s)
    }
}

/// Words to place in data memory before the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPreload {
    /// Byte offset in data memory.
    pub offset: u64,
    /// Words to write.
    pub words: Vec<u32>,
}

/// What a successful run must leave in data memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// Only the done flag is checked.
    DoneOnly,
    /// A single marker word.
    Magic {
        /// Byte offset in data memory.
        offset: u64,
        /// Expected raw value.
        value: u32,
    },
    /// A sequence of signed result words.
    Words {
        /// Byte offset of the first word in data memory.
        offset: u64,
        /// Golden values.
        golden: Vec<i32>,
    },
}

/// Everything needed for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Name used in logs and reports.
    pub name: String,
    /// Instruction words, loaded at instruction memory offset 0.
    pub program: Vec<u32>,
    /// Initial data memory contents.
    pub preloads: Vec<DataPreload>,
    /// Data memory offset of the sentinel word to clear before the run.
    pub sentinel: Option<u64>,
    /// Pass criterion.
    pub expectation: Expectation,
}

impl Job {
    /// Creates a job that only loads `program` and waits for done.
    pub fn new(name: impl Into<String>, program: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            program,
            preloads: Vec::new(),
            sentinel: None,
            expectation: Expectation::DoneOnly,
        }
    }

    /// Adds a data memory preload.
    #[must_use]
    pub fn with_preload(mut self, offset: u64, words: Vec<u32>) -> Self {
        self.preloads.push(DataPreload { offset, words });
        self
    }

    /// Expects `value` at `offset` and clears that word before the run.
    #[must_use]
    pub fn expect_magic(mut self, offset: u64, value: u32) -> Self {
        self.sentinel = Some(offset);
        self.expectation = Expectation::Magic { offset, value };
        self
    }

    /// Expects the signed words `golden` starting at `offset`.
    #[must_use]
    pub fn expect_words(mut self, offset: u64, golden: Vec<i32>) -> Self {
        self.expectation = Expectation::Words { offset, golden };
        self
    }

    /// Clears the word at `offset` before the run.
    #[must_use]
    pub fn with_sentinel(mut self, offset: u64) -> Self {
        self.sentinel = Some(offset);
        self
    }
}

/// How the done flag was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Failed polls before done was seen.
    pub iterations: u64,
    /// Time from reset release to done.
    pub elapsed: Duration,
    /// Done register value on completion.
    pub status: u32,
}

/// Result of a run that reached done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Job name.
    pub name: String,
    /// Load reports: program first, then each preload in order.
    pub loads: Vec<LoadReport>,
    /// Completion details.
    pub completion: Completion,
    /// Raw words read back for the expectation.
    pub readback: Vec<u32>,
    /// Every word that differed from its expected value.
    pub mismatches: Vec<Mismatch>,
}

impl RunReport {
    /// Returns `true` if every load verified and nothing mismatched.
    pub fn passed(&self) -> bool {
        self.loads_verified() && self.mismatches.is_empty()
    }

    /// Returns `true` if every load read back as written.
    pub fn loads_verified(&self) -> bool {
        self.loads.iter().all(LoadReport::is_verified)
    }
}

/// Driver for one board, generic over the time source.
pub struct Handshake<'p, C: Clock = SystemClock> {
    platform: &'p mut Platform,
    policy: HandshakeConfig,
    reset_hold: Duration,
    clock: C,
    state: HandshakeState,
}

impl<'p> Handshake<'p, SystemClock> {
    /// Creates a driver that waits on the wall clock.
    pub fn new(platform: &'p mut Platform, config: &Config) -> Self {
        Self::with_clock(platform, config, SystemClock::new())
    }
}

impl<'p, C: Clock> Handshake<'p, C> {
    /// Creates a driver using `clock` for reset hold, poll interval, and deadline.
    pub fn with_clock(platform: &'p mut Platform, config: &Config, clock: C) -> Self {
        Self {
            platform,
            policy: config.handshake.clone(),
            reset_hold: config.control.reset_hold(),
            clock,
            state: HandshakeState::Idle,
        }
    }

    /// Current protocol phase.
    pub const fn state(&self) -> HandshakeState {
        self.state
    }

    /// Returns the clock.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    fn transition(&mut self, next: HandshakeState) {
        tracing::debug!("handshake {} -> {}", self.state, next);
        self.state = next;
    }

    /// Sets the GPIO direction and holds the core in reset so memory can be written safely.
    pub fn hold(&mut self) {
        let control = &mut self.platform.control;
        control.configure_outputs();
        control.assert_reset();
    }

    /// Checks that every block `job` touches fits in its memory.
    ///
    /// # Errors
    ///
    /// Returns [`BringupError::OutOfRange`] or [`BringupError::Misaligned`] for the
    /// first block that does not fit.
    pub fn validate(&self, job: &Job) -> Result<()> {
        let (iram, dram) = (&self.platform.iram, &self.platform.dram);
        check_block(iram, 0, job.program.len())?;
        if let Some(offset) = job.sentinel {
            check_block(dram, offset, 1)?;
        }
        for preload in &job.preloads {
            check_block(dram, preload.offset, preload.words.len())?;
        }
        match &job.expectation {
            Expectation::DoneOnly => Ok(()),
            Expectation::Magic { offset, .. } => check_block(dram, *offset, 1),
            Expectation::Words { offset, golden } => check_block(dram, *offset, golden.len()),
        }
    }

    /// Writes the program, data preloads, and sentinel.
    ///
    /// Returns one report per block written; read-back failures are non-fatal.
    ///
    /// # Errors
    ///
    /// Returns [`BringupError::OutOfRange`] or [`BringupError::Misaligned`] if a
    /// block does not fit. Blocks before it have already been written.
    pub fn load(&mut self, job: &Job) -> Result<Vec<LoadReport>> {
        let mut reports = Vec::with_capacity(1 + job.preloads.len());
        reports.push(write_words(&mut self.platform.iram, 0, &job.program)?);

        if let Some(offset) = job.sentinel {
            check_block(&self.platform.dram, offset, 1)?;
            self.platform.dram.write_u32(offset, SENTINEL_CLEAR);
            let readback = self.platform.dram.read_u32(offset);
            tracing::debug!("sentinel @ {offset:#x}: {readback:#x}");
        }

        for preload in &job.preloads {
            reports.push(write_words(
                &mut self.platform.dram,
                preload.offset,
                &preload.words,
            )?);
        }

        self.transition(HandshakeState::Loaded);
        Ok(reports)
    }

    /// Asserts reset and holds it for the configured time.
    pub fn reset(&mut self) {
        self.platform.control.assert_reset();
        let level = self.platform.control.reset_level();
        tracing::debug!("reset asserted, reset register {level:#x}");
        self.clock.sleep(self.reset_hold);
        self.transition(HandshakeState::ResetAsserted);
    }

    /// Releases reset; the core starts at instruction memory offset 0.
    pub fn release(&mut self) {
        self.platform.control.release_reset();
        self.transition(HandshakeState::Running);
    }

    /// Polls the done flag until it sets or the deadline passes.
    ///
    /// # Errors
    ///
    /// Returns [`BringupError::Timeout`] with the elapsed time, poll count, and
    /// last status value if done is never observed.
    pub fn wait_done(&mut self) -> Result<Completion> {
        let policy = PollPolicy {
            interval: self.policy.poll_interval(),
            timeout: self.policy.timeout(),
            progress_every: self.policy.progress_every,
        };

        let control = &mut self.platform.control;
        let pins = control.config().clone();
        let outcome = poll_until(
            &mut self.clock,
            policy,
            || control.status(),
            |status| pins.is_done(status),
        );

        match outcome {
            PollOutcome::Ready {
                iterations,
                elapsed,
                value,
            } => {
                tracing::info!(
                    "completion detected after {:.3}s ({iterations} iterations)",
                    elapsed.as_secs_f64()
                );
                self.transition(HandshakeState::Done);
                Ok(Completion {
                    iterations,
                    elapsed,
                    status: value,
                })
            }
            PollOutcome::Expired {
                iterations,
                elapsed,
                last_value,
            } => {
                tracing::error!(
                    "timeout after {:.3}s ({iterations} iterations), done flag {last_value:#x}",
                    elapsed.as_secs_f64()
                );
                self.transition(HandshakeState::TimedOut);
                Err(BringupError::Timeout {
                    elapsed,
                    iterations,
                    last_status: last_value,
                })
            }
        }
    }

    /// Reads the words named by `expectation` and compares them.
    ///
    /// # Errors
    ///
    /// Returns [`BringupError::OutOfRange`] or [`BringupError::Misaligned`] if the
    /// expected words do not fit in data memory.
    pub fn check(&mut self, expectation: &Expectation) -> Result<(Vec<u32>, Vec<Mismatch>)> {
        let checked = match expectation {
            Expectation::DoneOnly => (Vec::new(), Vec::new()),
            Expectation::Magic { offset, value } => {
                check_block(&self.platform.dram, *offset, 1)?;
                let word = self.platform.dram.read_u32(*offset);
                tracing::info!("result at {offset:#x}: {word:#010x}");
                let mismatches: Vec<Mismatch> =
                    verify::compare_word(*value, word).into_iter().collect();
                (vec![word], mismatches)
            }
            Expectation::Words { offset, golden } => {
                check_block(&self.platform.dram, *offset, golden.len())?;
                let words = self.platform.dram.read_words(*offset, golden.len());
                let got: Vec<i32> = words.iter().copied().map(verify::as_signed).collect();
                tracing::debug!("got:      {got:?}");
                tracing::debug!("expected: {golden:?}");
                let mismatches = verify::compare(golden, &words);
                (words, mismatches)
            }
        };
        Ok(checked)
    }

    /// Runs `job` end to end.
    ///
    /// Load verification failures and result mismatches are collected in the
    /// report; a timeout or a block that does not fit aborts the run.
    ///
    /// # Errors
    ///
    /// Returns [`BringupError::OutOfRange`] or [`BringupError::Misaligned`] before
    /// touching the board if the job does not fit its memories, and
    /// [`BringupError::Timeout`] if the done flag never sets.
    pub fn run(&mut self, job: &Job) -> Result<RunReport> {
        tracing::info!("running {} ({} instructions)", job.name, job.program.len());
        self.validate(job)?;

        self.hold();
        let loads = self.load(job)?;
        if loads.iter().any(|r| !r.is_verified()) {
            tracing::warn!("{}: memory did not verify, results are suspect", job.name);
        }

        self.reset();
        self.release();

        let completion = match self.wait_done() {
            Ok(completion) => completion,
            Err(err) => {
                if let Some(offset) = job.sentinel {
                    let sentinel = self.platform.dram.read_u32(offset);
                    tracing::debug!("sentinel @ {offset:#x}: {sentinel:#x}");
                }
                return Err(err);
            }
        };

        let (readback, mismatches) = self.check(&job.expectation)?;
        for m in &mismatches {
            tracing::warn!("{}: {m}", job.name);
        }

        let report = RunReport {
            name: job.name.clone(),
            loads,
            completion,
            readback,
            mismatches,
        };

        if report.passed() {
            tracing::info!("{}: PASSED", job.name);
        } else {
            tracing::warn!(
                "{}: FAILED ({} mismatches)",
                job.name,
                report.mismatches.len()
            );
        }
        Ok(report)
    }
}

impl<C: Clock + fmt::Debug> fmt::Debug for Handshake<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handshake")
            .field("platform", &self.platform)
            .field("policy", &self.policy)
            .field("state", &self.state)
            .field("clock", &self.clock)
            .finish()
    }
}
