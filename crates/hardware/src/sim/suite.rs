//! Named test-program suite.
//!
//! Each test is a hex program `<dir>/<name>.hex` that stores the completion
//! marker at the status address when it finishes. Tests run one after another
//! on the same board; an error in one test is recorded and the suite moves on.

use std::fmt;
use std::path::Path;

use crate::common::BringupError;
use crate::config::LayoutConfig;
use crate::sim::clock::Clock;
use crate::sim::handshake::{Handshake, Job};
use crate::sim::loader::load_hex_program;

/// Programs run when no names are given, in order.
pub const DEFAULT_TESTS: [&str; 9] = [
    "test_arithmetic",
    "test_forwarding",
    "test_load_use",
    "test_branch",
    "test_jal",
    "test_memory",
    "test_load_data",
    "test_complex",
    "test_complex_data",
];

/// How a single suite entry ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// Done observed, marker correct, memory verified.
    Passed,
    /// Done observed but the marker was wrong or memory did not verify.
    Failed {
        /// Marker word read back.
        result: u32,
    },
    /// Done never observed.
    TimedOut,
    /// The test could not be run (e.g. missing or malformed program file).
    Error(String),
}

impl TestOutcome {
    /// Returns `true` for [`TestOutcome::Passed`].
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("PASSED"),
            Self::Failed { result } => write!(f, "FAILED (result {result:#010x})"),
            Self::TimedOut => f.write_str("FAILED (timeout)"),
            Self::Error(msg) => write!(f, "ERROR ({msg})"),
        }
    }
}

/// Per-test outcomes in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    /// `(name, outcome)` for each test.
    pub results: Vec<(String, TestOutcome)>,
}

impl SuiteReport {
    /// Number of tests that passed.
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|(_, o)| o.is_pass()).count()
    }

    /// Number of tests that did not pass, errors included.
    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    /// Returns `true` if every test passed.
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, outcome) in &self.results {
            writeln!(f, "{name:<20} {outcome}")?;
        }
        write!(f, "Results: {} passed, {} failed", self.passed(), self.failed())
    }
}

/// Runs one named test from `dir`.
pub fn run_test<C: Clock>(
    handshake: &mut Handshake<'_, C>,
    layout: &LayoutConfig,
    dir: &Path,
    name: &str,
) -> TestOutcome {
    let path = dir.join(format!("{name}.hex"));
    let program = match load_hex_program(&path) {
        Ok(program) => program,
        Err(err) => {
            tracing::error!("{name}: {err}");
            return TestOutcome::Error(err.to_string());
        }
    };

    let job = Job::new(name, program).expect_magic(layout.status_addr(), layout.magic);
    match handshake.run(&job) {
        Ok(report) if report.passed() => TestOutcome::Passed,
        Ok(report) => TestOutcome::Failed {
            result: report.readback.first().copied().unwrap_or_default(),
        },
        Err(BringupError::Timeout { .. }) => TestOutcome::TimedOut,
        Err(err) => TestOutcome::Error(err.to_string()),
    }
}

/// Runs `names` in order, or [`DEFAULT_TESTS`] if `names` is empty.
pub fn run_suite<C: Clock>(
    handshake: &mut Handshake<'_, C>,
    layout: &LayoutConfig,
    dir: &Path,
    names: &[String],
) -> SuiteReport {
    let names: Vec<&str> = if names.is_empty() {
        DEFAULT_TESTS.to_vec()
    } else {
        names.iter().map(String::as_str).collect()
    };

    let mut report = SuiteReport::default();
    for name in names {
        let outcome = run_test(handshake, layout, dir, name);
        tracing::info!("{name}: {outcome}");
        report.results.push((name.to_string(), outcome));
    }

    tracing::info!(
        "Results: {} passed, {} failed",
        report.passed(),
        report.failed()
    );
    report
}
