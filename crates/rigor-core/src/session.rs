//! Session reporter - run every suite and write the session report

use crate::executor::{LifecycleExecutor, SuiteRun};
use crate::inspector::classify;
use crate::marker::Marker;
use crate::outcome::{Invocation, Outcome, SessionTally};
use crate::suite::SuiteDefinition;
use chrono::Local;
use colored::*;
use serde::Serialize;
use std::fmt::Display;
use std::io::Write;
use tracing::{info, warn};

const RULE: &str = "=========================================";
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Everything a session produced
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub started_at: String,
    pub completed_at: String,
    pub suites: Vec<SuiteRun>,
    #[serde(flatten)]
    tally: SessionTally,
    total: usize,
}

impl SessionReport {
    /// Final pass/fail counts across all suites
    pub fn tally(&self) -> SessionTally {
        self.tally
    }

    /// Every invocation of every suite, in execution order
    pub fn invocations(&self) -> impl Iterator<Item = &Invocation> {
        self.suites.iter().flat_map(|s| s.invocations.iter())
    }
}

/// Drives inspection and execution per suite and writes the text report
pub struct SessionReporter<W: Write> {
    out: W,
    executor: LifecycleExecutor,
    color: bool,
}

impl<W: Write> SessionReporter<W> {
    /// Create a reporter writing plain text to `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            executor: LifecycleExecutor::new(),
            color: false,
        }
    }

    pub fn with_executor(mut self, executor: LifecycleExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// Colour the result tags
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Give back the output sink
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run `suites` in order and return the session report
    ///
    /// A suite that fails inspection is reported and skipped; nothing here
    /// ever stops the session early.
    pub fn run(&mut self, suites: &[&dyn SuiteDefinition]) -> SessionReport {
        let started_at = timestamp();
        let mut tally = SessionTally::new();
        let mut runs = Vec::with_capacity(suites.len());

        emit(&mut self.out, RULE);
        emit(&mut self.out, format!("TEST SESSION STARTED AT: {}", started_at));
        emit(&mut self.out, RULE);
        emit(&mut self.out, "");

        for suite in suites {
            emit(
                &mut self.out,
                format!("Running tests for suite: {}\n", suite.name()),
            );

            let run = match classify(*suite) {
                Ok(binding) => {
                    let out = &mut self.out;
                    let color = self.color;
                    self.executor.run(*suite, &binding, &mut |invocation: &Invocation| {
                        print_invocation(&mut *out, color, invocation)
                    })
                }
                Err(e) => {
                    warn!(suite = suite.name(), error = %e, "suite skipped");
                    emit(
                        &mut self.out,
                        format!(
                            "{} Suite inspection failed: {}\n",
                            error_tag(self.color),
                            e
                        ),
                    );
                    SuiteRun::rejected(suite.name(), e.to_string())
                }
            };

            tally.absorb(run.tally);
            runs.push(run);
        }

        let completed_at = timestamp();
        emit(&mut self.out, "");
        emit(&mut self.out, RULE);
        emit(
            &mut self.out,
            format!("TEST SESSION COMPLETED AT: {}", completed_at),
        );
        emit(&mut self.out, RULE);
        emit(&mut self.out, format!("TOTAL TESTS: {}", tally.total()));
        emit(&mut self.out, format!("PASSED: {}", tally.passed));
        emit(&mut self.out, format!("FAILED: {}", tally.failed));
        emit(&mut self.out, RULE);
        let _ = self.out.flush();

        info!(
            passed = tally.passed,
            failed = tally.failed,
            suites = runs.len(),
            "session finished"
        );

        SessionReport {
            started_at,
            completed_at,
            suites: runs,
            total: tally.total(),
            tally,
        }
    }
}

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Write one report line; the report never reacts to write errors
fn emit(out: &mut impl Write, line: impl Display) {
    let _ = writeln!(out, "{}", line);
}

fn paint(color: bool, tag: &str, with: Color) -> String {
    if color {
        tag.color(with).bold().to_string()
    } else {
        tag.to_string()
    }
}

/// Inspection failures and hook failures share one tag style
fn error_tag(color: bool) -> String {
    paint(color, "[ERROR]", Color::Red)
}

fn print_invocation(out: &mut impl Write, color: bool, invocation: &Invocation) {
    let name = &invocation.method;
    let line = match (&invocation.outcome, invocation.marker) {
        (Outcome::Passed, Marker::Test) => {
            format!("{} {}", paint(color, "[PASS]", Color::Green), name)
        }
        (Outcome::Failed { reason }, _) => format!(
            "{} {} failed: {}",
            paint(color, "[FAIL]", Color::Red),
            name,
            reason
        ),
        (Outcome::Passed, hook) => format!(
            "{} {}: {} executed.",
            paint(color, "[INFO]", Color::Cyan),
            hook,
            name
        ),
        (Outcome::LifecycleError { reason }, hook) => format!(
            "{} {} execution failed: {}",
            error_tag(color),
            hook,
            reason
        ),
    };
    emit(&mut *out, line);

    // blank line closes each test block and each suite-level hook
    if matches!(
        invocation.marker,
        Marker::SuiteSetup | Marker::CaseTeardown | Marker::SuiteTeardown
    ) {
        emit(out, "");
    }
}
