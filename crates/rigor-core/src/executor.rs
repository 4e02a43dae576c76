//! Lifecycle executor - run a classified suite in lifecycle order

use crate::assert::Failure;
use crate::inspector::RoleBinding;
use crate::marker::Marker;
use crate::outcome::{Invocation, Outcome, SessionTally};
use crate::suite::{DeclaredMethod, Instance, SuiteDefinition};
use serde::Serialize;
use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::Once;
use std::time::Instant;
use tracing::{debug, info};

/// How suite instances are handed out to invocations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceMode {
    /// Every invocation, hooks included, gets a freshly constructed instance
    #[default]
    PerInvocation,
    /// Suite setup, tests and suite teardown share one instance per suite;
    /// case hooks still get a fresh instance each
    SharedSuite,
}

impl InstanceMode {
    fn shares(self, marker: Marker) -> bool {
        self == InstanceMode::SharedSuite
            && matches!(
                marker,
                Marker::SuiteSetup | Marker::Test | Marker::SuiteTeardown
            )
    }
}

impl FromStr for InstanceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "per-invocation" | "fresh" => Ok(InstanceMode::PerInvocation),
            "shared" | "shared-suite" => Ok(InstanceMode::SharedSuite),
            other => Err(format!(
                "unknown instance mode '{}' (expected 'per-invocation' or 'shared')",
                other
            )),
        }
    }
}

impl fmt::Display for InstanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceMode::PerInvocation => f.write_str("per-invocation"),
            InstanceMode::SharedSuite => f.write_str("shared"),
        }
    }
}

/// All invocations of one suite, in execution order
#[derive(Debug, Clone, Serialize)]
pub struct SuiteRun {
    pub suite: String,
    /// Set when the suite could not be inspected and nothing ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub invocations: Vec<Invocation>,
    /// Pass/fail counts contributed by this suite
    pub tally: SessionTally,
}

impl SuiteRun {
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            error: None,
            invocations: Vec::new(),
            tally: SessionTally::new(),
        }
    }

    /// A suite that was rejected before execution
    pub fn rejected(suite: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(suite)
        }
    }

    /// Test outcomes only, hooks excluded
    pub fn test_outcomes(&self) -> impl Iterator<Item = &Invocation> {
        self.invocations.iter().filter(|i| i.marker == Marker::Test)
    }

    fn record(&mut self, invocation: Invocation, observer: &mut dyn FnMut(&Invocation)) {
        self.tally.record(&invocation.outcome);
        observer(&invocation);
        self.invocations.push(invocation);
    }
}

/// Runs suites method by method, one at a time
#[derive(Debug, Clone, Default)]
pub struct LifecycleExecutor {
    mode: InstanceMode,
}

impl LifecycleExecutor {
    /// Create an executor that builds a fresh instance per invocation
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how instances are shared between invocations
    pub fn with_instance_mode(mut self, mode: InstanceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn instance_mode(&self) -> InstanceMode {
        self.mode
    }

    /// Run every bound method of `suite`
    ///
    /// `observer` sees each invocation as soon as it completes. Hook failures
    /// are recorded as lifecycle errors and never skip a test.
    pub fn run(
        &self,
        suite: &dyn SuiteDefinition,
        binding: &RoleBinding,
        observer: &mut dyn FnMut(&Invocation),
    ) -> SuiteRun {
        let mut run = SuiteRun::new(suite.name());
        let mut shared: Option<Instance> = None;

        info!(
            suite = suite.name(),
            tests = binding.tests.len(),
            mode = %self.mode,
            "running suite"
        );

        if let Some(hook) = &binding.suite_setup {
            self.run_hook(suite, hook, Marker::SuiteSetup, &mut shared, &mut run, observer);
        }

        for test in &binding.tests {
            if let Some(hook) = &binding.case_setup {
                self.run_hook(suite, hook, Marker::CaseSetup, &mut shared, &mut run, observer);
            }

            let start = Instant::now();
            let outcome = match self.call(suite, test, Marker::Test, &mut shared) {
                Ok(()) => Outcome::Passed,
                Err(failure) => Outcome::Failed {
                    reason: failure.message().to_string(),
                },
            };
            debug!(suite = suite.name(), test = %test.name, ?outcome, "test finished");
            run.record(
                Invocation::new(test.name.clone(), Marker::Test, outcome, start.elapsed()),
                observer,
            );

            if let Some(hook) = &binding.case_teardown {
                self.run_hook(suite, hook, Marker::CaseTeardown, &mut shared, &mut run, observer);
            }
        }

        if let Some(hook) = &binding.suite_teardown {
            self.run_hook(suite, hook, Marker::SuiteTeardown, &mut shared, &mut run, observer);
        }

        run
    }

    fn run_hook(
        &self,
        suite: &dyn SuiteDefinition,
        hook: &DeclaredMethod,
        marker: Marker,
        shared: &mut Option<Instance>,
        run: &mut SuiteRun,
        observer: &mut dyn FnMut(&Invocation),
    ) {
        let start = Instant::now();
        let outcome = match self.call(suite, hook, marker, shared) {
            Ok(()) => Outcome::Passed,
            Err(failure) => Outcome::LifecycleError {
                reason: failure.message().to_string(),
            },
        };
        debug!(suite = suite.name(), hook = %hook.name, %marker, ?outcome, "hook finished");
        run.record(
            Invocation::new(hook.name.clone(), marker, outcome, start.elapsed()),
            observer,
        );
    }

    /// Invoke one method, converting panics into failures
    fn call(
        &self,
        suite: &dyn SuiteDefinition,
        method: &DeclaredMethod,
        marker: Marker,
        shared: &mut Option<Instance>,
    ) -> Result<(), Failure> {
        if self.mode.shares(marker) {
            let mut instance = match shared.take() {
                Some(instance) => instance,
                None => guarded(|| suite.instantiate())?,
            };
            let result = guarded(|| suite.invoke(method.id, &mut instance));
            *shared = Some(instance);
            result
        } else {
            let mut instance = guarded(|| suite.instantiate())?;
            guarded(|| suite.invoke(method.id, &mut instance))
        }
    }
}

thread_local! {
    static GUARDED: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Wrap the process panic hook once so panics raised inside a guarded
/// invocation are logged at debug level instead of printed; every other
/// panic still reaches the previous hook.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if GUARDED.with(Cell::get) {
                debug!(panic = %info, "method panicked");
            } else {
                previous(info);
            }
        }));
    });
}

fn guarded<T>(f: impl FnOnce() -> Result<T, Failure>) -> Result<T, Failure> {
    install_quiet_hook();
    let outer = GUARDED.with(|g| g.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    GUARDED.with(|g| g.set(outer));

    match result {
        Ok(result) => result,
        Err(payload) => Err(Failure::new(panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "method panicked".to_string()
    }
}
