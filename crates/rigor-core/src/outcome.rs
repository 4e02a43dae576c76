//! Invocation outcomes and pass/fail tallies

use crate::marker::Marker;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Result of invoking one method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Test completed without a failure signal
    Passed,
    /// Test raised a failure signal
    Failed { reason: String },
    /// A setup or teardown hook raised a failure signal
    LifecycleError { reason: String },
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    pub fn is_lifecycle_error(&self) -> bool {
        matches!(self, Outcome::LifecycleError { .. })
    }

    /// Failure message, if the invocation did not pass
    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Passed => None,
            Outcome::Failed { reason } | Outcome::LifecycleError { reason } => Some(reason),
        }
    }
}

/// A completed invocation of one suite method
#[derive(Debug, Clone, Serialize)]
pub struct Invocation {
    pub method: String,
    pub marker: Marker,
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

impl Invocation {
    pub fn new(
        method: impl Into<String>,
        marker: Marker,
        outcome: Outcome,
        duration: Duration,
    ) -> Self {
        Self {
            method: method.into(),
            marker,
            outcome,
            duration,
        }
    }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

/// Passed and failed test counts
///
/// Lifecycle errors are never counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionTally {
    pub passed: usize,
    pub failed: usize,
}

impl SessionTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// Count one outcome
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed { .. } => self.failed += 1,
            Outcome::LifecycleError { .. } => {}
        }
    }

    /// Add another tally's counts to this one
    pub fn absorb(&mut self, delta: SessionTally) {
        self.passed += delta.passed;
        self.failed += delta.failed;
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
