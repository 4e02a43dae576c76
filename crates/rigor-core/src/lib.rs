//! Rigor test engine
//!
//! Runs suites of role-tagged methods in a fixed lifecycle order:
//! - suite setup, once per suite
//! - case setup, the test itself, case teardown, per test
//! - suite teardown, once per suite
//!
//! Every test produces exactly one pass or fail outcome. Hook failures are
//! reported but never counted and never abort the run.
//!
//! # Example
//!
//! ```no_run
//! use rigor_core::{assert_equal, SessionReporter, Suite, SuiteDefinition};
//!
//! #[derive(Default)]
//! struct Arithmetic;
//!
//! let suite = Suite::new("Arithmetic", Arithmetic::default)
//!     .test("adds", |_| assert_equal(4, 2 + 2));
//!
//! let suites: Vec<&dyn SuiteDefinition> = vec![&suite];
//! let report = SessionReporter::new(std::io::stdout()).run(&suites);
//! assert_eq!(report.tally().passed, 1);
//! ```

pub mod assert;
pub mod executor;
pub mod inspector;
pub mod marker;
pub mod outcome;
pub mod session;
pub mod suite;

use thiserror::Error;

/// Errors raised while reading a suite definition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuiteError {
    #[error("Invalid suite '{suite}': {reason}")]
    Structural { suite: String, reason: String },

    #[error("Suite name must not be empty")]
    UnnamedSuite,
}

/// Result type for suite inspection
pub type SuiteResult<T> = Result<T, SuiteError>;

// Re-export main types
pub use assert::{assert_equal, assert_false, assert_true, Failure};
pub use executor::{InstanceMode, LifecycleExecutor, SuiteRun};
pub use inspector::{classify, RoleBinding};
pub use marker::Marker;
pub use outcome::{Invocation, Outcome, SessionTally};
pub use session::{SessionReport, SessionReporter};
pub use suite::{DeclaredMethod, Instance, MethodId, Suite, SuiteDefinition};
