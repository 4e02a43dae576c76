//! Role markers attachable to suite methods

use serde::Serialize;
use std::fmt;

/// The role a method plays in a suite's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// A unit of verification, produces a pass or fail
    Test,
    /// Runs once before any test of the suite
    SuiteSetup,
    /// Runs once after every test of the suite
    SuiteTeardown,
    /// Runs before each test
    CaseSetup,
    /// Runs after each test
    CaseTeardown,
}

impl Marker {
    /// All markers, in lifecycle order
    pub const ALL: [Marker; 5] = [
        Marker::SuiteSetup,
        Marker::CaseSetup,
        Marker::Test,
        Marker::CaseTeardown,
        Marker::SuiteTeardown,
    ];

    /// Whether this marker tags a setup or teardown hook
    pub fn is_hook(self) -> bool {
        !matches!(self, Marker::Test)
    }

    /// Display name used in report lines
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Test => "Test",
            Marker::SuiteSetup => "SuiteSetup",
            Marker::SuiteTeardown => "SuiteTeardown",
            Marker::CaseSetup => "CaseSetup",
            Marker::CaseTeardown => "CaseTeardown",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
