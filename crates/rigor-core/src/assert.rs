//! Assertion helpers
//!
//! Each helper returns `Err(Failure)` when its check does not hold, so test
//! bodies propagate failures with `?` instead of unwinding.

use std::fmt::Display;
use thiserror::Error;

/// A failure signal raised by a test or hook body
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Failure {
    message: String,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::new(message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Failure::new(message)
    }
}

/// Fail unless `condition` is true
pub fn assert_true(condition: bool) -> Result<(), Failure> {
    assert_equal(true, condition)
}

/// Fail unless `condition` is false
pub fn assert_false(condition: bool) -> Result<(), Failure> {
    assert_equal(false, condition)
}

/// Fail unless `expected == actual`
pub fn assert_equal<T>(expected: T, actual: T) -> Result<(), Failure>
where
    T: PartialEq + Display,
{
    if expected == actual {
        Ok(())
    } else {
        Err(Failure::new(format!(
            "Test failed: expected {} but got {}",
            expected, actual
        )))
    }
}
