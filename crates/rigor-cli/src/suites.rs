//! Built-in demonstration suites

use rigor_core::{assert_equal, assert_false, assert_true, Failure, Suite, SuiteDefinition};
use tracing::info;

#[derive(Default)]
pub struct BooleanChecks;

#[derive(Default)]
pub struct EqualityChecks;

/// Holds a connection that its suite setup never manages to open
#[derive(Default)]
pub struct ResilientSetup {
    connected: bool,
}

fn boolean_checks() -> Suite<BooleanChecks> {
    Suite::new("BooleanChecks", BooleanChecks::default)
        .suite_setup("globalSetup", |_| {
            info!("suite setup for BooleanChecks");
            Ok(())
        })
        .case_setup("beforeEach", |_| {
            info!("executing before each");
            Ok(())
        })
        .test("testMethod1", |_| assert_true(true))
        .test("testMethod2", |_| assert_false(false))
        .case_teardown("afterEach", |_| {
            info!("executing after each");
            Ok(())
        })
        .suite_teardown("globalTeardown", |_| {
            info!("suite teardown for BooleanChecks");
            Ok(())
        })
}

fn equality_checks() -> Suite<EqualityChecks> {
    Suite::new("EqualityChecks", EqualityChecks::default)
        .suite_setup("globalSetup", |_| {
            info!("suite setup for EqualityChecks");
            Ok(())
        })
        .case_setup("setUp", |_| {
            info!("setting up for EqualityChecks");
            Ok(())
        })
        .test("testAssertEqual", |_| assert_equal(5, 5))
        .test("testAssertEqualFailure", |_| assert_equal(5, 3))
        .test("testMethod3", |_| assert_true(false))
        .case_teardown("tearDown", |_| {
            info!("tearing down for EqualityChecks");
            Ok(())
        })
        .suite_teardown("globalTeardown", |_| {
            info!("suite teardown for EqualityChecks");
            Ok(())
        })
}

fn resilient_setup() -> Suite<ResilientSetup> {
    Suite::new("ResilientSetup", ResilientSetup::default)
        .suite_setup("connect", |_| Err(Failure::new("connection refused")))
        .helper("describe", |s| {
            info!(connected = s.connected, "helper is never scheduled");
            Ok(())
        })
        .test("runsWithoutConnection", |s| assert_false(s.connected))
        .test("stillCounted", |_| assert_equal("ok", "ok"))
        .case_teardown("closeCursor", |_| panic!("cursor already closed"))
}

/// Every built-in suite, in session order
pub fn builtin() -> Vec<Box<dyn SuiteDefinition>> {
    vec![
        Box::new(boolean_checks()),
        Box::new(equality_checks()),
        Box::new(resilient_setup()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigor_core::classify;

    #[test]
    fn test_builtin_suites_classify() {
        let suites = builtin();
        assert_eq!(suites.len(), 3);

        let counts: Vec<_> = suites
            .iter()
            .map(|s| classify(s.as_ref()).unwrap().tests.len())
            .collect();
        assert_eq!(counts, vec![2, 3, 2]);
    }

    #[test]
    fn test_resilient_setup_skips_helper() {
        let suite = resilient_setup();
        let binding = classify(&suite).unwrap();
        assert!(binding.tests.iter().all(|t| t.name != "describe"));
        assert_eq!(binding.suite_setup.unwrap().name, "connect");
        assert_eq!(binding.case_teardown.unwrap().name, "closeCursor");
    }
}
