//! End-to-end session tests
//!
//! Exercises inspection, execution and reporting together through the
//! public API, including the outcome-count guarantees.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rigor_core::{
    assert_equal, assert_false, assert_true, Failure, InstanceMode, LifecycleExecutor, Marker,
    Outcome, SessionReport, SessionReporter, SessionTally, Suite, SuiteDefinition,
};
use rstest::rstest;
use std::cell::Cell;
use std::io;
use std::rc::Rc;

#[derive(Default)]
struct Fixture;

fn run_session(suites: &[&dyn SuiteDefinition]) -> SessionReport {
    SessionReporter::new(io::sink()).run(suites)
}

fn test_results(report: &SessionReport) -> Vec<(String, Outcome)> {
    report
        .invocations()
        .filter(|i| i.marker == Marker::Test)
        .map(|i| (i.method.clone(), i.outcome.clone()))
        .collect()
}

fn boolean_suite() -> Suite<Fixture> {
    Suite::new("BooleanChecks", Fixture::default)
        .suite_setup("globalSetup", |_| Ok(()))
        .case_setup("beforeEach", |_| Ok(()))
        .test("testMethod1", |_| assert_true(true))
        .test("testMethod2", |_| assert_false(false))
        .case_teardown("afterEach", |_| Ok(()))
        .suite_teardown("globalTeardown", |_| Ok(()))
}

fn equality_suite() -> Suite<Fixture> {
    Suite::new("EqualityChecks", Fixture::default)
        .suite_setup("globalSetup", |_| Ok(()))
        .case_setup("setUp", |_| Ok(()))
        .test("testAssertEqual", |_| assert_equal(5, 5))
        .test("testAssertEqualFailure", |_| assert_equal(5, 3))
        .test("testMethod3", |_| assert_true(false))
        .case_teardown("tearDown", |_| Ok(()))
        .suite_teardown("globalTeardown", |_| Ok(()))
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_boolean_assertions_both_pass() {
    let suite = boolean_suite();
    let report = run_session(&[&suite]);

    assert_eq!(
        test_results(&report),
        vec![
            ("testMethod1".to_string(), Outcome::Passed),
            ("testMethod2".to_string(), Outcome::Passed),
        ]
    );
    assert_eq!(report.tally(), SessionTally { passed: 2, failed: 0 });
}

#[test]
fn test_equality_assertions_mixed() {
    let suite = equality_suite();
    let report = run_session(&[&suite]);

    assert_eq!(
        test_results(&report),
        vec![
            ("testAssertEqual".to_string(), Outcome::Passed),
            (
                "testAssertEqualFailure".to_string(),
                Outcome::Failed {
                    reason: "Test failed: expected 5 but got 3".to_string()
                }
            ),
            (
                "testMethod3".to_string(),
                Outcome::Failed {
                    reason: "Test failed: expected true but got false".to_string()
                }
            ),
        ]
    );
    assert_eq!(report.tally(), SessionTally { passed: 1, failed: 2 });
}

#[test]
fn test_failing_suite_setup_still_runs_tests() {
    let suite = Suite::new("BrokenSetup", Fixture::default)
        .suite_setup("connect", |_| Err(Failure::new("database unreachable")))
        .test("first", |_| Ok(()))
        .test("second", |_| Ok(()));

    let report = run_session(&[&suite]);

    let errors: Vec<_> = report
        .invocations()
        .filter(|i| i.outcome.is_lifecycle_error())
        .map(|i| (i.marker, i.outcome.reason().map(str::to_string)))
        .collect();
    assert_eq!(
        errors,
        vec![(
            Marker::SuiteSetup,
            Some("database unreachable".to_string())
        )]
    );
    assert_eq!(report.tally(), SessionTally { passed: 2, failed: 0 });
}

#[test]
fn test_whole_session_totals() {
    let first = boolean_suite();
    let second = equality_suite();
    let report = run_session(&[&first, &second]);

    assert_eq!(report.suites.len(), 2);
    assert_eq!(report.suites[0].suite, "BooleanChecks");
    assert_eq!(report.suites[1].suite, "EqualityChecks");
    assert_eq!(report.tally(), SessionTally { passed: 3, failed: 2 });
    assert_eq!(report.tally().total(), 5);
}

#[test]
fn test_running_twice_is_idempotent() {
    let first = boolean_suite();
    let second = equality_suite();
    let suites: Vec<&dyn SuiteDefinition> = vec![&first, &second];

    let a = run_session(&suites);
    let b = run_session(&suites);

    assert_eq!(test_results(&a), test_results(&b));
    assert_eq!(a.tally(), b.tally());
}

#[test]
fn test_untagged_methods_never_affect_the_tally() {
    let colliding = Suite::new("CollidingHelpers", Fixture::default)
        .helper("format", |_| Ok(()))
        .helper("format", |_| Ok(()))
        .test("one", |_| Ok(()))
        .test("two", |_| assert_equal(1, 2));
    let unnamed = Suite::new("UnnamedHelper", Fixture::default)
        .helper("", |_| Ok(()))
        .test("three", |_| Ok(()));

    let report = run_session(&[&colliding, &unnamed]);

    assert!(report.suites.iter().all(|s| s.error.is_none()));
    assert_eq!(
        test_results(&report)
            .into_iter()
            .map(|(name, _)| name)
            .collect::<Vec<_>>(),
        vec!["one", "two", "three"]
    );
    assert_eq!(report.tally(), SessionTally { passed: 2, failed: 1 });
}

// ============================================================================
// Lifecycle guarantees
// ============================================================================

#[test]
fn test_suite_hooks_run_once() {
    let setups = Rc::new(Cell::new(0));
    let teardowns = Rc::new(Cell::new(0));
    let (s, t) = (Rc::clone(&setups), Rc::clone(&teardowns));

    let suite = Suite::new("Counted", Fixture::default)
        .suite_setup("once_before", move |_| {
            s.set(s.get() + 1);
            Ok(())
        })
        .test("a", |_| Ok(()))
        .test("b", |_| Err(Failure::new("b broke")))
        .test("c", |_| Ok(()))
        .suite_teardown("once_after", move |_| {
            t.set(t.get() + 1);
            Ok(())
        });

    run_session(&[&suite]);
    assert_eq!(setups.get(), 1);
    assert_eq!(teardowns.get(), 1);
}

#[test]
fn test_case_setup_failure_only_touches_its_test() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);

    let suite = Suite::new("FlakySetup", Fixture::default)
        .case_setup("prepare", move |_| {
            counter.set(counter.get() + 1);
            if counter.get() == 2 {
                Err(Failure::new("second setup failed"))
            } else {
                Ok(())
            }
        })
        .test("one", |_| Ok(()))
        .test("two", |_| Ok(()))
        .test("three", |_| assert_equal(1, 2));

    let report = run_session(&[&suite]);
    assert_eq!(
        test_results(&report),
        vec![
            ("one".to_string(), Outcome::Passed),
            ("two".to_string(), Outcome::Passed),
            (
                "three".to_string(),
                Outcome::Failed {
                    reason: "Test failed: expected 1 but got 2".to_string()
                }
            ),
        ]
    );
}

#[rstest]
#[case(InstanceMode::PerInvocation, SessionTally { passed: 0, failed: 1 })]
#[case(InstanceMode::SharedSuite, SessionTally { passed: 1, failed: 0 })]
fn test_instance_mode_controls_suite_state(
    #[case] mode: InstanceMode,
    #[case] expected: SessionTally,
) {
    #[derive(Default)]
    struct Connection {
        open: bool,
    }

    let suite = Suite::new("Connection", Connection::default)
        .suite_setup("open", |c| {
            c.open = true;
            Ok(())
        })
        .test("is_open", |c| assert_true(c.open));

    let report = SessionReporter::new(io::sink())
        .with_executor(LifecycleExecutor::new().with_instance_mode(mode))
        .run(&[&suite]);
    assert_eq!(report.tally(), expected);
}

// ============================================================================
// Properties
// ============================================================================

fn hook(fails: bool) -> impl Fn(&mut Fixture) -> Result<(), Failure> {
    move |_| {
        if fails {
            Err(Failure::new("hook failed"))
        } else {
            Ok(())
        }
    }
}

proptest! {
    #[test]
    fn prop_one_outcome_per_test(
        tests in prop::collection::vec(any::<bool>(), 0..12),
        hooks in prop::array::uniform4(any::<bool>()),
    ) {
        let mut suite = Suite::new("Generated", Fixture::default)
            .suite_setup("suite_setup", hook(hooks[0]))
            .case_setup("case_setup", hook(hooks[1]))
            .case_teardown("case_teardown", hook(hooks[2]))
            .suite_teardown("suite_teardown", hook(hooks[3]));
        for (index, passes) in tests.iter().copied().enumerate() {
            suite = suite.test(format!("test_{}", index), move |_| assert_true(passes));
        }

        let report = run_session(&[&suite]);
        let results = test_results(&report);
        let expected_passed = tests.iter().filter(|p| **p).count();

        prop_assert_eq!(results.len(), tests.len());
        prop_assert_eq!(report.tally().passed, expected_passed);
        prop_assert_eq!(report.tally().failed, tests.len() - expected_passed);
        prop_assert_eq!(report.tally().total(), tests.len());
    }
}
