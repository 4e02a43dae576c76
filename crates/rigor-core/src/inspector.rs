//! Suite inspection - classify declared methods by role

use crate::marker::Marker;
use crate::suite::{DeclaredMethod, SuiteDefinition};
use crate::{SuiteError, SuiteResult};
use std::collections::HashSet;
use tracing::warn;

/// Methods of one suite, grouped by lifecycle role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleBinding {
    pub suite_setup: Option<DeclaredMethod>,
    pub suite_teardown: Option<DeclaredMethod>,
    pub case_setup: Option<DeclaredMethod>,
    pub case_teardown: Option<DeclaredMethod>,
    /// Test methods in declaration order
    pub tests: Vec<DeclaredMethod>,
}

impl RoleBinding {
    /// The method bound to a hook marker, if any
    pub fn hook(&self, marker: Marker) -> Option<&DeclaredMethod> {
        match marker {
            Marker::SuiteSetup => self.suite_setup.as_ref(),
            Marker::SuiteTeardown => self.suite_teardown.as_ref(),
            Marker::CaseSetup => self.case_setup.as_ref(),
            Marker::CaseTeardown => self.case_teardown.as_ref(),
            Marker::Test => None,
        }
    }

    fn slot_mut(&mut self, marker: Marker) -> Option<&mut Option<DeclaredMethod>> {
        match marker {
            Marker::SuiteSetup => Some(&mut self.suite_setup),
            Marker::SuiteTeardown => Some(&mut self.suite_teardown),
            Marker::CaseSetup => Some(&mut self.case_setup),
            Marker::CaseTeardown => Some(&mut self.case_teardown),
            Marker::Test => None,
        }
    }

    /// True when nothing in the suite is tagged
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty() && Marker::ALL.iter().all(|m| self.hook(*m).is_none())
    }
}

/// Classify a suite's methods into lifecycle slots and tests
///
/// Untagged methods are dropped before any validation, so their names never
/// matter. Tagged methods need a unique, non-empty name because reports
/// identify them by name. When several methods carry the same hook marker
/// the last declared one wins and a warning is logged.
pub fn classify(suite: &dyn SuiteDefinition) -> SuiteResult<RoleBinding> {
    let suite_name = suite.name();
    if suite_name.trim().is_empty() {
        return Err(SuiteError::UnnamedSuite);
    }

    let mut binding = RoleBinding::default();
    let mut seen = HashSet::new();

    for method in suite.declared_methods()? {
        let Some(marker) = method.marker else {
            continue;
        };

        if method.name.trim().is_empty() {
            return Err(SuiteError::Structural {
                suite: suite_name.to_string(),
                reason: format!("method #{} has no name", method.id.0),
            });
        }
        if !seen.insert(method.name.clone()) {
            return Err(SuiteError::Structural {
                suite: suite_name.to_string(),
                reason: format!("method '{}' is declared more than once", method.name),
            });
        }

        match binding.slot_mut(marker) {
            Some(slot) => {
                let name = method.name.clone();
                if let Some(previous) = slot.replace(method) {
                    warn!(
                        suite = suite_name,
                        marker = %marker,
                        replaced = %previous.name,
                        kept = %name,
                        "duplicate hook marker, last declaration wins"
                    );
                }
            }
            None => binding.tests.push(method),
        }
    }

    Ok(binding)
}
