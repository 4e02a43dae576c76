//! List command - show how each built-in suite is classified

use crate::suites;
use anyhow::Result;
use rigor_core::{classify, Marker};
use std::io::Write;

/// Print every suite's role binding to `out`
pub fn run(out: &mut impl Write) -> Result<()> {
    for suite in suites::builtin() {
        writeln!(out, "{}", suite.name())?;

        let binding = match classify(suite.as_ref()) {
            Ok(binding) => binding,
            Err(e) => {
                writeln!(out, "  error: {}", e)?;
                continue;
            }
        };

        for marker in [Marker::SuiteSetup, Marker::CaseSetup] {
            if let Some(hook) = binding.hook(marker) {
                writeln!(out, "  {}: {}", marker, hook.name)?;
            }
        }
        for test in &binding.tests {
            writeln!(out, "  {}: {}", Marker::Test, test.name)?;
        }
        for marker in [Marker::CaseTeardown, Marker::SuiteTeardown] {
            if let Some(hook) = binding.hook(marker) {
                writeln!(out, "  {}: {}", marker, hook.name)?;
            }
        }
    }

    Ok(())
}
