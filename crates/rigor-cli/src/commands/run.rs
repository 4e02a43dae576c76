//! Run command - execute the built-in suites

use crate::suites;
use anyhow::Result;
use rigor_core::{InstanceMode, LifecycleExecutor, SessionReporter, SessionTally, SuiteDefinition};
use std::io::{self, Write};

/// Arguments for the run command
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// Output the session report as JSON
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Instance sharing policy for every suite
    pub instance_mode: InstanceMode,
}

/// Run the session and write the report to `out`
pub fn run(args: RunArgs, out: &mut impl Write) -> Result<SessionTally> {
    let builtin = suites::builtin();
    let suites: Vec<&dyn SuiteDefinition> = builtin.iter().map(|s| s.as_ref()).collect();
    let executor = LifecycleExecutor::new().with_instance_mode(args.instance_mode);

    if args.json {
        let report = SessionReporter::new(io::sink())
            .with_executor(executor)
            .run(&suites);
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(report.tally());
    }

    if args.no_color {
        colored::control::set_override(false);
    }

    let report = SessionReporter::new(&mut *out)
        .with_executor(executor)
        .with_color(!args.no_color)
        .run(&suites);

    if args.no_color {
        colored::control::unset_override();
    }

    Ok(report.tally())
}
