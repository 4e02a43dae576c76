use anyhow::Result;
use clap::{Parser, Subcommand};
use rigor_core::InstanceMode;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod suites;

/// Rigor unit-test engine.
///
/// Runs suites of tagged test and lifecycle methods in a fixed order and
/// reports pass/fail totals. Hook failures are reported but never stop a run.
///
/// EXAMPLES:
///     rigor run                    Run the built-in suites
///     rigor run --json             Print the session report as JSON
///     rigor run --shared-instance  Share one instance per suite
///     rigor list                   Show how each suite is classified
///
/// ENVIRONMENT VARIABLES:
///     RIGOR_JSON           Set to '1' for JSON output by default
///     RIGOR_INSTANCE_MODE  'per-invocation' (default) or 'shared'
///     NO_COLOR             Set to disable colored output
///     RUST_LOG             Log filter for diagnostics on stderr
#[derive(Parser)]
#[command(name = "rigor")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Log engine diagnostics to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every built-in suite and print the session report
    ///
    /// Exits with status 1 when any test failed.
    ///
    /// EXAMPLES:
    ///     rigor run                Text report
    ///     rigor run --no-color     Plain text report
    ///     rigor run --json         JSON report
    #[command(visible_alias = "r")]
    Run {
        /// Output the session report as JSON
        #[arg(long)]
        json: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
        /// Share one suite instance across suite setup, tests and teardown
        #[arg(long)]
        shared_instance: bool,
    },

    /// Show each built-in suite's lifecycle methods without running them
    #[command(visible_alias = "ls")]
    List,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let cli_config = config::Config::from_env();

    match cli.command {
        Commands::Run {
            json,
            no_color,
            shared_instance,
        } => {
            // Command-line flags override environment variables
            let args = commands::run::RunArgs {
                json: json || cli_config.default_json,
                no_color: no_color || cli_config.no_color,
                instance_mode: if shared_instance {
                    InstanceMode::SharedSuite
                } else {
                    cli_config.instance_mode
                },
            };
            let tally = commands::run::run(args, &mut io::stdout())?;

            if tally.has_failures() {
                std::process::exit(1);
            }
        }
        Commands::List => {
            commands::list::run(&mut io::stdout())?;
        }
    }

    Ok(())
}
