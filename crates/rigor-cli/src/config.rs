//! CLI configuration via environment variables
//!
//! Flags always win; the environment only supplies defaults.

use rigor_core::InstanceMode;
use std::env;
use tracing::warn;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Default to JSON output (RIGOR_JSON=1)
    pub default_json: bool,
    /// Disable colored output (RIGOR_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
    /// Instance sharing policy (RIGOR_INSTANCE_MODE=per-invocation|shared)
    pub instance_mode: InstanceMode,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// An unrecognised instance mode is logged and replaced by the default.
    pub fn from_env() -> Self {
        let instance_mode = match env::var("RIGOR_INSTANCE_MODE") {
            Ok(value) => value.parse().unwrap_or_else(|e: String| {
                warn!(error = %e, "ignoring RIGOR_INSTANCE_MODE");
                InstanceMode::default()
            }),
            Err(_) => InstanceMode::default(),
        };

        Self {
            default_json: env::var("RIGOR_JSON")
                .map(|v| {
                    let lower = v.to_lowercase();
                    lower == "1" || lower == "true" || lower == "on"
                })
                .unwrap_or(false),
            no_color: env::var("RIGOR_NO_COLOR").is_ok() || env::var("NO_COLOR").is_ok(),
            instance_mode,
        }
    }
}
