//! The `check-config` flow: load, report, decide the exit status.

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::ConfigManager;
use crate::env::EnvSource;
use crate::logging::{self, LogGuard};
use crate::reporter;

/// Switches for [`run`].
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Emit redacted JSON instead of the text summary.
    pub json: bool,
    /// Violations are warnings rather than a failure.
    pub allow_invalid: bool,
    /// Install the global subscriber from the loaded config.
    pub init_logging: bool,
}

/// Result of a configuration check that got past loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Valid,
    /// Violations present but accepted with `allow_invalid`.
    Accepted { errors: usize },
    Invalid { errors: usize },
}

impl CheckOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, Self::Invalid { .. })
    }

    pub fn exit_code(self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Load the config from `env`, write the report to `out`, and classify it.
///
/// A missing required variable or malformed number is returned as `Err`.
pub fn run<E, W>(options: &CheckOptions, env: &E, out: &mut W) -> Result<CheckOutcome>
where
    E: EnvSource + ?Sized,
    W: Write,
{
    let manager = ConfigManager::load(env).context("failed to load configuration")?;
    let _log_guard: Option<LogGuard> = if options.init_logging {
        Some(logging::init(manager.config()).context("failed to initialize logging")?)
    } else {
        None
    };
    info!("Configuration loaded");

    let report = manager.validate();

    if options.json {
        reporter::write_config_json(&mut *out, manager.config())?;
        reporter::write_validation_json(&mut *out, &report)?;
    } else {
        reporter::write_config(&mut *out, manager.config())?;
    }

    if report.valid {
        info!("Configuration is valid");
        return Ok(CheckOutcome::Valid);
    }

    let errors = report.errors.len();
    for violation in &report.errors {
        if options.allow_invalid {
            warn!("{violation}");
        } else {
            error!("{violation}");
        }
    }

    if options.allow_invalid {
        warn!("Continuing with {errors} configuration error(s) (--allow-invalid)");
        Ok(CheckOutcome::Accepted { errors })
    } else {
        error!("Configuration has {errors} error(s)");
        Ok(CheckOutcome::Invalid { errors })
    }
}
