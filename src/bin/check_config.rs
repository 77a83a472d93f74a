//! check-config — Load, display, and validate the bot configuration.
//!
//! Reads `.env` (unless `--no-dotenv`) and the process environment, prints a
//! summary of the resolved settings, and exits non-zero when a required
//! variable is missing or any validation rule fails.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use polymarket_bot::check::{self, CheckOptions};
use polymarket_bot::env::ProcessEnv;

#[derive(Parser)]
#[command(
    name = "check-config",
    about = "Load and validate the bot configuration from the environment"
)]
struct Cli {
    /// Print the redacted configuration and validation result as JSON
    #[arg(long)]
    json: bool,

    /// Report validation failures as warnings and exit successfully
    #[arg(long)]
    allow_invalid: bool,

    /// Do not read a .env file before loading
    #[arg(long, conflicts_with = "env_file")]
    no_dotenv: bool,

    /// Read variables from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let env = match (&cli.env_file, cli.no_dotenv) {
        (Some(path), _) => ProcessEnv::with_dotenv_file(path),
        (None, true) => ProcessEnv,
        (None, false) => ProcessEnv::with_dotenv(),
    };
    let options = CheckOptions {
        json: cli.json,
        allow_invalid: cli.allow_invalid,
        init_logging: true,
    };

    let outcome = check::run(&options, &env, &mut std::io::stdout().lock())?;
    Ok(outcome.exit_code())
}
