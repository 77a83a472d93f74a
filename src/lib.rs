//! Environment-driven configuration for the Polymarket trading bot.
//!
//! Build a [`ConfigManager`] once at start-up and hand it to whatever needs
//! settings; there is no global instance.

pub mod check;
pub mod config;
pub mod env;
pub mod logging;
pub mod reporter;
pub mod validate;

pub use config::{BotConfig, ConfigError, ConfigManager};
pub use env::{EnvSource, ProcessEnv};
pub use validate::ValidationReport;
