use std::io::{self, Write};

use serde_json::Value;

use crate::config::BotConfig;
use crate::validate::ValidationReport;

/// Redacted JSON view of `config`: the private key is replaced by a
/// `has_private_key` flag.
pub fn config_json(config: &BotConfig) -> Value {
    let mut value = serde_json::to_value(config).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.insert(
            "has_private_key".to_string(),
            Value::Bool(config.has_private_key()),
        );
    }
    value
}

/// Print the text summary of `config` to stdout.
pub fn report_config(config: &BotConfig) {
    println!("{}", config.describe());
}

/// Write the text summary of `config`.
pub fn write_config(out: &mut impl Write, config: &BotConfig) -> io::Result<()> {
    writeln!(out, "{}", config.describe())
}

/// Write the redacted config as pretty-printed JSON.
pub fn write_config_json(out: &mut impl Write, config: &BotConfig) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &config_json(config))?;
    writeln!(out)
}

/// Write a validation report as a single JSON line.
pub fn write_validation_json(out: &mut impl Write, report: &ValidationReport) -> io::Result<()> {
    serde_json::to_writer(&mut *out, report)?;
    writeln!(out)
}
