use serde::Serialize;
use url::Url;

use crate::config::BotConfig;

/// Outcome of [`validate`]: every failed rule, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Check trading parameters and endpoint URLs.
///
/// All rules run; failures accumulate rather than stopping at the first one.
/// NaN fails every numeric rule.
pub fn validate(config: &BotConfig) -> ValidationReport {
    let mut errors = Vec::new();

    let fractions = [
        ("PRICE_DIFFERENCE_THRESHOLD", config.price_difference_threshold),
        ("STOP_LOSS_AMOUNT", config.stop_loss_amount),
        ("TAKE_PROFIT_AMOUNT", config.take_profit_amount),
    ];
    for (name, value) in fractions {
        if !is_unit_fraction(value) {
            errors.push(format!("{name} must be between 0 and 1"));
        }
    }

    if config.default_trade_amount.is_nan() || config.default_trade_amount <= 0.0 {
        errors.push("DEFAULT_TRADE_AMOUNT must be greater than 0".to_string());
    }

    if config.trade_cooldown_ms < 0 {
        errors.push("TRADE_COOLDOWN must be non-negative".to_string());
    }

    let urls = [
        ("CLOB_API_URL", config.clob_api_url.as_str()),
        ("POLYGON_RPC_URL", config.polygon_rpc_url.as_str()),
    ];
    for (name, value) in urls {
        // `Url::parse` rejects relative references, so success means absolute.
        if Url::parse(value).is_err() {
            errors.push(format!("{name} is not a valid URL"));
        }
    }

    ValidationReport::from_errors(errors)
}

/// `value` in (0, 1].
fn is_unit_fraction(value: f64) -> bool {
    value > 0.0 && value <= 1.0
}
