use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::env::{EnvSource, ProcessEnv};
use crate::validate::{self, ValidationReport};

/// Template value shipped in `.env.example`; equivalent to no key at all.
pub const PRIVATE_KEY_PLACEHOLDER: &str = "your_private_key_here";

pub const DEFAULT_CLOB_API_URL: &str = "https://clob.polymarket.com";
pub const DEFAULT_POLYGON_RPC_URL: &str = "https://polygon-rpc.com";
pub const DEFAULT_GAMMA_API_URL: &str = "https://gamma-api.polymarket.com";
pub const DEFAULT_POLYMARKET_WS_URL: &str =
    "wss://ws-subscriptions-clob.polymarket.com/ws/market";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
/// Polygon mainnet.
pub const DEFAULT_POLYGON_CHAIN_ID: u64 = 137;

/// Fatal errors raised while building a [`BotConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required but not set")]
    MissingVar(&'static str),

    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Resolved bot configuration.
///
/// Built once by [`ConfigManager::load`] and handed out by value; mutating a
/// copy never affects the manager's canonical instance.
#[derive(Clone, PartialEq, Serialize)]
pub struct BotConfig {
    // Wallet
    #[serde(skip_serializing)]
    pub private_key: Option<String>,
    /// Not populated by the loader.
    pub wallet_address: Option<String>,

    // API endpoints
    pub clob_api_url: String,
    pub polygon_chain_id: u64,
    pub polygon_rpc_url: String,
    pub gamma_api_url: String,

    // WebSocket endpoints
    pub software_ws_url: String,
    pub polymarket_ws_url: String,

    // Trading parameters
    pub price_difference_threshold: f64,
    pub stop_loss_amount: f64,
    pub take_profit_amount: f64,
    /// Cooldown between trades in milliseconds (`TRADE_COOLDOWN` is in seconds).
    pub trade_cooldown_ms: i64,
    pub default_trade_amount: f64,

    // Balance requirements
    pub min_usdc_balance: f64,
    pub min_matic_balance: f64,

    // Logging
    pub log_level: String,
    pub log_to_file: bool,

    // WebSocket reconnection
    pub max_reconnect_attempts: u32,
    pub base_reconnect_delay_ms: u64,
    pub max_reconnect_delay_ms: u64,
}

impl BotConfig {
    /// Build a config from `env`, applying defaults for unset or empty variables.
    pub fn from_source<E: EnvSource + ?Sized>(env: &E) -> Result<Self, ConfigError> {
        let reader = Reader { env };

        let private_key = match reader.var("PRIVATE_KEY") {
            Some(key) if key == PRIVATE_KEY_PLACEHOLDER => {
                warn!("PRIVATE_KEY still holds the template placeholder, treating it as unset");
                None
            }
            other => other,
        };

        let software_ws_url = reader
            .var("SOFTWARE_WS_URL")
            .ok_or(ConfigError::MissingVar("SOFTWARE_WS_URL"))?;

        let cooldown_secs: i64 = reader.number("TRADE_COOLDOWN", 30)?;
        let trade_cooldown_ms = cooldown_secs
            .checked_mul(1000)
            .ok_or_else(|| ConfigError::InvalidNumber {
                var: "TRADE_COOLDOWN",
                value: cooldown_secs.to_string(),
            })?;

        let config = Self {
            private_key,
            wallet_address: None,

            clob_api_url: reader.string("CLOB_API_URL", DEFAULT_CLOB_API_URL),
            polygon_chain_id: reader.number("POLYGON_CHAIN_ID", DEFAULT_POLYGON_CHAIN_ID)?,
            polygon_rpc_url: reader.string("POLYGON_RPC_URL", DEFAULT_POLYGON_RPC_URL),
            gamma_api_url: reader.string("GAMMA_API_URL", DEFAULT_GAMMA_API_URL),

            software_ws_url,
            polymarket_ws_url: reader.string("POLYMARKET_WS_URL", DEFAULT_POLYMARKET_WS_URL),

            price_difference_threshold: reader.number("PRICE_DIFFERENCE_THRESHOLD", 0.015)?,
            stop_loss_amount: reader.number("STOP_LOSS_AMOUNT", 0.005)?,
            take_profit_amount: reader.number("TAKE_PROFIT_AMOUNT", 0.01)?,
            trade_cooldown_ms,
            default_trade_amount: reader.number("DEFAULT_TRADE_AMOUNT", 5.0)?,

            min_usdc_balance: reader.number("MIN_USDC_BALANCE", 5.0)?,
            min_matic_balance: reader.number("MIN_MATIC_BALANCE", 0.05)?,

            log_level: reader.string("LOG_LEVEL", DEFAULT_LOG_LEVEL),
            log_to_file: reader.var("LOG_TO_FILE").as_deref() == Some("true"),

            max_reconnect_attempts: reader.number("MAX_RECONNECT_ATTEMPTS", 10)?,
            base_reconnect_delay_ms: reader.number("BASE_RECONNECT_DELAY", 5000)?,
            max_reconnect_delay_ms: reader.number("MAX_RECONNECT_DELAY", 60_000)?,
        };

        info!(
            "Loaded config: clob={} chain={} software_ws={} private_key={}",
            config.clob_api_url,
            config.polygon_chain_id,
            config.software_ws_url,
            if config.private_key.is_some() { "set" } else { "unset" },
        );
        Ok(config)
    }

    /// True when a usable private key was supplied.
    pub fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }

    /// Trade cooldown as a `Duration`; negative values clamp to zero.
    pub fn trade_cooldown(&self) -> Duration {
        Duration::from_millis(self.trade_cooldown_ms.max(0) as u64)
    }

    pub fn base_reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.base_reconnect_delay_ms)
    }

    pub fn max_reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.max_reconnect_delay_ms)
    }

    /// Human-readable summary of the non-secret settings.
    pub fn describe(&self) -> String {
        let rule = "=".repeat(60);
        let sep = "-".repeat(60);
        let key_status = if self.has_private_key() { "Set" } else { "Not set" };
        let to_file = if self.log_to_file { "Yes" } else { "No" };
        let lines = [
            rule.clone(),
            "BOT CONFIGURATION".to_string(),
            rule.clone(),
            format!("CLOB API URL: {}", self.clob_api_url),
            format!("Polygon Chain ID: {}", self.polygon_chain_id),
            format!("Polygon RPC: {}", self.polygon_rpc_url),
            format!("Gamma API: {}", self.gamma_api_url),
            sep.clone(),
            format!("Price Threshold: ${:.4}", self.price_difference_threshold),
            format!("Take Profit: ${:.4}", self.take_profit_amount),
            format!("Stop Loss: ${:.4}", self.stop_loss_amount),
            format!("Trade Amount: ${:.2}", self.default_trade_amount),
            format!("Trade Cooldown: {}s", self.trade_cooldown_ms as f64 / 1000.0),
            sep,
            format!("Private Key: {key_status}"),
            format!("Log Level: {}", self.log_level),
            format!("Log to File: {to_file}"),
            rule,
        ];
        lines.join("\n")
    }
}

// Manual impl so the private key never reaches logs through `{:?}`.
impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("wallet_address", &self.wallet_address)
            .field("clob_api_url", &self.clob_api_url)
            .field("polygon_chain_id", &self.polygon_chain_id)
            .field("polygon_rpc_url", &self.polygon_rpc_url)
            .field("gamma_api_url", &self.gamma_api_url)
            .field("software_ws_url", &self.software_ws_url)
            .field("polymarket_ws_url", &self.polymarket_ws_url)
            .field("price_difference_threshold", &self.price_difference_threshold)
            .field("stop_loss_amount", &self.stop_loss_amount)
            .field("take_profit_amount", &self.take_profit_amount)
            .field("trade_cooldown_ms", &self.trade_cooldown_ms)
            .field("default_trade_amount", &self.default_trade_amount)
            .field("min_usdc_balance", &self.min_usdc_balance)
            .field("min_matic_balance", &self.min_matic_balance)
            .field("log_level", &self.log_level)
            .field("log_to_file", &self.log_to_file)
            .field("max_reconnect_attempts", &self.max_reconnect_attempts)
            .field("base_reconnect_delay_ms", &self.base_reconnect_delay_ms)
            .field("max_reconnect_delay_ms", &self.max_reconnect_delay_ms)
            .finish()
    }
}

/// Owns the canonical [`BotConfig`] for the process.
///
/// Construct one at start-up and pass it (or an `Arc` of it) to the
/// components that need configuration.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: BotConfig,
}

impl ConfigManager {
    /// Load from the process environment after reading `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(&ProcessEnv::with_dotenv())
    }

    /// Load from an arbitrary source.
    pub fn load<E: EnvSource + ?Sized>(env: &E) -> Result<Self, ConfigError> {
        BotConfig::from_source(env).map(|config| Self { config })
    }

    /// Owned copy of the current configuration.
    pub fn snapshot(&self) -> BotConfig {
        self.config.clone()
    }

    /// Borrow the canonical configuration.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Run every validation rule; never fails.
    pub fn validate(&self) -> ValidationReport {
        validate::validate(&self.config)
    }

    pub fn has_private_key(&self) -> bool {
        self.config.has_private_key()
    }

    pub fn describe(&self) -> String {
        self.config.describe()
    }

    /// Print [`ConfigManager::describe`] to stdout.
    pub fn display(&self) {
        crate::reporter::report_config(&self.config);
    }
}

/// Reads and coerces variables from an [`EnvSource`].
struct Reader<'a, E: ?Sized> {
    env: &'a E,
}

impl<E: EnvSource + ?Sized> Reader<'_, E> {
    /// Raw value, with empty strings treated as unset.
    fn var(&self, key: &str) -> Option<String> {
        self.env.get(key).filter(|v| !v.is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.var(key).unwrap_or_else(|| {
            debug!("{key} not set, using default {default}");
            default.to_string()
        })
    }

    fn number<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr + fmt::Display,
    {
        match self.var(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { var: key, value: raw }),
            None => {
                debug!("{key} not set, using default {default}");
                Ok(default)
            }
        }
    }
}
