use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use polymarket_bot::config::PRIVATE_KEY_PLACEHOLDER;
use polymarket_bot::{ConfigError, ConfigManager, EnvSource};

/// Source backed by a fixed list of pairs, the way a test harness or an
/// embedding application would provide variables.
struct StaticEnv(&'static [(&'static str, &'static str)]);

impl EnvSource for StaticEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }
}

#[test]
fn template_env_loads_and_validates() {
    let env = StaticEnv(&[
        ("PRIVATE_KEY", PRIVATE_KEY_PLACEHOLDER),
        ("SOFTWARE_WS_URL", "ws://localhost:8080/prices"),
        ("TRADE_COOLDOWN", "30"),
        ("LOG_LEVEL", "DEBUG"),
        ("LOG_TO_FILE", "true"),
    ]);
    let manager = ConfigManager::load(&env).expect("config should load");

    assert!(!manager.has_private_key());
    assert_eq!(manager.config().software_ws_url, "ws://localhost:8080/prices");
    assert_eq!(manager.config().trade_cooldown_ms, 30_000);
    assert!(manager.config().log_to_file);

    let report = manager.validate();
    assert!(report.valid, "unexpected errors: {:?}", report.errors);
}

#[test]
fn missing_required_url_produces_no_manager() {
    let env = StaticEnv(&[("PRIVATE_KEY", "0x01"), ("CLOB_API_URL", "not-a-url")]);
    match ConfigManager::load(&env) {
        Err(ConfigError::MissingVar(var)) => assert_eq!(var, "SOFTWARE_WS_URL"),
        other => panic!("expected MissingVar, got {other:?}"),
    }
}

#[test]
fn invalid_values_are_reported_together() {
    let env = StaticEnv(&[
        ("SOFTWARE_WS_URL", "wss://feed.example.com"),
        ("CLOB_API_URL", "not-a-url"),
        ("DEFAULT_TRADE_AMOUNT", "-1"),
    ]);
    let report = ConfigManager::load(&env)
        .expect("invalid values still load")
        .validate();

    assert!(!report.valid);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors.iter().any(|e| e.contains("CLOB_API_URL")));
    assert!(report.errors.iter().any(|e| e.contains("DEFAULT_TRADE_AMOUNT")));
}

#[test]
fn managers_built_from_separate_sources_do_not_interfere() {
    let handles: Vec<_> = ["0.01", "0.02", "0.03"]
        .into_iter()
        .map(|threshold| {
            thread::spawn(move || {
                let mut env = HashMap::new();
                env.insert("SOFTWARE_WS_URL".to_string(), "wss://feed.example.com".to_string());
                env.insert("PRICE_DIFFERENCE_THRESHOLD".to_string(), threshold.to_string());
                let manager = ConfigManager::load(&env).expect("config should load");
                (threshold, manager.config().price_difference_threshold)
            })
        })
        .collect();

    for handle in handles {
        let (raw, loaded) = handle.join().expect("loader thread panicked");
        assert_eq!(loaded, raw.parse::<f64>().unwrap());
    }
}

#[test]
fn shared_manager_hands_out_independent_snapshots() {
    let env = StaticEnv(&[("SOFTWARE_WS_URL", "wss://feed.example.com")]);
    let manager = Arc::new(ConfigManager::load(&env).expect("config should load"));

    let reader = Arc::clone(&manager);
    let mut snapshot = thread::spawn(move || reader.snapshot())
        .join()
        .expect("reader thread panicked");
    snapshot.default_trade_amount = 999.0;

    assert_eq!(manager.config().default_trade_amount, 5.0);
    assert_eq!(manager.snapshot().default_trade_amount, 5.0);
}
