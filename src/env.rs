use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

/// Read-only key/value source the config loader pulls raw values from.
pub trait EnvSource {
    /// Raw value for `key`, or `None` when unset or not valid UTF-8.
    fn get(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ProcessEnv {
    /// Load `.env` from the working directory (or a parent) into the process
    /// environment, then return the source. Variables already set win.
    pub fn with_dotenv() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => debug!("Ignoring unreadable .env file: {e}"),
        }
        Self
    }

    /// Like [`ProcessEnv::with_dotenv`] but reads an explicit file path.
    pub fn with_dotenv_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Err(e) = dotenvy::from_path(&path) {
            debug!("Ignoring {}: {e}", path.display());
        }
        Self
    }
}

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}
