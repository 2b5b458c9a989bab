//! Store location settings.
//!
//! # Responsibility
//! - Resolve the database path and snapshot slot key for a host process.
//!
//! # Invariants
//! - Unset or blank environment values fall back to defaults.
//! - The slot key is never blank.

use std::path::PathBuf;

/// Environment variable overriding the SQLite database path.
pub const DB_PATH_ENV: &str = "VERIDIAN_DB_PATH";
/// Environment variable overriding the snapshot slot key.
pub const SLOT_KEY_ENV: &str = "VERIDIAN_SNAPSHOT_KEY";
/// Slot key used by existing installs.
pub const DEFAULT_SLOT_KEY: &str = "veridian_finance_core_v6";
const DEFAULT_DB_FILE: &str = "veridian.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub slot_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves settings through `lookup`, which maps a variable name to its
    /// value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            slot_key: non_blank(SLOT_KEY_ENV).unwrap_or(defaults.slot_key),
        }
    }
}
