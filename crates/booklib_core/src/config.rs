//! Runtime configuration for catalog hosts.
//!
//! # Responsibility
//! - Describe where the catalog database lives and how logging is set up.
//! - Load `BOOKLIB_*` environment settings without global state.
//!
//! # Invariants
//! - `log_dir`, when set, is an absolute path.
//! - `busy_timeout` is at least one second.

use crate::logging::default_log_level;
use ::config::{Config, Environment, Map};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_PREFIX: &str = "BOOKLIB";
pub const ENV_DB_PATH: &str = "BOOKLIB_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "BOOKLIB_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "BOOKLIB_LOG_DIR";
pub const ENV_BUSY_TIMEOUT_SECS: &str = "BOOKLIB_DB_BUSY_TIMEOUT_SECS";

const DEFAULT_DB_FILE: &str = "booklib.db";
const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;
const IN_MEMORY_MARKER: &str = ":memory:";

/// Storage location for the catalog database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    Memory,
}

/// Configuration passed explicitly to bootstrap code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub database: DatabaseLocation,
    pub log_level: String,
    /// File logging is skipped when unset.
    pub log_dir: Option<PathBuf>,
    pub busy_timeout: Duration,
}

/// Settings as they arrive from the environment, before validation.
///
/// Keys are the variable names without the `BOOKLIB_` prefix, lowercased.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    db_path: Option<String>,
    log_level: Option<String>,
    log_dir: Option<String>,
    db_busy_timeout_secs: Option<u64>,
}

#[derive(Debug)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    Load(::config::ConfigError),
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "failed to load configuration: {err}"),
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<::config::ConfigError> for ConfigError {
    fn from(value: ::config::ConfigError) -> Self {
        Self::Load(value)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database: DatabaseLocation::File(PathBuf::from(DEFAULT_DB_FILE)),
            log_level: default_log_level().to_string(),
            log_dir: None,
            busy_timeout: Duration::from_secs(DEFAULT_BUSY_TIMEOUT_SECS),
        }
    }
}

impl CoreConfig {
    /// Config for an ephemeral in-memory catalog.
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseLocation::Memory,
            ..Self::default()
        }
    }

    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    /// Reads configuration from `vars` as if they were the process
    /// environment. Missing or empty keys fall back to defaults.
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        Self::load(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        let raw: RawConfig = Config::builder()
            .add_source(environment.ignore_empty(true))
            .build()?
            .try_deserialize()?;
        Self::try_from(raw)
    }
}

impl TryFrom<RawConfig> for CoreConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let present = |value: Option<String>| {
            value
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = present(raw.db_path) {
            config.database = if path == IN_MEMORY_MARKER {
                DatabaseLocation::Memory
            } else {
                DatabaseLocation::File(PathBuf::from(path))
            };
        }

        if let Some(level) = present(raw.log_level) {
            config.log_level = level;
        }

        if let Some(dir) = present(raw.log_dir) {
            let path = PathBuf::from(&dir);
            if !path.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: ENV_LOG_DIR,
                    value: dir,
                    reason: "must be an absolute path",
                });
            }
            config.log_dir = Some(path);
        }

        match raw.db_busy_timeout_secs {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    key: ENV_BUSY_TIMEOUT_SECS,
                    value: "0".to_string(),
                    reason: "must be at least 1",
                })
            }
            Some(secs) => config.busy_timeout = Duration::from_secs(secs),
            None => {}
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, CoreConfig, DatabaseLocation, ENV_BUSY_TIMEOUT_SECS, ENV_DB_PATH,
        ENV_LOG_DIR, ENV_LOG_LEVEL,
    };
    use ::config::Map;
    use std::path::PathBuf;
    use std::time::Duration;

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = CoreConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(
            config.database,
            DatabaseLocation::File(PathBuf::from("booklib.db"))
        );
    }

    #[test]
    fn memory_marker_selects_in_memory_database() {
        let config = CoreConfig::from_vars(vars(&[(ENV_DB_PATH, " :memory: ")])).unwrap();
        assert_eq!(config.database, DatabaseLocation::Memory);
    }

    #[test]
    fn empty_values_are_ignored() {
        let config = CoreConfig::from_vars(vars(&[
            (ENV_DB_PATH, ""),
            (ENV_BUSY_TIMEOUT_SECS, ""),
        ]))
        .unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = CoreConfig::from_vars(vars(&[
            (ENV_DB_PATH, "/var/lib/booklib/catalog.db"),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "/var/log/booklib"),
            (ENV_BUSY_TIMEOUT_SECS, "12"),
        ]))
        .unwrap();

        assert_eq!(
            config.database,
            DatabaseLocation::File(PathBuf::from("/var/lib/booklib/catalog.db"))
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/booklib")));
        assert_eq!(config.busy_timeout, Duration::from_secs(12));
    }

    #[test]
    fn unrelated_variables_are_ignored() {
        let config = CoreConfig::from_vars(vars(&[
            ("HOME", "/root"),
            ("BOOKSTORE_DB_PATH", ":memory:"),
        ]))
        .unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = CoreConfig::from_vars(vars(&[(ENV_LOG_DIR, "logs")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: ENV_LOG_DIR, .. }
        ));
    }

    #[test]
    fn busy_timeout_must_be_positive_integer() {
        let zero = CoreConfig::from_vars(vars(&[(ENV_BUSY_TIMEOUT_SECS, "0")])).unwrap_err();
        assert!(zero.to_string().contains("at least 1"));

        let garbage =
            CoreConfig::from_vars(vars(&[(ENV_BUSY_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(garbage, ConfigError::Load(_)));
    }
}
