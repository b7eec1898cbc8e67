//! Static configuration document
//!
//! The document is a YAML mapping loaded once at startup and read through
//! dot-separated key paths such as `llm.groq.model_name`. Secrets never live
//! here; they come from the environment (see [`crate::credentials`]).

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use thiserror::Error;
use tracing::info;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "TRIP_PLANNER_CONFIG";

/// Location used when neither the CLI nor the environment names a file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Errors raised while loading or reading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A segment of the key path is absent
    #[error("Config key not found: {path}")]
    KeyNotFound { path: String },

    /// The key exists but holds the wrong kind of value
    #[error("Config key {path} is not a {expected}")]
    InvalidType {
        path: String,
        expected: &'static str,
    },
}

/// Read-only view over the parsed configuration document
#[derive(Debug, Clone)]
pub struct ConfigStore {
    root: Value,
}

impl ConfigStore {
    /// Load and parse a YAML file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Parse` if it is not a
    /// YAML mapping.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::from_yaml_str(&content)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(store)
    }

    /// Parse a YAML document held in memory
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let root: Value = serde_yaml::from_str(yaml)?;
        if !root.is_mapping() {
            return Err(ConfigError::InvalidType {
                path: "<root>".to_string(),
                expected: "mapping",
            });
        }
        Ok(Self { root })
    }

    /// Path of the configuration file to load
    ///
    /// `TRIP_PLANNER_CONFIG` wins when set, otherwise `config/config.yaml`.
    pub fn discover() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Look up a dot-separated key path
    ///
    /// # Errors
    ///
    /// Returns `KeyNotFound` when any segment is absent or when a segment is
    /// reached through a value that is not a mapping.
    pub fn get(&self, key_path: &str) -> Result<&Value, ConfigError> {
        key_path.split('.').try_fold(&self.root, |current, segment| {
            current.get(segment).ok_or_else(|| ConfigError::KeyNotFound {
                path: key_path.to_string(),
            })
        })
    }

    /// Look up a string value
    pub fn get_str(&self, key_path: &str) -> Result<&str, ConfigError> {
        self.get(key_path)?
            .as_str()
            .ok_or_else(|| invalid_type(key_path, "string"))
    }

    /// Look up a numeric value (integers are widened)
    pub fn get_f64(&self, key_path: &str) -> Result<f64, ConfigError> {
        self.get(key_path)?
            .as_f64()
            .ok_or_else(|| invalid_type(key_path, "number"))
    }

    /// Look up a non-negative integer value
    pub fn get_u64(&self, key_path: &str) -> Result<u64, ConfigError> {
        self.get(key_path)?
            .as_u64()
            .ok_or_else(|| invalid_type(key_path, "non-negative integer"))
    }

    /// Whether the key path resolves to a value
    pub fn contains(&self, key_path: &str) -> bool {
        self.get(key_path).is_ok()
    }
}

/// Treat an absent key as `None` while keeping every other error
///
/// ```ignore
/// let base_url = optional(store.get_str("currency.base_url"))?;
/// ```
pub fn optional<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ConfigError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::KeyNotFound { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

fn invalid_type(key_path: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidType {
        path: key_path.to_string(),
        expected,
    }
}
