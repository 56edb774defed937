//! Configuration management for Sentinel.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file when no path is given.
pub const CONFIG_ENV_VAR: &str = "SENTINEL_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentinelConfig {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Deployment-time constants of one ledger instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Replay window: maximum accepted age of an assertion, in seconds.
    pub max_age_secs: u64,
    /// Tolerated clock skew for future-dated assertions, in seconds.
    pub max_future_skew_secs: u64,
    /// Amount carried by every `Limit` decision.
    pub limit_amount: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_age_secs: 300,
            max_future_skew_secs: 0,
            limit_amount: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file. In-memory storage when absent.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl SentinelConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file named by `SENTINEL_CONFIG`, or the defaults when it is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.ledger.validate()
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_age_secs == 0 {
            return Err(CoreError::Config(
                "ledger.max_age_secs must be greater than zero".to_string(),
            ));
        }

        if self.max_future_skew_secs > self.max_age_secs {
            return Err(CoreError::Config(format!(
                "ledger.max_future_skew_secs ({}) exceeds ledger.max_age_secs ({})",
                self.max_future_skew_secs, self.max_age_secs
            )));
        }

        Ok(())
    }
}
