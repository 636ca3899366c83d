//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use qol_types::RewardParams;

use crate::{LogFormat, ServiceError};

/// Configuration for the QoL service.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Treasury account rewards are paid from.
    #[serde(default = "default_treasury")]
    pub treasury: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Reward schedule and verification parameters.
    #[serde(default)]
    pub rewards: RewardParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_treasury() -> String {
    "QOL-TREASURY".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ServiceError> {
        let config: Self = toml::from_str(s).map_err(|e| ServiceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ServiceError> {
        toml::to_string_pretty(self).map_err(|e| ServiceError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.treasury.trim().is_empty() {
            return Err(ServiceError::Config("treasury must not be empty".into()));
        }
        self.log_format()?;
        self.rewards
            .validate()
            .map_err(|e| ServiceError::Config(format!("[rewards]: {e}")))
    }

    pub fn log_format(&self) -> Result<LogFormat, ServiceError> {
        self.log_format.parse()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            treasury: default_treasury(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            rewards: RewardParams::default(),
        }
    }
}
