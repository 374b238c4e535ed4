//! TOML-backed engine tuning.
//!
//! The host application keeps these settings in its config file; the
//! engine only needs the horizon bounds. Unknown or missing keys fall
//! back to defaults so older config files keep working.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Materialization limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Days ahead a continuous schedule is enumerated per invocation.
    #[serde(default = "default_horizon_days")]
    pub default_horizon_days: u32,
    /// Upper bound on any caller-requested horizon.
    #[serde(default = "default_max_horizon_days")]
    pub max_horizon_days: u32,
}

fn default_horizon_days() -> u32 {
    30
}

fn default_max_horizon_days() -> u32 {
    366
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_horizon_days: default_horizon_days(),
            max_horizon_days: default_max_horizon_days(),
        }
    }
}

impl EngineConfig {
    /// Parse engine settings from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Serialize engine settings to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeFailed(e.to_string()))
    }
}
