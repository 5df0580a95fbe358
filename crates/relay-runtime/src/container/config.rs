//! # Relay Configuration
//!
//! Unified configuration for the admission subsystem and the relay around it.
//!
//! Loaded from a TOML file, then overridden from the environment:
//!
//! ```toml
//! [admission]
//! fallback_relays = ["wss://relay.damus.io", "wss://relay.snort.net"]
//! lookup_timeout_ms = 10000
//! connect_timeout_ms = 5000
//! missing_reference = "fall_through"
//!
//! [storage]
//! database_path = "./db.sqlite"
//!
//! [network]
//! listen_addr = "0.0.0.0:3334"
//! ```

use cc_01_group_admission::AdmissionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Complete relay configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Group admission configuration.
    pub admission: AdmissionConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Network configuration.
    pub network: NetworkConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file of the event store.
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("./db.sqlite"),
        }
    }
}

/// Network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Address the relay listens on.
    pub listen_addr: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3334".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read {path}: {error}")]
    Io {
        /// Config file path.
        path: String,
        /// OS diagnostic.
        error: String,
    },

    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// TOML rendering error.
    #[error("Failed to render config: {0}")]
    Render(String),

    /// An environment override had an unusable value.
    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
}

impl RelayConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string. Missing sections and fields
    /// take their defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Render(e.to_string()))
    }

    /// Apply overrides from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `CC_FALLBACK_RELAYS`: comma separated relay URLs
    /// - `CC_LOOKUP_TIMEOUT_SECS`: remote lookup deadline
    /// - `CC_LISTEN_ADDR`: listen address
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides(
        mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(relays) = var("CC_FALLBACK_RELAYS") {
            self.admission.fallback_relays = relays
                .split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(secs) = var("CC_LOOKUP_TIMEOUT_SECS") {
            let parsed: u64 = secs.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "CC_LOOKUP_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            self.admission.lookup_timeout_ms = parsed.saturating_mul(1_000);
        }

        if let Some(addr) = var("CC_LISTEN_ADDR") {
            self.network.listen_addr = addr;
        }

        Ok(self)
    }
}
