//! CLI configuration management

use std::path::{Path, PathBuf};

use aptos_sdk::{Network, DEFAULT_EXPIRATION_SECS, DEFAULT_MAX_GAS_AMOUNT};
use serde::{Deserialize, Serialize};

use crate::CliError;

/// CLI configuration, stored as TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Network to talk to when no node URL is set
    #[serde(default = "default_network")]
    pub network: Network,
    /// Explicit node URL, overrides `network`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_url: Option<String>,
    /// Gas limit for transfers
    #[serde(default = "default_max_gas_amount")]
    pub max_gas_amount: u64,
    /// Transaction lifetime in seconds
    #[serde(default = "default_expiration_secs")]
    pub expiration_secs: u64,
}

fn default_network() -> Network {
    Network::Devnet
}

fn default_max_gas_amount() -> u64 {
    DEFAULT_MAX_GAS_AMOUNT
}

fn default_expiration_secs() -> u64 {
    DEFAULT_EXPIRATION_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: default_network(),
            node_url: None,
            max_gas_amount: default_max_gas_amount(),
            expiration_secs: default_expiration_secs(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".aptos-lite"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from the default path or return defaults
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load config from `path`; a missing or unreadable file yields defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<PathBuf, CliError> {
        let path = Self::config_path()
            .ok_or_else(|| CliError::Config("cannot determine home directory".to_string()))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Node URL in effect
    pub fn node_url(&self) -> &str {
        self.node_url
            .as_deref()
            .unwrap_or_else(|| self.network.node_url())
    }
}
