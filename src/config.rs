//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the ecg-config.toml file.
//! It provides a centralized way to configure the backend address, request timeout,
//! and terminal plot dimensions.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "ecg-config.toml";

/// Application configuration loaded from ecg-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Backend service configuration
    pub api: ApiConfig,
    /// Terminal plot configuration
    pub display: DisplayConfig,
}

/// Event service connection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL the `/events` routes hang off
    pub base_url: String,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

/// Terminal plot settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Plot width in character columns; also the pointer surface width
    pub columns: usize,
    /// Plot height in character rows
    pub rows: usize,
    /// Rate assumed when an event payload carries no waveform
    pub default_sampling_rate_hz: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig {
                base_url: "http://localhost:8000/api".to_string(),
                timeout_secs: 10,
            },
            display: DisplayConfig {
                columns: 120,
                rows: 20,
                default_sampling_rate_hz: crate::DEFAULT_SAMPLING_RATE_HZ,
            },
        }
    }
}

impl Config {
    /// Load configuration from ecg-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), backend = %config.api.base_url, "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save current configuration to `path` as pretty TOML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}
