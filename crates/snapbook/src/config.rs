//! Configuration management for snapbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::camera::DEFAULT_URI_PREFIX;
use crate::error::{Error, Result};
use crate::photo::LabelPolicy;
use crate::store::DEFAULT_MAX_LABEL_LENGTH;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "snapbook";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SNAPBOOK_`)
/// 2. TOML config file at `~/.config/snapbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Photo label configuration.
    pub labels: LabelConfig,
    /// Camera configuration.
    pub camera: CameraConfig,
}

/// Photo label configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// How new photos are named.
    pub policy: LabelPolicy,
    /// Maximum label length in characters.
    /// Set to 0 for unlimited.
    pub max_length: usize,
}

/// Camera-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// How long to wait for a permission answer, in milliseconds.
    /// Set to 0 to wait indefinitely.
    pub permission_timeout_ms: u64,
    /// How long to wait for a picture, in milliseconds.
    /// Set to 0 to wait indefinitely.
    pub capture_timeout_ms: u64,
    /// Prefix for image references produced by the scripted camera.
    pub uri_prefix: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            policy: LabelPolicy::default(),
            max_length: DEFAULT_MAX_LABEL_LENGTH,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            permission_timeout_ms: 30_000,
            capture_timeout_ms: 0,
            uri_prefix: DEFAULT_URI_PREFIX.to_string(),
        }
    }
}

impl CameraConfig {
    /// Permission timeout, or `None` when disabled.
    #[must_use]
    pub fn permission_timeout(&self) -> Option<Duration> {
        millis(self.permission_timeout_ms)
    }

    /// Capture timeout, or `None` when disabled.
    #[must_use]
    pub fn capture_timeout(&self) -> Option<Duration> {
        millis(self.capture_timeout_ms)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("SNAPBOOK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        match &self.labels.policy {
            LabelPolicy::Static { text } if text.trim().is_empty() => {
                return Err(Error::ConfigValidation {
                    message: "labels.policy.text cannot be empty".to_string(),
                });
            }
            LabelPolicy::Numbered { prefix } if prefix.trim().is_empty() => {
                return Err(Error::ConfigValidation {
                    message: "labels.policy.prefix cannot be empty".to_string(),
                });
            }
            _ => {}
        }

        if self.camera.uri_prefix.is_empty() {
            return Err(Error::ConfigValidation {
                message: "camera.uri_prefix cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}
