// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Device configuration.
//!
//! Configuration is read from `--config <path>` or, failing that,
//! `$XDG_CONFIG_HOME/qtdev/config.toml`. A missing default file means all
//! defaults. `QTDEV_*` environment variables override the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::env;
use crate::error::{Error, Result};
use crate::pull::{PullConfig, DEFAULT_API_URL};
use crate::push::{HeartbeatConfig, PushConfig, DEFAULT_PUSH_URL};

const APP_DIR_NAME: &str = "qtdev";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Establishment used when none is configured and discovery finds nothing.
pub const FALLBACK_ESTABLISHMENT: &str = "est_001";

/// Device configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Queue service API base URL (http or https).
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Push endpoint URL (ws or wss).
    #[serde(default = "default_push_url")]
    pub push_url: String,
    /// Human-readable name reported at registration.
    #[serde(default = "default_device_name")]
    pub device_name: String,
    /// Device type reported at registration.
    #[serde(default = "default_device_type")]
    pub device_type: String,
    /// Establishment to follow. When absent the first one the service lists
    /// is used, then [`FALLBACK_ESTABLISHMENT`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub establishment_id: Option<String>,
    /// Bound on each pull request in seconds (default: 5).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Bound on the push handshake in seconds (default: 5).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Heartbeat ping interval in milliseconds (default: 30000). 0 = disabled.
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,
    /// Close the push channel when nothing arrives this long after a ping.
    /// 0 (the default) never closes.
    #[serde(default)]
    pub heartbeat_timeout_ms: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_push_url() -> String {
    DEFAULT_PUSH_URL.to_string()
}

fn default_device_name() -> String {
    "Rust Device".to_string()
}

fn default_device_type() -> String {
    "generic".to_string()
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_heartbeat_interval_ms() -> u64 {
    30_000
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
            push_url: default_push_url(),
            device_name: default_device_name(),
            device_type: default_device_type(),
            establishment_id: None,
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            heartbeat_timeout_ms: 0,
        }
    }
}

/// Values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub push_url: Option<String>,
    pub establishment_id: Option<String>,
}

impl Overrides {
    /// Reads the `QTDEV_*` environment variables.
    pub fn from_env() -> Self {
        Overrides {
            api_url: env::api_url(),
            push_url: env::push_url(),
            establishment_id: env::establishment(),
        }
    }
}

impl Config {
    /// Default config file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads configuration for a run of the CLI.
    ///
    /// An explicit path must exist. Environment overrides are applied and the
    /// result is validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path)?,
                _ => Config::default(),
            },
        };
        config.apply_overrides(Overrides::from_env());
        config.validate()?;
        Ok(config)
    }

    /// Parses one config file. Missing keys take their defaults.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.api_url {
            self.api_url = url;
        }
        if let Some(url) = overrides.push_url {
            self.push_url = url;
        }
        if let Some(id) = overrides.establishment_id {
            self.establishment_id = Some(id);
        }
    }

    /// Checks URL schemes, names and timeouts.
    pub fn validate(&self) -> Result<()> {
        check_url("api_url", &self.api_url, &["http", "https"])?;
        check_url("push_url", &self.push_url, &["ws", "wss"])?;
        if self.device_name.trim().is_empty() {
            return Err(Error::InvalidConfig {
                field: "device_name",
                reason: "cannot be empty".to_string(),
            });
        }
        if self.device_type.trim().is_empty() {
            return Err(Error::InvalidConfig {
                field: "device_type",
                reason: "cannot be empty".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig {
                field: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(Error::InvalidConfig {
                field: "connect_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if matches!(&self.establishment_id, Some(id) if id.trim().is_empty()) {
            return Err(Error::InvalidConfig {
                field: "establishment_id",
                reason: "cannot be empty when set".to_string(),
            });
        }
        Ok(())
    }

    pub fn pull_config(&self) -> PullConfig {
        PullConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn push_config(&self) -> PushConfig {
        let pong_timeout = (self.heartbeat_timeout_ms > 0)
            .then(|| Duration::from_millis(self.heartbeat_timeout_ms));
        PushConfig {
            url: self.push_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            heartbeat: HeartbeatConfig {
                interval: Duration::from_millis(self.heartbeat_interval_ms),
                pong_timeout,
            },
        }
    }
}

fn check_url(field: &'static str, url: &str, schemes: &[&str]) -> Result<()> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidConfig {
        field,
        reason: format!("'{}': {}", url, e),
    })?;
    if schemes.contains(&parsed.scheme()) {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            field,
            reason: format!("'{}': expected {}://", url, schemes.join(":// or ")),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
