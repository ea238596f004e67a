//! Configuration loading and management.
//!
//! The gateway's deployment-time settings (backend base URL, bind address)
//! can come from a `scangate.toml` discovered in the current or a parent
//! directory, from an explicit file path, or from environment variables.
//! Environment variables take precedence over file values.

use crate::error::{Result, ScangateError};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_backend_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Base URL of the processing backend; `/scan` and `/ocr` are appended
    /// per mode.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// IP address the gateway binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the gateway binds to.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScangateError::validation_with_source(format!("Failed to read config file: {}", path.display()), e)
        })?;
        let config: GatewayConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Discover a `scangate.toml` in the current directory or any parent.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(ScangateError::Io)?;

        loop {
            let candidate = current.join("scangate.toml");
            if candidate.exists() {
                return Ok(Some(Self::from_toml_file(candidate)?));
            }
            if !current.pop() {
                return Ok(None);
            }
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Recognized variables: `SCANGATE_BACKEND_URL`, `SCANGATE_HOST`,
    /// `SCANGATE_PORT`. Invalid values are ignored with a warning rather than
    /// failing startup.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("SCANGATE_BACKEND_URL") {
            if !url.trim().is_empty() {
                self.backend_url = url;
            }
        }
        if let Ok(host) = std::env::var("SCANGATE_HOST") {
            if !host.trim().is_empty() {
                self.host = host;
            }
        }
        if let Ok(port) = std::env::var("SCANGATE_PORT") {
            match port.parse::<u16>() {
                Ok(p) if p > 0 => self.port = p,
                _ => tracing::warn!("Failed to parse SCANGATE_PORT='{}', must be a valid port", port),
            }
        }
        self
    }

    /// Backend base URL with any trailing slash removed, ready for a mode
    /// path suffix.
    pub fn backend_base(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }
}
