//! Configuration for a switcher connection
//!
//! Loaded from YAML; every field except the host has a default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

use crate::protocol::DEFAULT_PORT;

/// Connection settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StudioConfig {
    /// Switcher host name or address; without one the client never connects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Fixed delay before reconnecting after an error or close
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_port(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

impl StudioConfig {
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Self::default()
        }
    }

    /// Load configuration from file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: StudioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(host) = &self.host {
            if host.trim().is_empty() {
                anyhow::bail!("host cannot be empty");
            }
        }
        if self.port == 0 {
            anyhow::bail!("port cannot be 0");
        }
        if self.reconnect_delay_ms == 0 {
            anyhow::bail!("reconnect_delay_ms must be greater than 0");
        }
        Ok(())
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

fn default_port() -> u16 { DEFAULT_PORT }
fn default_reconnect_delay_ms() -> u64 { 5000 }
