//! Configuration handling for the front desk

use crate::registry::DEFAULT_ADDRESS;
use crate::state::DEFAULT_MAX_UPLOAD_BYTES;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the registry address
pub const ADDRESS_ENV: &str = "SEVA_REGISTRY_ADDRESS";

/// User configuration for the front desk
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeskConfig {
    /// Registry gRPC address
    pub registry_address: Option<String>,
    /// Attachment size limit in bytes
    pub max_upload_bytes: Option<u64>,
    /// Give up on submissions after this many seconds; unset waits forever
    pub submit_timeout_secs: Option<u64>,
    /// Use the in-process registry instead of the service
    pub offline: Option<bool>,
}

impl DeskConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "seva", "seva-desk")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: DeskConfig = serde_json::from_str(&content)?;
            return Ok(config);
        }
        Ok(Self::default())
    }

    /// Save configuration to file
    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Registry address: environment, then config file, then default
    pub fn address(&self) -> String {
        std::env::var(ADDRESS_ENV)
            .ok()
            .filter(|a| !a.trim().is_empty())
            .or_else(|| self.registry_address.clone())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string())
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }

    pub fn submit_timeout(&self) -> Option<Duration> {
        self.submit_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn is_offline(&self) -> bool {
        self.offline.unwrap_or(false)
    }
}
