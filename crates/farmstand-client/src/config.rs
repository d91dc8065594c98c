//! # Client Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FARMSTAND_API_URL=https://api.farmstand.example/api                │
//! │     FARMSTAND_TIMEOUT_SECS=15                                          │
//! │     FARMSTAND_DB_PATH=/tmp/farmstand.db                                │
//! │     FARMSTAND_TRACKING_ENABLED=false                                   │
//! │     FARMSTAND_MAX_QUEUED_EVENTS=100                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/farmstand/farmstand.toml (Linux)                         │
//! │     ~/Library/Application Support/com.farmstand.farmstand/ (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://api.farmstand.example/api"
//! timeout_secs = 30
//!
//! [storage]
//! database_path = "/var/lib/farmstand/farmstand.db"
//!
//! [tracking]
//! enabled = true
//! max_queued_events = 50
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use farmstand_core::MAX_QUEUED_EVENTS;

use crate::error::{ClientError, ClientResult};

const CONFIG_FILE_NAME: &str = "farmstand.toml";
const DATABASE_FILE_NAME: &str = "farmstand.db";

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Prefix for every request path, e.g. `https://host/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Client-wide request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Capacity of the failed-event retry queue.
    #[serde(default = "default_max_queued_events")]
    pub max_queued_events: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_queued_events() -> usize {
    MAX_QUEUED_EVENTS
}

impl Default for TrackingSettings {
    fn default() -> Self {
        TrackingSettings {
            enabled: true,
            max_queued_events: MAX_QUEUED_EVENTS,
        }
    }
}

// =============================================================================
// ClientConfig
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub tracking: TrackingSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (farmstand.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Client config saved");
        Ok(())
    }

    pub fn validate(&self) -> ClientResult<()> {
        let parsed = url::Url::parse(&self.api.base_url).map_err(|e| {
            ClientError::Config(format!("Invalid base_url '{}': {}", self.api.base_url, e))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ClientError::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.tracking.max_queued_events == 0 {
            return Err(ClientError::Config(
                "max_queued_events must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("FARMSTAND_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Ok(secs) = std::env::var("FARMSTAND_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid FARMSTAND_TIMEOUT_SECS"),
            }
        }

        if let Ok(path) = std::env::var("FARMSTAND_DB_PATH") {
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Ok(enabled) = std::env::var("FARMSTAND_TRACKING_ENABLED") {
            match enabled.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.tracking.enabled = true,
                "0" | "false" | "no" | "off" => self.tracking.enabled = false,
                _ => warn!(value = %enabled, "Unknown FARMSTAND_TRACKING_ENABLED value"),
            }
        }

        if let Ok(cap) = std::env::var("FARMSTAND_MAX_QUEUED_EVENTS") {
            if let Ok(c) = cap.parse::<usize>() {
                self.tracking.max_queued_events = c;
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "farmstand", "farmstand")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    /// Configured database path, else `<data dir>/farmstand.db`.
    pub fn database_path(&self) -> ClientResult<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .ok_or_else(|| ClientError::Config("No data directory available".into()))
    }
}
