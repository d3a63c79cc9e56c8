use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ChronosConfig {
    pub general: GeneralConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub greeting: GreetingConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Fixed user to act as. Takes precedence over `chronos login`.
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GreetingConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NotificationConfig {
    /// Image shown when a reminder has no picture or its picture cannot be fetched.
    pub app_icon: Option<String>,
    /// Upper bound on how long a firing alarm may wait for its picture.
    pub delivery_deadline_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_chronos_dir()
            .join("chronos.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            base_url: crate::greeting::DEFAULT_BASE_URL.into(),
            timeout_secs: 30,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            app_icon: None,
            delivery_deadline_secs: 10,
            poll_interval_ms: 1000,
        }
    }
}

/// Returns `~/.chronos/`
pub fn default_chronos_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".chronos")
}

/// Returns the default config file path: `~/.chronos/config.toml`
pub fn default_config_path() -> PathBuf {
    default_chronos_dir().join("config.toml")
}

impl ChronosConfig {
    /// Load from a TOML file, then apply env var overrides. A missing file
    /// yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            ChronosConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (CHRONOS_DB, CHRONOS_USER, CHRONOS_LOG_LEVEL, CHRONOS_GREETING_URL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CHRONOS_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("CHRONOS_USER") {
            self.session.user_id = Some(val);
        }
        if let Ok(val) = std::env::var("CHRONOS_LOG_LEVEL") {
            self.general.log_level = val;
        }
        if let Ok(val) = std::env::var("CHRONOS_GREETING_URL") {
            self.greeting.base_url = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn resolved_app_icon(&self) -> Option<PathBuf> {
        self.notifications.app_icon.as_deref().map(expand_tilde)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
