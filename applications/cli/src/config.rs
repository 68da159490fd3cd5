/// CLI configuration
use crate::error::{CliError, Result};
use hearth_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Playlist database; empty keeps playlists in memory for this run
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// JSON manifest listing the device's tracks
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
}

impl StorageSettings {
    /// Whether playlists are persisted
    pub fn is_persistent(&self) -> bool {
        !self.database_url.trim().is_empty()
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// The file is optional. Environment variables prefixed with `HEARTH_`
    /// override it, with `__` between section and key
    /// (`HEARTH_STORAGE__DATABASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("hearth.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(CliError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("HEARTH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.player.max_sleep_minutes == 0 {
            return Err(CliError::Config(
                "player.max_sleep_minutes must be at least 1".to_string(),
            ));
        }

        if self.storage.catalog_path.as_os_str().is_empty() {
            return Err(CliError::Config(
                "storage.catalog_path is required (set HEARTH_STORAGE__CATALOG_PATH)".to_string(),
            ));
        }

        if self.storage.is_persistent() && !self.storage.database_url.starts_with("sqlite:") {
            return Err(CliError::Config(format!(
                "Unsupported database URL {:?}, expected sqlite:",
                self.storage.database_url
            )));
        }

        Ok(())
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        catalog_path: default_catalog_path(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/hearth.db".to_string()
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("./catalog.json")
}

impl Default for StorageSettings {
    fn default() -> Self {
        default_storage()
    }
}
