//! Engine configuration persisted alongside the ledger snapshot.

use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};

use crate::core::utils::{app_data_dir, ensure_dir};
use crate::domain::AccountScope;
use crate::errors::Result;

const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Which storage capability the engine is constructed with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum StorageMode {
    /// Trial/demo sessions: writes stay in the process.
    Memory,
    /// JSON snapshot on disk; `path` defaults to the app data directory.
    LocalFile {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
    /// External persistence API, wired up by the caller.
    Remote,
}

impl Default for StorageMode {
    fn default() -> Self {
        StorageMode::LocalFile { path: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default)]
    pub default_scope: AccountScope,
    #[serde(default)]
    pub storage: StorageMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            default_scope: AccountScope::Personal,
            storage: StorageMode::default(),
        }
    }
}

/// Loads and saves the configuration file with atomic replacement.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let base = app_data_dir();
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Manager over an explicit file, for tests and embedders.
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// The stored configuration, or defaults when none exists yet.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = self.path.with_extension(TMP_SUFFIX);
        {
            let mut file = File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_defaults_when_file_is_missing() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::at_path(dir.path().join("config.json"));
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.storage, StorageMode::LocalFile { path: None });
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::at_path(dir.path().join("config.json"));
        let config = Config {
            locale: "pt-BR".into(),
            currency: "BRL".into(),
            default_scope: AccountScope::Business,
            storage: StorageMode::Memory,
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }
}
