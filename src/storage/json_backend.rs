//! Locally persisted JSON snapshot with atomic replacement.

use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

use crate::core::utils::{app_data_dir, ensure_dir};
use crate::errors::Result;
use crate::ledger::Ledger;

use super::StorageBackend;

const SNAPSHOT_FILE: &str = "ledger.json";
const TMP_SUFFIX: &str = "tmp";

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Snapshot file under the application data directory.
    pub fn default_location() -> Result<Self> {
        let root = app_data_dir();
        ensure_dir(&root)?;
        Ok(Self::new(root.join(SNAPSHOT_FILE)))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(TMP_SUFFIX);
        self.path.with_file_name(name)
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<Option<Ledger>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        let ledger = serde_json::from_str(&data)?;
        Ok(Some(ledger))
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(ledger)?;
        let tmp = self.tmp_path();
        {
            let mut file = File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let storage = JsonStorage::new(dir.path().join("ledger.json"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn snapshot_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let storage = JsonStorage::new(dir.path().join("ledger.json"));
        let ledger = Ledger::new("disk");
        storage.save(&ledger).unwrap();
        let loaded = storage.load().unwrap().expect("snapshot present");
        assert_eq!(loaded.id, ledger.id);
        assert_eq!(loaded.categories.len(), ledger.categories.len());
        // no tmp leftovers after a clean save
        assert!(!storage.tmp_path().exists());
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let storage = JsonStorage::new(dir.path().join("nested/deeper/ledger.json"));
        storage.save(&Ledger::new("nested")).unwrap();
        assert!(storage.load().unwrap().is_some());
    }
}
