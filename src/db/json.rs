// src/db/json.rs
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{AppSettings, SavedPassword};
use super::{DbError, Result, StorageBackend};

pub const RECORDS_FILE: &str = "passwords.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// Stores records as a JSON array and settings as a JSON object, one file
/// each, inside a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn records_path(&self) -> PathBuf {
        self.dir.join(RECORDS_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    fn read_json<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T> {
        if !path.exists() {
            log::debug!("{} not found, starting empty", path.display());
            return Ok(T::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(T::default());
        }

        Ok(serde_json::from_str(&content)?)
    }

    // Write to a sibling temp file and rename it over the target, so readers
    // never see a half-written file.
    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let file_name = path
            .file_name()
            .ok_or_else(|| DbError::Unavailable(format!("invalid path {}", path.display())))?;
        let tmp_path = path.with_file_name(format!("{}.tmp", file_name.to_string_lossy()));

        let data = serde_json::to_vec_pretty(value)?;
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&data)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;

        Ok(())
    }
}

impl StorageBackend for JsonFileBackend {
    fn load_records(&self) -> Result<Vec<SavedPassword>> {
        self.read_json(&self.records_path())
    }

    fn save_records(&self, records: &[SavedPassword]) -> Result<()> {
        self.write_json(&self.records_path(), records)
    }

    fn load_settings(&self) -> Result<AppSettings> {
        self.read_json(&self.settings_path())
    }

    fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.write_json(&self.settings_path(), settings)
    }
}
