// src/db/mod.rs
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{AppSettings, SavedPassword};

pub mod json;
pub mod memory;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

// Storage backend trait - implemented by each persistence medium
pub trait StorageBackend: Send + Sync {
    fn load_records(&self) -> Result<Vec<SavedPassword>>;

    fn save_records(&self, records: &[SavedPassword]) -> Result<()>;

    fn load_settings(&self) -> Result<AppSettings>;

    fn save_settings(&self, settings: &AppSettings) -> Result<()>;
}

// Enum to hold specific backend implementations
#[derive(Debug, Clone)]
pub enum StorageType {
    Json(json::JsonFileBackend),
    Memory(memory::MemoryBackend),
}

/// Persistence handle used by the record store; dispatches to the
/// configured backend without trait objects.
#[derive(Debug, Clone)]
pub struct Storage {
    pub backend: StorageType,
}

impl Storage {
    pub fn json(dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: StorageType::Json(json::JsonFileBackend::new(dir)),
        }
    }

    pub fn memory() -> Self {
        Self {
            backend: StorageType::Memory(memory::MemoryBackend::new()),
        }
    }

    pub fn load_records(&self) -> Result<Vec<SavedPassword>> {
        match &self.backend {
            StorageType::Json(backend) => backend.load_records(),
            StorageType::Memory(backend) => backend.load_records(),
        }
    }

    pub fn save_records(&self, records: &[SavedPassword]) -> Result<()> {
        match &self.backend {
            StorageType::Json(backend) => backend.save_records(records),
            StorageType::Memory(backend) => backend.save_records(records),
        }
    }

    pub fn load_settings(&self) -> Result<AppSettings> {
        match &self.backend {
            StorageType::Json(backend) => backend.load_settings(),
            StorageType::Memory(backend) => backend.load_settings(),
        }
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        match &self.backend {
            StorageType::Json(backend) => backend.save_settings(settings),
            StorageType::Memory(backend) => backend.save_settings(settings),
        }
    }
}
