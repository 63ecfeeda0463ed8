// src/db/memory.rs
use std::sync::{Arc, Mutex};

use crate::models::{AppSettings, SavedPassword};
use super::{DbError, Result, StorageBackend};

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<SavedPassword>,
    settings: AppSettings,
    fail_writes: bool,
}

/// Volatile backend. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, for exercising error paths.
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_writes = fail;
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| DbError::Unavailable("memory backend poisoned".into()))
    }
}

impl StorageBackend for MemoryBackend {
    fn load_records(&self) -> Result<Vec<SavedPassword>> {
        Ok(self.lock()?.records.clone())
    }

    fn save_records(&self, records: &[SavedPassword]) -> Result<()> {
        let mut state = self.lock()?;
        if state.fail_writes {
            return Err(DbError::Unavailable("writes disabled".into()));
        }
        state.records = records.to_vec();
        Ok(())
    }

    fn load_settings(&self) -> Result<AppSettings> {
        Ok(self.lock()?.settings.clone())
    }

    fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let mut state = self.lock()?;
        if state.fail_writes {
            return Err(DbError::Unavailable("writes disabled".into()));
        }
        state.settings = settings.clone();
        Ok(())
    }
}
