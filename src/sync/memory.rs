// src/sync/memory.rs
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::models::SavedPassword;
use super::{Result, SyncError};

#[derive(Debug, Default)]
struct RemoteState {
    blob: Mutex<Option<String>>,
    fail: AtomicBool,
    reject_auth: AtomicBool,
    pushes: AtomicUsize,
}

/// In-process stand-in for a remote drive. Holds the serialized blob the
/// way the real remote would, and can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    state: Arc<RemoteState>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        self.state.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_reject_auth(&self, reject: bool) {
        self.state.reject_auth.store(reject, Ordering::SeqCst);
    }

    pub fn push_count(&self) -> usize {
        self.state.pushes.load(Ordering::SeqCst)
    }

    pub fn raw_blob(&self) -> Option<String> {
        self.state.blob.lock().ok().and_then(|b| b.clone())
    }

    fn check(&self) -> Result<()> {
        if self.state.reject_auth.load(Ordering::SeqCst) {
            return Err(SyncError::Auth("token rejected".into()));
        }
        if self.state.fail.load(Ordering::SeqCst) {
            return Err(SyncError::Api {
                status: 503,
                context: "remote unavailable".into(),
            });
        }
        Ok(())
    }

    pub async fn push(&self, records: &[SavedPassword]) -> Result<()> {
        self.check()?;
        let content = serde_json::to_string_pretty(records)?;
        let mut blob = self
            .state
            .blob
            .lock()
            .map_err(|_| SyncError::Api { status: 500, context: "remote poisoned".into() })?;
        *blob = Some(content);
        self.state.pushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    pub async fn pull(&self) -> Result<Vec<SavedPassword>> {
        self.check()?;
        match self.raw_blob() {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(Vec::new()),
        }
    }
}
