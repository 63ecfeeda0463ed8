// src/sync/mod.rs
use thiserror::Error;

use crate::models::SavedPassword;

pub mod drive;
pub mod memory;

pub use drive::{DriveConfig, DriveSync};
pub use memory::MemoryRemote;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote API error ({status}): {context}")]
    Api { status: u16, context: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Cloud sync is not configured")]
    NotConfigured,
}

impl SyncError {
    pub fn is_auth(&self) -> bool {
        matches!(self, SyncError::Auth(_))
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

/// Whole-blob mirror of the record collection. `push` overwrites the remote
/// copy, `pull` returns it or an empty collection when absent.
#[derive(Debug, Clone)]
pub enum SyncBackend {
    GoogleDrive(DriveSync),
    Memory(MemoryRemote),
}

impl SyncBackend {
    pub async fn push(&self, records: &[SavedPassword]) -> Result<()> {
        match self {
            SyncBackend::GoogleDrive(drive) => drive.push(records).await,
            SyncBackend::Memory(remote) => remote.push(records).await,
        }
    }

    pub async fn pull(&self) -> Result<Vec<SavedPassword>> {
        match self {
            SyncBackend::GoogleDrive(drive) => drive.pull().await,
            SyncBackend::Memory(remote) => remote.pull().await,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SyncBackend::GoogleDrive(_) => "google-drive",
            SyncBackend::Memory(_) => "memory",
        }
    }
}
