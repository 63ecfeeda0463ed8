// src/core/store.rs
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::Utc;
use thiserror::Error;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::db::{DbError, Storage};
use crate::models::{AppSettings, NewPassword, PasswordOptions, PasswordUpdate, SavedPassword};
use crate::sync::{SyncBackend, SyncError};
use crate::utils;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    DbError(#[from] DbError),

    #[error("Password not found: {0}")]
    NotFound(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub type Snapshot = Arc<Vec<SavedPassword>>;
type Listener = Arc<dyn Fn(&Snapshot) + Send + Sync>;

// Orders background pushes so an older snapshot never lands after a newer one
#[derive(Default)]
struct PushGate {
    latest: AtomicU64,
    last_pushed: tokio::sync::Mutex<u64>,
}

/// Owns the canonical record collection. Every mutation builds a new
/// collection, persists it, then publishes it as an immutable snapshot;
/// readers never observe a partially applied change.
pub struct PasswordStore {
    storage: Storage,
    sync: Option<SyncBackend>,
    records: RwLock<Snapshot>,
    settings: RwLock<AppSettings>,
    writer: Mutex<()>,
    listeners: Mutex<Vec<Listener>>,
    pending: Mutex<Vec<JoinHandle<()>>>,
    gate: Arc<PushGate>,
}

impl PasswordStore {
    pub fn open(storage: Storage, sync: Option<SyncBackend>) -> Result<Self> {
        let records = storage.load_records()?;
        let settings = storage.load_settings()?;
        log::debug!("Loaded {} saved passwords", records.len());

        Ok(Self {
            storage,
            sync,
            records: RwLock::new(Arc::new(records)),
            settings: RwLock::new(settings),
            writer: Mutex::new(()),
            listeners: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
            gate: Arc::new(PushGate::default()),
        })
    }

    pub fn sync_backend(&self) -> Option<&SyncBackend> {
        self.sync.as_ref()
    }

    /// The currently published collection.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.records.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Register a callback that receives every newly published collection.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    pub fn save(&self, new: NewPassword) -> Result<String> {
        validate_title(&new.title)?;

        let now = Utc::now();
        let record = SavedPassword {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            password: new.password,
            tags: new.tags,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };
        let id = record.id.clone();

        self.mutate(true, |records| {
            records.push(record);
            Ok(())
        })?;

        log::info!("Saved password {}", id);
        Ok(id)
    }

    pub fn update(&self, id: &str, update: PasswordUpdate) -> Result<SavedPassword> {
        if let Some(title) = &update.title {
            validate_title(title)?;
        }

        let updated = self.mutate(true, |records| {
            let record = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

            if let Some(title) = update.title {
                record.title = title;
            }
            if let Some(password) = update.password {
                record.password = password;
            }
            if let Some(tags) = update.tags {
                record.tags = tags;
            }
            if let Some(notes) = update.notes {
                record.notes = if notes.is_empty() { None } else { Some(notes) };
            }
            record.updated_at = Utc::now().max(record.created_at);

            Ok(record.clone())
        })?;

        log::info!("Updated password {}", id);
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.mutate(true, |records| {
            let before = records.len();
            records.retain(|r| r.id != id);
            if records.len() == before {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Ok(())
        })?;

        log::info!("Deleted password {}", id);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.mutate(true, |records| {
            records.clear();
            Ok(())
        })?;

        log::info!("Cleared all saved passwords");
        Ok(())
    }

    /// Install `records` as the canonical collection, e.g. after a pull.
    /// Does not push back to the remote.
    pub fn replace_all(&self, records: Vec<SavedPassword>) -> Result<()> {
        let count = records.len();
        self.mutate(false, move |current| {
            *current = records;
            Ok(())
        })?;

        log::info!("Replaced local collection with {} records", count);
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> Option<SavedPassword> {
        self.snapshot().iter().find(|r| r.id == id).cloned()
    }

    /// Case-insensitive substring search over title, notes and tags. Only
    /// the empty query returns the whole collection; whitespace is matched
    /// literally.
    pub fn search(&self, query: &str) -> Vec<SavedPassword> {
        let snapshot = self.snapshot();
        if query.is_empty() {
            return snapshot.to_vec();
        }
        let query = query.to_lowercase();

        snapshot
            .iter()
            .filter(|r| r.matches(&query))
            .cloned()
            .collect()
    }

    pub fn find_by_tag(&self, tag: &str) -> Vec<SavedPassword> {
        self.snapshot()
            .iter()
            .filter(|r| r.tags.iter().any(|t| t == tag))
            .cloned()
            .collect()
    }

    pub fn password_options(&self) -> PasswordOptions {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .password_options
            .clone()
    }

    pub fn set_password_options(&self, options: PasswordOptions) -> Result<()> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next = self
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        next.password_options = options;

        self.storage.save_settings(&next)?;
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = next;
        Ok(())
    }

    /// Push the current collection and wait for the outcome.
    pub async fn push_now(&self) -> std::result::Result<usize, SyncError> {
        let sync = self.sync.as_ref().ok_or(SyncError::NotConfigured)?;
        let snapshot = self.snapshot();
        sync.push(&snapshot).await?;
        Ok(snapshot.len())
    }

    /// Fetch the remote collection without touching local state.
    pub async fn pull(&self) -> std::result::Result<Vec<SavedPassword>, SyncError> {
        let sync = self.sync.as_ref().ok_or(SyncError::NotConfigured)?;
        sync.pull().await
    }

    /// Wait for every background push scheduled so far.
    pub async fn wait_for_sync(&self) {
        let handles: Vec<JoinHandle<()>> =
            std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner));
        if handles.is_empty() {
            return;
        }

        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                log::error!("Sync task failed to complete: {}", e);
            }
        }
    }

    // Apply `f` to a copy of the collection, persist, then publish. On any
    // error the published snapshot is left untouched.
    fn mutate<T, F>(&self, push: bool, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<SavedPassword>) -> Result<T>,
    {
        let writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next = self.snapshot().as_ref().clone();
        let out = f(&mut next)?;

        self.storage.save_records(&next)?;
        let snapshot: Snapshot = Arc::new(next);
        *self.records.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&snapshot);

        if push {
            self.schedule_push(Arc::clone(&snapshot));
        }
        drop(writer);

        // Listeners run with no store lock held and may call back into the store
        self.notify(&snapshot);

        Ok(out)
    }

    fn notify(&self, snapshot: &Snapshot) {
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener(snapshot);
        }
    }

    // Fire-and-forget: the local mutation already stands, a failed push is
    // only logged.
    fn schedule_push(&self, snapshot: Snapshot) {
        let Some(sync) = self.sync.clone() else {
            return;
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                log::debug!("No async runtime available, skipping cloud push");
                return;
            }
        };

        let gate = Arc::clone(&self.gate);
        let seq = gate.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let task = runtime.spawn(async move {
            let mut last_pushed = gate.last_pushed.lock().await;
            if *last_pushed >= seq {
                log::debug!("Skipping stale push #{}", seq);
                return;
            }

            *last_pushed = seq;
            match sync.push(&snapshot).await {
                Ok(()) => {
                    log::info!("Synced {} passwords to {}", snapshot.len(), sync.name());
                }
                Err(e) if e.is_auth() => {
                    log::warn!("Cloud sync needs a new sign-in: {}", e);
                }
                Err(e) => {
                    log::error!("Cloud sync failed: {}", e);
                }
            }
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|h| !h.is_finished());
        pending.push(task);
    }
}

const MAX_TITLE_LENGTH: usize = 200;

fn validate_title(title: &str) -> Result<()> {
    utils::validate_required(title, "title")
        .and_then(|_| utils::validate_max_length(title, MAX_TITLE_LENGTH, "title"))
        .map_err(StoreError::InvalidRecord)
}
