//! Tests for mirroring the store to a remote through the in-memory backend.

use lockkey::core::store::PasswordStore;
use lockkey::db::Storage;
use lockkey::models::{NewPassword, SavedPassword};
use lockkey::sync::{MemoryRemote, SyncBackend, SyncError};

fn entry(title: &str) -> NewPassword {
    NewPassword {
        title: title.to_string(),
        password: format!("{}-secret", title),
        ..Default::default()
    }
}

fn synced_store(remote: &MemoryRemote) -> PasswordStore {
    PasswordStore::open(Storage::memory(), Some(SyncBackend::Memory(remote.clone()))).unwrap()
}

fn remote_records(remote: &MemoryRemote) -> Vec<SavedPassword> {
    serde_json::from_str(&remote.raw_blob().unwrap()).unwrap()
}

#[tokio::test]
async fn save_is_mirrored_after_wait() {
    let remote = MemoryRemote::new();
    let store = synced_store(&remote);

    store.save(entry("Mail")).unwrap();
    store.save(entry("Bank")).unwrap();
    store.wait_for_sync().await;

    let mirrored = remote_records(&remote);
    assert_eq!(mirrored, store.snapshot().to_vec());
}

#[tokio::test]
async fn remote_failure_keeps_local_change() {
    let remote = MemoryRemote::new();
    remote.set_failing(true);
    let store = synced_store(&remote);

    let id = store.save(entry("Mail")).unwrap();
    store.wait_for_sync().await;

    assert!(store.find_by_id(&id).is_some());
    assert_eq!(remote.push_count(), 0);
    assert!(remote.raw_blob().is_none());
}

#[tokio::test]
async fn remote_holds_newest_snapshot_after_burst() {
    let remote = MemoryRemote::new();
    let store = synced_store(&remote);

    for i in 0..10 {
        store.save(entry(&format!("entry-{}", i))).unwrap();
    }
    store.wait_for_sync().await;

    assert_eq!(remote_records(&remote).len(), 10);
    assert!(remote.push_count() <= 10);
}

#[tokio::test]
async fn pull_does_not_touch_local_until_replaced() {
    let remote = MemoryRemote::new();
    let source = synced_store(&remote);
    source.save(entry("Remote")).unwrap();
    source.wait_for_sync().await;

    let store = PasswordStore::open(Storage::memory(), Some(SyncBackend::Memory(remote.clone()))).unwrap();
    store.save(entry("Local")).unwrap();
    store.wait_for_sync().await;

    // The local save overwrote the remote blob
    let pulled = store.pull().await.unwrap();
    assert_eq!(pulled.len(), 1);
    assert_eq!(pulled[0].title, "Local");

    let pushes = remote.push_count();
    let replacement = source.snapshot().to_vec();
    store.replace_all(replacement.clone()).unwrap();
    store.wait_for_sync().await;

    assert_eq!(store.snapshot().to_vec(), replacement);
    assert_eq!(remote.push_count(), pushes);
}

#[tokio::test]
async fn pull_of_empty_remote_is_empty() {
    let remote = MemoryRemote::new();
    let store = synced_store(&remote);
    assert!(store.pull().await.unwrap().is_empty());
}

#[tokio::test]
async fn push_now_reports_count_and_errors() {
    let remote = MemoryRemote::new();
    let store = synced_store(&remote);
    store.save(entry("Mail")).unwrap();
    store.wait_for_sync().await;

    assert_eq!(store.push_now().await.unwrap(), 1);

    remote.set_reject_auth(true);
    let err = store.push_now().await.unwrap_err();
    assert!(err.is_auth());
}

#[tokio::test]
async fn unsynced_store_reports_not_configured() {
    let store = PasswordStore::open(Storage::memory(), None).unwrap();
    store.save(entry("Mail")).unwrap();
    store.wait_for_sync().await;

    assert!(matches!(store.push_now().await, Err(SyncError::NotConfigured)));
    assert!(matches!(store.pull().await, Err(SyncError::NotConfigured)));
}
