//! Property-based tests for saving and reloading records through the JSON
//! file backend.
//!
//! Whatever goes into `save` comes back field-for-field after the store is
//! reopened from the same directory.

use lockkey::core::store::PasswordStore;
use lockkey::db::Storage;
use lockkey::models::{NewPassword, PasswordUpdate};
use proptest::prelude::*;
use tempfile::TempDir;

fn arb_new_password() -> impl Strategy<Value = NewPassword> {
    (
        "[A-Za-z0-9][A-Za-z0-9 ._-]{0,39}",
        "\\PC{0,40}",
        proptest::collection::vec("[a-z]{1,8}", 0..4),
        proptest::option::of("[A-Za-z0-9 ]{1,60}"),
    )
        .prop_map(|(title, password, tags, notes)| NewPassword {
            title,
            password,
            tags,
            notes,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn saved_records_survive_reopen(entries in proptest::collection::vec(arb_new_password(), 1..6)) {
        let dir = TempDir::new().unwrap();
        let store = PasswordStore::open(Storage::json(dir.path()), None).unwrap();

        let mut ids = Vec::new();
        for entry in &entries {
            ids.push(store.save(entry.clone()).unwrap());
        }
        let before = store.snapshot();

        let reopened = PasswordStore::open(Storage::json(dir.path()), None).unwrap();
        let after = reopened.snapshot();
        prop_assert_eq!(after.as_ref(), before.as_ref());

        for (id, entry) in ids.iter().zip(&entries) {
            let record = reopened.find_by_id(id).unwrap();
            prop_assert_eq!(&record.title, &entry.title);
            prop_assert_eq!(&record.password, &entry.password);
            prop_assert_eq!(&record.tags, &entry.tags);
            prop_assert_eq!(&record.notes, &entry.notes);
            prop_assert_eq!(record.created_at, record.updated_at);
        }
    }

    #[test]
    fn update_keeps_identity_and_creation_time(
        entry in arb_new_password(),
        new_password in "\\PC{1,40}",
    ) {
        let dir = TempDir::new().unwrap();
        let store = PasswordStore::open(Storage::json(dir.path()), None).unwrap();
        let id = store.save(entry).unwrap();
        let original = store.find_by_id(&id).unwrap();

        store
            .update(&id, PasswordUpdate { password: Some(new_password.clone()), ..Default::default() })
            .unwrap();

        let reopened = PasswordStore::open(Storage::json(dir.path()), None).unwrap();
        let record = reopened.find_by_id(&id).unwrap();
        prop_assert_eq!(&record.password, &new_password);
        prop_assert_eq!(&record.title, &original.title);
        prop_assert_eq!(record.created_at, original.created_at);
        prop_assert!(record.updated_at >= record.created_at);
    }
}

#[test]
fn search_covers_title_notes_and_tags() {
    let dir = TempDir::new().unwrap();
    let store = PasswordStore::open(Storage::json(dir.path()), None).unwrap();

    store
        .save(NewPassword {
            title: "GitHub".into(),
            password: "a".into(),
            tags: vec!["Work".into()],
            notes: None,
        })
        .unwrap();
    store
        .save(NewPassword {
            title: "Bank".into(),
            password: "b".into(),
            tags: vec![],
            notes: Some("savings ACCOUNT".into()),
        })
        .unwrap();

    assert_eq!(store.search("github").len(), 1);
    assert_eq!(store.search("ACCOUNT").len(), 1);
    assert_eq!(store.search("work").len(), 1);
    assert_eq!(store.search("").len(), 2);
    assert!(store.search("missing").is_empty());

    assert_eq!(store.find_by_tag("Work").len(), 1);
    assert!(store.find_by_tag("work").is_empty());
}

#[test]
fn search_matches_whitespace_literally() {
    let dir = TempDir::new().unwrap();
    let store = PasswordStore::open(Storage::json(dir.path()), None).unwrap();
    for title in ["MyBank", "Mail"] {
        store
            .save(NewPassword {
                title: title.into(),
                password: "pw".into(),
                ..Default::default()
            })
            .unwrap();
    }

    assert!(store.search(" bank").is_empty());
    assert!(store.search("   ").is_empty());
    assert_eq!(store.search("bank").len(), 1);
    assert_eq!(store.search("").len(), 2);
}

#[test]
fn options_are_remembered_across_reopen() {
    let dir = TempDir::new().unwrap();
    let store = PasswordStore::open(Storage::json(dir.path()), None).unwrap();

    let mut options = store.password_options();
    options.length = 30;
    options.exclude_similar = true;
    store.set_password_options(options.clone()).unwrap();

    let reopened = PasswordStore::open(Storage::json(dir.path()), None).unwrap();
    assert_eq!(reopened.password_options(), options);
}

#[test]
fn records_file_uses_camel_case_fields() {
    let dir = TempDir::new().unwrap();
    let store = PasswordStore::open(Storage::json(dir.path()), None).unwrap();
    store
        .save(NewPassword {
            title: "Mail".into(),
            password: "pw".into(),
            ..Default::default()
        })
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("passwords.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &value[0];
    assert_eq!(record["password"], "pw");
    assert!(record.get("createdAt").is_some());
    assert!(record.get("updatedAt").is_some());
}
