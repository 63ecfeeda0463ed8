// src/cli/handlers.rs
use std::error::Error;

use serde::Serialize;

use crate::core::auth::AuthSession;
use crate::core::config::Config;
use crate::core::store::PasswordStore;
use crate::generators::{self, PasswordGenerator};
use crate::models::{
    GoogleUser, NewPassword, PasswordOptions, PasswordUpdate, SavedPassword, StrengthReport,
};
use crate::sync::{DriveSync, SyncBackend, SyncError};

#[derive(Debug, Serialize)]
pub struct GenerateOutcome {
    pub password: String,
    pub options: PasswordOptions,
    pub strength: StrengthReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_id: Option<String>,
}

// Handlers for CLI commands

/// Clamp, generate and score. The options actually used are remembered
/// unless `remember` is false. A generator failure is returned as-is and no
/// password is produced.
pub fn handle_generate(
    store: &PasswordStore,
    config: &Config,
    options: &PasswordOptions,
    remember: bool,
) -> Result<GenerateOutcome, Box<dyn Error>> {
    let options = options.clamp_length(config.min_password_length, config.max_password_length);
    let generator = PasswordGenerator::new();

    let password = generator.generate_password(&options)?;
    let strength = generator.analyze_password_strength(&password);

    if remember {
        if let Err(e) = store.set_password_options(options.clone()) {
            log::warn!("Could not remember generator options: {}", e);
        }
    }

    Ok(GenerateOutcome {
        password,
        options,
        strength,
        saved_id: None,
    })
}

pub fn handle_generate_spaces(
    config: &Config,
    length: usize,
) -> Result<GenerateOutcome, Box<dyn Error>> {
    let options = PasswordOptions::spaces_only(length)
        .clamp_length(config.min_password_length, config.max_password_length);
    let password = generators::generate_password(&options)?;
    let strength = generators::evaluate(&password);

    Ok(GenerateOutcome {
        password,
        options,
        strength,
        saved_id: None,
    })
}

pub fn handle_check(password: &str) -> StrengthReport {
    generators::evaluate(password)
}

pub fn handle_save(
    store: &PasswordStore,
    title: &str,
    password: &str,
    tags: &[String],
    notes: Option<&str>,
) -> Result<String, Box<dyn Error>> {
    let id = store.save(NewPassword {
        title: title.trim().to_string(),
        password: password.to_string(),
        tags: clean_tags(tags),
        notes: notes.filter(|n| !n.is_empty()).map(str::to_string),
    })?;
    Ok(id)
}

pub fn handle_list(store: &PasswordStore) -> Vec<SavedPassword> {
    store.snapshot().to_vec()
}

pub fn handle_get(store: &PasswordStore, id: &str) -> Result<SavedPassword, Box<dyn Error>> {
    store
        .find_by_id(id)
        .ok_or_else(|| format!("No saved password with id {}", id).into())
}

pub fn handle_search(store: &PasswordStore, query: &str) -> Vec<SavedPassword> {
    store.search(query)
}

pub fn handle_tag(store: &PasswordStore, tag: &str) -> Vec<SavedPassword> {
    store.find_by_tag(tag)
}

pub fn handle_update(
    store: &PasswordStore,
    id: &str,
    title: Option<&str>,
    password: Option<&str>,
    tags: Option<&[String]>,
    notes: Option<&str>,
) -> Result<SavedPassword, Box<dyn Error>> {
    let update = PasswordUpdate {
        title: title.map(|t| t.trim().to_string()),
        password: password.map(str::to_string),
        tags: tags.map(clean_tags),
        notes: notes.map(str::to_string),
    };

    if update.is_empty() {
        return Err("Nothing to update; pass at least one of --title, --password, --tags, --notes".into());
    }

    Ok(store.update(id, update)?)
}

pub fn handle_delete(store: &PasswordStore, id: &str) -> Result<(), Box<dyn Error>> {
    store.delete(id)?;
    Ok(())
}

pub fn handle_clear(store: &PasswordStore) -> Result<usize, Box<dyn Error>> {
    let count = store.len();
    store.clear()?;
    Ok(count)
}

pub async fn handle_login(
    auth: &AuthSession,
    config: &Config,
    token: &str,
) -> Result<GoogleUser, Box<dyn Error>> {
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;
    Ok(auth.sign_in(&client, &config.userinfo_url, token).await?)
}

pub fn handle_logout(auth: &AuthSession) -> Result<(), Box<dyn Error>> {
    auth.sign_out()?;
    Ok(())
}

pub async fn handle_push(store: &PasswordStore) -> Result<usize, Box<dyn Error>> {
    Ok(store.push_now().await?)
}

/// Fetch the remote copy; when `replace` is set it becomes the local
/// collection.
pub async fn handle_pull(
    store: &PasswordStore,
    replace: bool,
) -> Result<Vec<SavedPassword>, Box<dyn Error>> {
    let records = store.pull().await?;
    if replace {
        store.replace_all(records.clone())?;
    }
    Ok(records)
}

pub async fn handle_files(
    store: &PasswordStore,
) -> Result<Vec<crate::models::DriveFile>, Box<dyn Error>> {
    Ok(drive(store)?.list_files().await?)
}

pub async fn handle_delete_file(store: &PasswordStore, file_id: &str) -> Result<(), Box<dyn Error>> {
    drive(store)?.delete_file(file_id).await?;
    Ok(())
}

// The Drive adapter, provided a session is still active
fn drive(store: &PasswordStore) -> Result<&DriveSync, Box<dyn Error>> {
    match store.sync_backend() {
        Some(SyncBackend::GoogleDrive(drive)) if drive.is_available() => Ok(drive),
        Some(SyncBackend::GoogleDrive(_)) => Err(Box::new(SyncError::Auth("not signed in".into()))),
        Some(other) => Err(format!("{} sync has no remote files", other.name()).into()),
        None => Err(Box::new(SyncError::NotConfigured)),
    }
}

fn clean_tags(tags: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !cleaned.iter().any(|c| c == tag) {
            cleaned.push(tag.to_string());
        }
    }
    cleaned
}
