// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

/// A stored password entry. The secret is kept under `password` on disk and
/// in the synced blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPassword {
    pub id: String,
    pub title: String,
    pub password: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedPassword {
    // Case-insensitive substring match against title, notes and tags.
    // `lower_query` must already be lowercased.
    pub fn matches(&self, lower_query: &str) -> bool {
        self.title.to_lowercase().contains(lower_query)
            || self
                .notes
                .as_deref()
                .map_or(false, |n| n.to_lowercase().contains(lower_query))
            || self
                .tags
                .iter()
                .any(|t| t.to_lowercase().contains(lower_query))
    }
}

// Input for creating a new record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPassword {
    pub title: String,
    pub password: String,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

// Partial update; id and created_at are intentionally absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasswordUpdate {
    pub title: Option<String>,
    pub password: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl PasswordUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.password.is_none()
            && self.tags.is_none()
            && self.notes.is_none()
    }
}

// Password generation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordOptions {
    pub length: usize,
    pub include_uppercase: bool,
    pub include_lowercase: bool,
    pub include_numbers: bool,
    pub include_symbols: bool,
    pub include_spaces: bool,
    pub exclude_similar: bool,
    pub exclude_ambiguous: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: 12,
            include_uppercase: true,
            include_lowercase: true,
            include_numbers: true,
            include_symbols: true,
            include_spaces: false,
            exclude_similar: false,
            exclude_ambiguous: false,
        }
    }
}

impl PasswordOptions {
    /// Options that enable only the space character.
    pub fn spaces_only(length: usize) -> Self {
        Self {
            length,
            include_uppercase: false,
            include_lowercase: false,
            include_numbers: false,
            include_symbols: false,
            include_spaces: true,
            exclude_similar: false,
            exclude_ambiguous: false,
        }
    }

    pub fn has_category(&self) -> bool {
        self.include_uppercase
            || self.include_lowercase
            || self.include_numbers
            || self.include_symbols
            || self.include_spaces
    }

    /// Returns a copy with `length` clamped into `[min, max]`. This is a
    /// caller policy; the generator itself never clamps.
    pub fn clamp_length(&self, min: usize, max: usize) -> Self {
        let mut clamped = self.clone();
        clamped.length = self.length.clamp(min, max.max(min));
        clamped
    }
}

/// Verdict of the strength rubric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthReport {
    pub valid: bool,
    pub score: u32,
    pub feedback: Vec<String>,
}

// Persisted application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub password_options: PasswordOptions,
}

// Signed-in cloud account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleUser {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    pub access_token: String,
}

// Remote file metadata as listed by the drive API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub modified_time: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}
