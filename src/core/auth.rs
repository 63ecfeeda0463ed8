// src/core/auth.rs
use std::fs;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::models::GoogleUser;
use crate::utils;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid access token")]
    InvalidToken,

    #[error("Sign-in rejected by provider (HTTP {0})")]
    Rejected(u16),
}

pub type Result<T> = std::result::Result<T, AuthError>;

// Profile returned by the userinfo endpoint
#[derive(Debug, Deserialize)]
struct UserInfo {
    id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    picture: Option<String>,
}

/// The signed-in cloud account, optionally persisted to a session file.
#[derive(Debug)]
pub struct AuthSession {
    path: Option<PathBuf>,
    user: RwLock<Option<GoogleUser>>,
}

impl AuthSession {
    /// Session that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            user: RwLock::new(None),
        }
    }

    /// Restore the session stored at `path`. A missing or unreadable file
    /// yields a signed-out session.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let user = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<GoogleUser>(&content) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::warn!("Ignoring unreadable session file {}: {}", path.display(), e);
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            path: Some(path),
            user: RwLock::new(user),
        }
    }

    /// Validate `access_token` against the userinfo endpoint and store the
    /// resulting session.
    pub async fn sign_in(
        &self,
        client: &reqwest::Client,
        userinfo_url: &str,
        access_token: &str,
    ) -> Result<GoogleUser> {
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let response = client
            .get(userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidToken);
        }
        if !status.is_success() {
            return Err(AuthError::Rejected(status.as_u16()));
        }

        let info: UserInfo = response.json().await?;
        if !info.email.is_empty() && !utils::validate_email(&info.email) {
            log::warn!("Provider returned a malformed email address");
        }

        let user = GoogleUser {
            id: info.id,
            email: info.email,
            name: info.name,
            picture: info.picture,
            access_token: access_token.to_string(),
        };
        self.set_user(user.clone())?;
        log::info!("Signed in as {}", user.email);
        Ok(user)
    }

    pub fn set_user(&self, user: GoogleUser) -> Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, serde_json::to_vec_pretty(&user)?)?;
        }
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
        Ok(())
    }

    /// Remove the session file, then forget the user. If the file cannot be
    /// removed the session stays signed in.
    pub fn sign_out(&self) -> Result<()> {
        self.remove_session_file()?;
        self.clear_user();
        Ok(())
    }

    /// Drop the session after the provider rejected the token. Never fails;
    /// the in-memory session is cleared even if the file lingers.
    pub fn force_sign_out(&self, reason: &str) {
        if !self.is_authenticated() {
            return;
        }
        log::warn!("Signing out: {}", reason);
        if let Err(e) = self.remove_session_file() {
            log::error!("Failed to remove session file: {}", e);
        }
        self.clear_user();
    }

    fn remove_session_file(&self) -> Result<()> {
        if let Some(path) = &self.path {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    fn clear_user(&self) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn current_user(&self) -> Option<GoogleUser> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.current_user().map(|u| u.access_token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
