// src/sync/drive.rs
use std::sync::Arc;
use std::time::Duration;

use reqwest::{multipart, Client, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::core::auth::AuthSession;
use crate::models::{DriveFile, SavedPassword};
use super::{Result, SyncError};

const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Clone)]
pub struct DriveConfig {
    pub api_url: String,
    pub upload_url: String,
    pub folder_name: String,
    pub file_name: String,
    pub timeout: Duration,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_url: "https://www.googleapis.com/drive/v3".to_string(),
            upload_url: "https://www.googleapis.com/upload/drive/v3".to_string(),
            folder_name: "PasswordGenerator".to_string(),
            file_name: "passwords.json".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct CreatedFile {
    id: String,
}

/// Mirrors the record collection to a single JSON file inside an app
/// folder on Google Drive.
#[derive(Debug, Clone)]
pub struct DriveSync {
    client: Client,
    config: DriveConfig,
    auth: Arc<AuthSession>,
    folder_id: Arc<Mutex<Option<String>>>,
}

impl DriveSync {
    pub fn new(config: DriveConfig, auth: Arc<AuthSession>) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            auth,
            folder_id: Arc::new(Mutex::new(None)),
        })
    }

    pub fn is_available(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Overwrite the remote file with the full collection.
    pub async fn push(&self, records: &[SavedPassword]) -> Result<()> {
        let result = self.push_inner(records).await;
        self.observe(result)
    }

    /// Fetch the remote collection; an absent file is an empty collection.
    pub async fn pull(&self) -> Result<Vec<SavedPassword>> {
        let result = self.pull_inner().await;
        self.observe(result)
    }

    pub async fn list_files(&self) -> Result<Vec<DriveFile>> {
        let result = self.list_files_inner().await;
        self.observe(result)
    }

    pub async fn delete_file(&self, file_id: &str) -> Result<()> {
        let result = self.delete_file_inner(file_id).await;
        self.observe(result)
    }

    // An expired or revoked token ends the session instead of failing loudly.
    fn observe<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(SyncError::Auth(reason)) = &result {
            self.auth.force_sign_out(reason);
        }
        result
    }

    fn token(&self) -> Result<String> {
        self.auth
            .access_token()
            .ok_or_else(|| SyncError::Auth("not signed in".into()))
    }

    async fn push_inner(&self, records: &[SavedPassword]) -> Result<()> {
        let token = self.token()?;
        let folder_id = self.ensure_app_folder(&token).await?;
        let content = serde_json::to_string_pretty(records)?;

        match self.find_file(&token, &folder_id).await? {
            Some(file) => {
                log::debug!("Updating remote file {}", file.id);
                self.update_file(&token, &file.id, content).await
            }
            None => {
                log::debug!("Creating remote file {}", self.config.file_name);
                self.create_file(&token, &folder_id, content).await
            }
        }
    }

    async fn pull_inner(&self) -> Result<Vec<SavedPassword>> {
        let token = self.token()?;
        let folder_id = self.ensure_app_folder(&token).await?;

        let Some(file) = self.find_file(&token, &folder_id).await? else {
            log::info!("No remote file yet, nothing to pull");
            return Ok(Vec::new());
        };

        let content = self.download_file(&token, &file.id).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn list_files_inner(&self) -> Result<Vec<DriveFile>> {
        let token = self.token()?;
        let folder_id = self.ensure_app_folder(&token).await?;
        let query = format!("'{}' in parents and trashed=false", folder_id);

        let response = self
            .client
            .get(format!("{}/files", self.config.api_url))
            .bearer_auth(&token)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name,createdTime,modifiedTime,size)"),
            ])
            .send()
            .await?;
        let list: FileList = check(response, "list files").await?.json().await?;
        Ok(list.files)
    }

    async fn delete_file_inner(&self, file_id: &str) -> Result<()> {
        let token = self.token()?;
        let response = self
            .client
            .delete(format!("{}/files/{}", self.config.api_url, file_id))
            .bearer_auth(&token)
            .send()
            .await?;
        check(response, "delete file").await?;
        Ok(())
    }

    async fn ensure_app_folder(&self, token: &str) -> Result<String> {
        let mut cached = self.folder_id.lock().await;
        if let Some(id) = cached.as_ref() {
            return Ok(id.clone());
        }

        let id = match self.find_folder(token).await? {
            Some(folder) => folder.id,
            None => self.create_folder(token).await?,
        };
        *cached = Some(id.clone());
        Ok(id)
    }

    async fn find_folder(&self, token: &str) -> Result<Option<DriveFile>> {
        let query = format!(
            "name='{}' and mimeType='{}' and trashed=false",
            escape_query_value(&self.config.folder_name),
            FOLDER_MIME_TYPE
        );
        self.search(token, &query, "find folder").await
    }

    async fn create_folder(&self, token: &str) -> Result<String> {
        let metadata = serde_json::json!({
            "name": self.config.folder_name,
            "mimeType": FOLDER_MIME_TYPE,
        });

        let response = self
            .client
            .post(format!("{}/files", self.config.api_url))
            .bearer_auth(token)
            .json(&metadata)
            .send()
            .await?;
        let created: CreatedFile = check(response, "create folder").await?.json().await?;
        log::info!("Created remote folder {}", self.config.folder_name);
        Ok(created.id)
    }

    async fn find_file(&self, token: &str, folder_id: &str) -> Result<Option<DriveFile>> {
        let query = format!(
            "name='{}' and '{}' in parents and trashed=false",
            escape_query_value(&self.config.file_name),
            escape_query_value(folder_id)
        );
        self.search(token, &query, "find file").await
    }

    async fn search(&self, token: &str, query: &str, context: &str) -> Result<Option<DriveFile>> {
        let response = self
            .client
            .get(format!("{}/files", self.config.api_url))
            .bearer_auth(token)
            .query(&[("q", query), ("fields", "files(id,name)")])
            .send()
            .await?;
        let list: FileList = check(response, context).await?.json().await?;
        Ok(list.files.into_iter().next())
    }

    async fn create_file(&self, token: &str, folder_id: &str, content: String) -> Result<()> {
        let metadata = serde_json::json!({
            "name": self.config.file_name,
            "parents": [folder_id],
        });

        let form = multipart::Form::new()
            .part(
                "metadata",
                multipart::Part::text(metadata.to_string()).mime_str(JSON_MIME_TYPE)?,
            )
            .part(
                "file",
                multipart::Part::text(content).mime_str(JSON_MIME_TYPE)?,
            );

        let response = self
            .client
            .post(format!("{}/files", self.config.upload_url))
            .bearer_auth(token)
            .query(&[("uploadType", "multipart")])
            .multipart(form)
            .send()
            .await?;
        check(response, "create file").await?;
        Ok(())
    }

    async fn update_file(&self, token: &str, file_id: &str, content: String) -> Result<()> {
        let response = self
            .client
            .patch(format!("{}/files/{}", self.config.upload_url, file_id))
            .bearer_auth(token)
            .query(&[("uploadType", "media")])
            .header(reqwest::header::CONTENT_TYPE, JSON_MIME_TYPE)
            .body(content)
            .send()
            .await?;
        check(response, "update file").await?;
        Ok(())
    }

    async fn download_file(&self, token: &str, file_id: &str) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/files/{}", self.config.api_url, file_id))
            .bearer_auth(token)
            .query(&[("alt", "media")])
            .send()
            .await?;
        Ok(check(response, "download file").await?.text().await?)
    }
}

// String literals in a Drive `q` expression are single-quoted
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

async fn check(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    log::debug!("Drive {} failed with {}: {}", context, status, body);

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SyncError::Auth(format!("{} returned {}", context, status)));
    }

    Err(SyncError::Api {
        status: status.as_u16(),
        context: context.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GoogleUser;
    use chrono::Utc;
    use mockito::{Matcher, Server};

    fn signed_in() -> Arc<AuthSession> {
        let session = AuthSession::in_memory();
        session
            .set_user(GoogleUser {
                id: "u1".into(),
                email: "user@example.com".into(),
                name: "User".into(),
                picture: None,
                access_token: "tok".into(),
            })
            .unwrap();
        Arc::new(session)
    }

    fn drive_for(server: &Server, auth: Arc<AuthSession>) -> DriveSync {
        let config = DriveConfig {
            api_url: format!("{}/drive/v3", server.url()),
            upload_url: format!("{}/upload/drive/v3", server.url()),
            timeout: Duration::from_secs(5),
            ..DriveConfig::default()
        };
        DriveSync::new(config, auth).unwrap()
    }

    fn record(title: &str) -> SavedPassword {
        let now = Utc::now();
        SavedPassword {
            id: format!("id-{}", title),
            title: title.to_string(),
            password: "Pw!12xyZ".to_string(),
            tags: vec![],
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn push_creates_folder_and_file_when_missing() {
        let mut server = Server::new_async().await;
        let folder_search = server
            .mock("GET", "/drive/v3/files")
            .match_query(Matcher::Regex("mimeType".into()))
            .match_header("authorization", "Bearer tok")
            .with_body(r#"{"files": []}"#)
            .create_async()
            .await;
        let folder_create = server
            .mock("POST", "/drive/v3/files")
            .with_body(r#"{"id": "folder-1"}"#)
            .create_async()
            .await;
        let file_search = server
            .mock("GET", "/drive/v3/files")
            .match_query(Matcher::Regex("parents".into()))
            .with_body(r#"{"files": []}"#)
            .create_async()
            .await;
        let upload = server
            .mock("POST", "/upload/drive/v3/files")
            .match_query(Matcher::UrlEncoded("uploadType".into(), "multipart".into()))
            .match_body(Matcher::Regex("mail".into()))
            .with_body(r#"{"id": "file-1"}"#)
            .create_async()
            .await;

        let drive = drive_for(&server, signed_in());
        drive.push(&[record("mail")]).await.unwrap();

        folder_search.assert_async().await;
        folder_create.assert_async().await;
        file_search.assert_async().await;
        upload.assert_async().await;
    }

    #[tokio::test]
    async fn push_overwrites_existing_file() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/drive/v3/files")
            .match_query(Matcher::Regex("mimeType".into()))
            .with_body(r#"{"files": [{"id": "folder-1", "name": "PasswordGenerator"}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/drive/v3/files")
            .match_query(Matcher::Regex("parents".into()))
            .with_body(r#"{"files": [{"id": "file-1", "name": "passwords.json"}]}"#)
            .create_async()
            .await;
        let update = server
            .mock("PATCH", "/upload/drive/v3/files/file-1")
            .match_query(Matcher::UrlEncoded("uploadType".into(), "media".into()))
            .match_header("content-type", "application/json")
            .match_body(Matcher::Regex("bank".into()))
            .with_body("{}")
            .create_async()
            .await;

        let drive = drive_for(&server, signed_in());
        drive.push(&[record("bank")]).await.unwrap();
        update.assert_async().await;
    }

    #[tokio::test]
    async fn pull_of_absent_file_is_empty() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/drive/v3/files")
            .match_query(Matcher::Regex("mimeType".into()))
            .with_body(r#"{"files": [{"id": "folder-1", "name": "PasswordGenerator"}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/drive/v3/files")
            .match_query(Matcher::Regex("parents".into()))
            .with_body(r#"{"files": []}"#)
            .create_async()
            .await;

        let drive = drive_for(&server, signed_in());
        assert!(drive.pull().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pull_downloads_remote_records() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/drive/v3/files")
            .match_query(Matcher::Regex("mimeType".into()))
            .with_body(r#"{"files": [{"id": "folder-1", "name": "PasswordGenerator"}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/drive/v3/files")
            .match_query(Matcher::Regex("parents".into()))
            .with_body(r#"{"files": [{"id": "file-1", "name": "passwords.json"}]}"#)
            .create_async()
            .await;
        let remote = vec![record("mail"), record("bank")];
        server
            .mock("GET", "/drive/v3/files/file-1")
            .match_query(Matcher::UrlEncoded("alt".into(), "media".into()))
            .with_body(serde_json::to_string(&remote).unwrap())
            .create_async()
            .await;

        let drive = drive_for(&server, signed_in());
        assert_eq!(drive.pull().await.unwrap(), remote);
    }

    #[tokio::test]
    async fn unauthorized_forces_sign_out() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/drive/v3/files")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let auth = signed_in();
        let drive = drive_for(&server, Arc::clone(&auth));
        let err = drive.push(&[record("mail")]).await.unwrap_err();

        assert!(err.is_auth());
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn server_error_keeps_session() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/drive/v3/files")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let auth = signed_in();
        let drive = drive_for(&server, Arc::clone(&auth));
        let err = drive.pull().await.unwrap_err();

        assert!(matches!(err, SyncError::Api { status: 500, .. }));
        assert!(auth.is_authenticated());
    }

    #[test]
    fn query_values_are_escaped() {
        assert_eq!(escape_query_value("PasswordGenerator"), "PasswordGenerator");
        assert_eq!(escape_query_value("Bob's"), r"Bob\'s");
        assert_eq!(escape_query_value(r"a\b"), r"a\\b");
    }

    #[tokio::test]
    async fn names_with_quotes_are_escaped_in_searches() {
        let mut server = Server::new_async().await;
        let folder_search = server
            .mock("GET", "/drive/v3/files")
            .match_query(Matcher::UrlEncoded(
                "q".into(),
                r"name='Bob\'s Vault' and mimeType='application/vnd.google-apps.folder' and trashed=false"
                    .into(),
            ))
            .with_body(r#"{"files": [{"id": "folder-1", "name": "Bob's Vault"}]}"#)
            .create_async()
            .await;
        let file_search = server
            .mock("GET", "/drive/v3/files")
            .match_query(Matcher::UrlEncoded(
                "q".into(),
                r"name='it\'s.json' and 'folder-1' in parents and trashed=false".into(),
            ))
            .with_body(r#"{"files": []}"#)
            .create_async()
            .await;

        let config = DriveConfig {
            api_url: format!("{}/drive/v3", server.url()),
            upload_url: format!("{}/upload/drive/v3", server.url()),
            folder_name: "Bob's Vault".into(),
            file_name: "it's.json".into(),
            timeout: Duration::from_secs(5),
        };
        let drive = DriveSync::new(config, signed_in()).unwrap();
        assert!(drive.pull().await.unwrap().is_empty());

        folder_search.assert_async().await;
        file_search.assert_async().await;
    }

    #[tokio::test]
    async fn delete_file_sends_delete_request() {
        let mut server = Server::new_async().await;
        let delete = server
            .mock("DELETE", "/drive/v3/files/file-1")
            .match_header("authorization", "Bearer tok")
            .with_status(204)
            .create_async()
            .await;

        let auth = signed_in();
        let drive = drive_for(&server, Arc::clone(&auth));
        assert!(drive.is_available());
        drive.delete_file("file-1").await.unwrap();

        delete.assert_async().await;
    }

    #[tokio::test]
    async fn delete_of_missing_file_is_api_error() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/drive/v3/files/gone")
            .with_status(404)
            .create_async()
            .await;

        let drive = drive_for(&server, signed_in());
        let err = drive.delete_file("gone").await.unwrap_err();
        assert!(matches!(err, SyncError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn push_without_session_is_auth_failure() {
        let server = Server::new_async().await;
        let drive = drive_for(&server, Arc::new(AuthSession::in_memory()));
        assert!(drive.push(&[]).await.unwrap_err().is_auth());
    }
}
