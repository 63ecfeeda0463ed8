// src/core/config.rs
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use log::LevelFilter;

use crate::sync::DriveConfig;

// Configuration for the password manager
#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub data_dir: PathBuf,

    // Password Generation
    pub min_password_length: usize,
    pub max_password_length: usize,

    // Cloud Sync
    pub sync_enabled: bool,
    pub drive_api_url: String,
    pub drive_upload_url: String,
    pub drive_folder_name: String,
    pub drive_file_name: String,
    pub userinfo_url: String,
    pub http_timeout: Duration,

    // Logging
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let drive = DriveConfig::default();
        Self {
            data_dir: crate::utils::get_app_data_dir()
                .unwrap_or_else(|| PathBuf::from("./data")),

            min_password_length: 8,
            max_password_length: 50,

            sync_enabled: true,
            drive_api_url: drive.api_url,
            drive_upload_url: drive.upload_url,
            drive_folder_name: drive.folder_name,
            drive_file_name: drive.file_name,
            userinfo_url: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
            http_timeout: drive.timeout,

            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl Config {
    // Load configuration from environment variables
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Ok(dir) = env::var("LOCKKEY_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        // Password Generation
        if let Ok(val) = env::var("PASSWORD_MIN_LENGTH") {
            if let Ok(length) = val.parse() {
                config.min_password_length = length;
            }
        }

        if let Ok(val) = env::var("PASSWORD_MAX_LENGTH") {
            if let Ok(length) = val.parse() {
                config.max_password_length = length;
            }
        }

        if config.max_password_length < config.min_password_length {
            log::warn!(
                "PASSWORD_MAX_LENGTH ({}) is below PASSWORD_MIN_LENGTH ({}), using the minimum",
                config.max_password_length,
                config.min_password_length
            );
            config.max_password_length = config.min_password_length;
        }

        // Cloud Sync
        if let Ok(val) = env::var("SYNC_ENABLED") {
            if let Ok(enabled) = val.parse() {
                config.sync_enabled = enabled;
            }
        }

        if let Ok(url) = env::var("DRIVE_API_URL") {
            config.drive_api_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(url) = env::var("DRIVE_UPLOAD_URL") {
            config.drive_upload_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(name) = env::var("DRIVE_FOLDER_NAME") {
            config.drive_folder_name = name;
        }

        if let Ok(name) = env::var("DRIVE_FILE_NAME") {
            config.drive_file_name = name;
        }

        if let Ok(url) = env::var("GOOGLE_USERINFO_URL") {
            config.userinfo_url = url;
        }

        if let Ok(val) = env::var("HTTP_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse::<u64>() {
                config.http_timeout = Duration::from_secs(secs);
            }
        }

        // Logging
        if let Ok(level) = env::var("LOG_LEVEL") {
            match level.to_lowercase().as_str() {
                "off" => config.log_level = LevelFilter::Off,
                "error" => config.log_level = LevelFilter::Error,
                "warn" => config.log_level = LevelFilter::Warn,
                "info" => config.log_level = LevelFilter::Info,
                "debug" => config.log_level = LevelFilter::Debug,
                "trace" => config.log_level = LevelFilter::Trace,
                _ => {}
            }
        }

        if let Ok(file) = env::var("LOG_FILE") {
            config.log_file = Some(PathBuf::from(file));
        }

        config
    }

    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    pub fn drive_config(&self) -> DriveConfig {
        DriveConfig {
            api_url: self.drive_api_url.clone(),
            upload_url: self.drive_upload_url.clone(),
            folder_name: self.drive_folder_name.clone(),
            file_name: self.drive_file_name.clone(),
            timeout: self.http_timeout,
        }
    }

    // Create directories needed for operation
    pub fn ensure_directories_exist(&self) {
        if !self.data_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(&self.data_dir) {
                log::warn!("Failed to create data directory: {}", e);
            }
        }

        if let Some(parent) = self.log_file.as_ref().and_then(|f| f.parent()) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    log::warn!("Failed to create log directory: {}", e);
                }
            }
        }
    }
}
