// src/utils/io.rs
use std::path::PathBuf;

/// Get the application data directory
pub fn get_app_data_dir() -> Option<PathBuf> {
    match directories::ProjectDirs::from("com", "lockkey", "lockkey") {
        Some(proj_dirs) => Some(proj_dirs.data_dir().to_path_buf()),
        None => {
            log::error!("Could not determine data directory");
            None
        }
    }
}
