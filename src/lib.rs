// src/lib.rs
pub mod cli;
pub mod core;
pub mod db;
pub mod generators;
pub mod logging;
pub mod models;
pub mod sync;
pub mod utils;

pub use crate::core::store::PasswordStore;
