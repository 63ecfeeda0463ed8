// src/generators/mod.rs
pub mod password;
pub mod strength;

pub use password::{generate_password, universe, GeneratorError, PasswordGenerator};
pub use strength::evaluate;
