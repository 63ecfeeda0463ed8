// src/generators/password.rs
use rand::distributions::{Distribution, Uniform};
use rand::rngs::OsRng;
use thiserror::Error;

use crate::models::{PasswordOptions, StrengthReport};

pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const NUMBERS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";
pub const SPACE: char = ' ';

/// Characters that are easy to confuse with one another.
pub const SIMILAR_CHARS: &str = "il1Lo0O";
/// Characters that some input fields and shells mangle.
pub const AMBIGUOUS_CHARS: &str = "{}[]()/\\'\"`~,;.<>";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("No usable character category selected")]
    EmptyCharset,
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Build the deduplicated set of characters eligible for sampling.
pub fn universe(options: &PasswordOptions) -> Vec<char> {
    let mut chars: Vec<char> = Vec::new();

    if options.include_uppercase {
        chars.extend(UPPERCASE.chars());
    }
    if options.include_lowercase {
        chars.extend(LOWERCASE.chars());
    }
    if options.include_numbers {
        chars.extend(NUMBERS.chars());
    }
    if options.include_symbols {
        chars.extend(SYMBOLS.chars());
    }
    if options.include_spaces {
        chars.push(SPACE);
    }

    if options.exclude_similar {
        chars.retain(|c| !SIMILAR_CHARS.contains(*c));
    }
    if options.exclude_ambiguous {
        chars.retain(|c| !AMBIGUOUS_CHARS.contains(*c));
    }

    let mut seen = std::collections::HashSet::with_capacity(chars.len());
    chars.retain(|c| seen.insert(*c));
    chars
}

/// Generate a password of exactly `options.length` characters, each drawn
/// uniformly and independently from the universe. Length is not clamped.
pub fn generate_password(options: &PasswordOptions) -> Result<String> {
    let chars = universe(options);
    if chars.is_empty() {
        return Err(GeneratorError::EmptyCharset);
    }

    let dist = Uniform::from(0..chars.len());
    let mut rng = OsRng;

    Ok((0..options.length)
        .map(|_| chars[dist.sample(&mut rng)])
        .collect())
}

pub struct PasswordGenerator;

impl PasswordGenerator {
    pub fn new() -> Self {
        PasswordGenerator
    }

    pub fn generate_password(&self, options: &PasswordOptions) -> Result<String> {
        generate_password(options)
    }

    pub fn analyze_password_strength(&self, password: &str) -> StrengthReport {
        super::strength::evaluate(password)
    }
}

impl Default for PasswordGenerator {
    fn default() -> Self {
        Self::new()
    }
}
