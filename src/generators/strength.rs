// src/generators/strength.rs
use crate::generators::password::SYMBOLS;
use crate::models::StrengthReport;

pub const TOO_SHORT: &str = "too short";
pub const ADD_UPPERCASE: &str = "add uppercase";
pub const ADD_LOWERCASE: &str = "add lowercase";
pub const ADD_DIGIT: &str = "add digit";
pub const ADD_SYMBOL: &str = "add symbol";
pub const AVOID_SEQUENCES: &str = "avoid common sequences";

const COMMON_SEQUENCES: [&str; 5] = ["123", "abc", "qwe", "asd", "zxc"];

/// Minimum score for a password to be reported as valid.
pub const VALID_SCORE: u32 = 4;

/// Score a password against the fixed rubric. Feedback follows check order.
pub fn evaluate(password: &str) -> StrengthReport {
    let mut feedback = Vec::new();
    let mut score: i32 = 0;

    let length = password.chars().count();
    if length < 8 {
        feedback.push(TOO_SHORT.to_string());
    } else if length >= 12 {
        score += 2;
    } else {
        score += 1;
    }

    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    } else {
        feedback.push(ADD_UPPERCASE.to_string());
    }

    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    } else {
        feedback.push(ADD_LOWERCASE.to_string());
    }

    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    } else {
        feedback.push(ADD_DIGIT.to_string());
    }

    if password.chars().any(|c| SYMBOLS.contains(c)) {
        score += 1;
    } else {
        feedback.push(ADD_SYMBOL.to_string());
    }

    if has_common_sequence(password) {
        score -= 1;
        feedback.push(AVOID_SEQUENCES.to_string());
    }

    let score = score.max(0) as u32;

    StrengthReport {
        valid: score >= VALID_SCORE,
        score,
        feedback,
    }
}

fn has_common_sequence(password: &str) -> bool {
    let lower = password.to_lowercase();
    COMMON_SEQUENCES.iter().any(|seq| lower.contains(seq))
}
