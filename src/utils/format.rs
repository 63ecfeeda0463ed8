// src/utils/format.rs
use chrono::{DateTime, Utc};

// Format a timestamp relative to now for display
pub fn format_time_ago(time: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(time);

    let seconds = duration.num_seconds().max(0);

    if seconds < 60 {
        format!("{} seconds ago", seconds)
    } else if seconds < 3600 {
        format!("{} minutes ago", duration.num_minutes())
    } else if seconds < 86400 {
        format!("{} hours ago", duration.num_hours())
    } else if seconds < 2592000 {
        format!("{} days ago", duration.num_days())
    } else if seconds < 31536000 {
        format!("{} months ago", duration.num_days() / 30)
    } else {
        format!("{} years ago", duration.num_days() / 365)
    }
}

// Truncate a string to `max_len` characters, marking the cut with "..."
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let head: String = s.chars().take(keep).collect();
    format!("{}...", head)
}

// Hide a secret behind one bullet per character
pub fn mask_password(password: &str) -> String {
    "•".repeat(password.chars().count())
}
