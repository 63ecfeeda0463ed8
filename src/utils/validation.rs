// src/utils/validation.rs

pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let no_space = |s: &str| !s.is_empty() && !s.chars().any(char::is_whitespace);

    no_space(local)
        && !domain.contains('@')
        && domain
            .split_once('.')
            .map_or(false, |(host, tld)| no_space(host) && no_space(tld))
}

/// Non-blank check; the error names the field.
pub fn validate_required(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(())
}

pub fn validate_max_length(value: &str, max: usize, field: &str) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{} must be at most {} characters", field, max));
    }
    Ok(())
}
