use chrono::{DateTime, Utc};

use crate::error::ApiError;

pub fn validate_prompt(prompt: Option<&str>, max_length: usize) -> Result<&str, ApiError> {
    let prompt = prompt.unwrap_or_default();

    if prompt.trim().is_empty() {
        return Err(ApiError::Validation("Prompt is required".to_string()));
    }

    let length = prompt.chars().count();
    if length > max_length {
        return Err(ApiError::Validation(format!(
            "Prompt too long ({} characters, maximum {})",
            length, max_length
        )));
    }

    Ok(prompt)
}

pub fn require_field<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::Validation(format!("{} is required", field))),
    }
}

/// `None` means the default. Zero is rejected; anything above `max` is capped at `max`.
pub fn validate_limit(
    requested: Option<usize>,
    default: usize,
    max: usize,
) -> Result<usize, ApiError> {
    match requested {
        Some(0) => Err(ApiError::Validation(
            "limit must be at least 1".to_string(),
        )),
        Some(limit) => Ok(limit.min(max.max(1))),
        None => Ok(default.clamp(1, max.max(1))),
    }
}

pub fn validate_date_range(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<(), ApiError> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(ApiError::Validation(format!(
            "from ({}) is after to ({})",
            from.to_rfc3339(),
            to.to_rfc3339()
        ))),
        _ => Ok(()),
    }
}
