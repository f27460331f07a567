//! Input checks shared by the services. Each returns `BadInput` with a message fit
//! for the response body.
use crate::error::RecordsError;
use lazy_static::lazy_static;
use regex::Regex;

pub const MIN_PASSWORD_LENGTH: usize = 6;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Trims and lower cases an email address, then checks its shape
pub fn normalize_email(email: &str) -> Result<String, RecordsError> {
    let email = email.trim().to_lowercase();
    if EMAIL_RE.is_match(&email) {
        Ok(email)
    } else {
        Err(RecordsError::BadInput("A valid email is required".to_string()))
    }
}

pub fn check_password(password: &str) -> Result<(), RecordsError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(RecordsError::BadInput(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Returns the trimmed value, or `BadInput("<field> is required")` if nothing is left
pub fn required(field: &str, value: &str) -> Result<String, RecordsError> {
    let value = value.trim();
    if value.is_empty() {
        Err(RecordsError::BadInput(format!("{field} is required")))
    } else {
        Ok(value.to_string())
    }
}
