// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Input validation for account fields.

use crate::auth::PasswordRequirements;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_USERNAME_LENGTH: usize = 64;
const MAX_PASSWORD_LENGTH: usize = 128;

// Local part: dot-separated atoms or a quoted string. Domain: an IPv4 literal or
// labels ending in an alphabetic TLD.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern is valid")
});

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email")]
    InvalidEmail,

    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username cannot exceed {0} characters")]
    UsernameTooLong(usize),

    #[error("Password has to be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Password cannot exceed {0} characters")]
    PasswordTooLong(usize),

    #[error("Invalid password: {0}")]
    WeakPassword(&'static str),

    #[error("Unsupported image type: {0}")]
    UnsupportedImage(String),

    #[error("Image cannot be empty")]
    EmptyImage,
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate an email address and return its normalized form (trimmed, lowercase).
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail);
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.to_lowercase())
}

/// Validate a username and return it trimmed.
pub fn validate_username(username: &str) -> ValidationResult<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }
    Ok(username.to_string())
}

/// Validate a plaintext password against the configured requirements.
pub fn validate_password(password: &str, requirements: &PasswordRequirements) -> ValidationResult<()> {
    let length = password.chars().count();
    if length < requirements.min_length {
        return Err(ValidationError::PasswordTooShort(requirements.min_length));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    if requirements.require_uppercase && !password.chars().any(char::is_uppercase) {
        return Err(ValidationError::WeakPassword("must contain an uppercase letter"));
    }
    if requirements.require_lowercase && !password.chars().any(char::is_lowercase) {
        return Err(ValidationError::WeakPassword("must contain a lowercase letter"));
    }
    if requirements.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::WeakPassword("must contain a digit"));
    }
    if requirements.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
        return Err(ValidationError::WeakPassword("must contain a special character"));
    }

    Ok(())
}

/// Map an uploaded image's content type to the file extension it is stored under.
pub fn image_extension(content_type: &str) -> ValidationResult<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/png" => Ok("png"),
        "image/jpeg" | "image/jpg" => Ok("jpg"),
        "image/gif" => Ok("gif"),
        "image/webp" => Ok("webp"),
        _ => Err(ValidationError::UnsupportedImage(content_type.to_string())),
    }
}
