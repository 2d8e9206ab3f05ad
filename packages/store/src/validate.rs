//! Field validators for signup and note uploads.
//!
//! Each validator returns the normalized value or a [`ValidationError`] whose
//! `Display` text is shown to the user as-is.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Role;

/// Minimum number of characters in a raw password.
pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Please use a valid email address")]
    InvalidEmail,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Role must be student or teacher, got '{0}'")]
    InvalidRole(String),
    #[error("Email already registered. Please use a different email.")]
    DuplicateEmail,
}

/// Trim a required text field.
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(value.to_string())
}

/// Trim, lowercase and pattern-check an email address.
pub fn email(value: &str) -> Result<String, ValidationError> {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return Err(ValidationError::Missing("Email"));
    }
    if !EMAIL_PATTERN.is_match(&value) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(value)
}

/// Check the raw password length. The password is not trimmed.
pub fn password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Missing("Password"));
    }
    if value.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Parse a role, treating an absent or blank value as the default.
pub fn role(value: Option<&str>) -> Result<Role, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(Role::default()),
        Some(other) => other.parse(),
    }
}
