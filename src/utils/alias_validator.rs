//! Validation of user-chosen aliases.

use crate::error::AppError;
use serde_json::json;

/// Shortest accepted custom alias.
pub const MIN_CUSTOM_ALIAS_LEN: usize = 4;

/// Longest accepted custom alias.
pub const MAX_CUSTOM_ALIAS_LEN: usize = 32;

/// Validates a user-provided custom alias.
///
/// # Rules
///
/// - Length: 4-32 characters
/// - Allowed characters: lowercase letters, digits, hyphens
/// - Cannot start or end with a hyphen
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_custom_alias("my-link-2024").is_ok());
/// assert!(validate_custom_alias("abc").is_err());       // Too short
/// assert!(validate_custom_alias("MyAlias").is_err());   // Uppercase
/// assert!(validate_custom_alias("-invalid").is_err());  // Starts with hyphen
/// ```
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    if !(MIN_CUSTOM_ALIAS_LEN..=MAX_CUSTOM_ALIAS_LEN).contains(&alias.len()) {
        return Err(AppError::bad_request(
            format!(
                "Custom alias must be {MIN_CUSTOM_ALIAS_LEN}-{MAX_CUSTOM_ALIAS_LEN} characters"
            ),
            json!({ "provided_length": alias.len() }),
        ));
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::bad_request(
            "Custom alias can only contain lowercase letters, digits, and hyphens",
            json!({ "alias": alias }),
        ));
    }

    if alias.starts_with('-') || alias.ends_with('-') {
        return Err(AppError::bad_request(
            "Custom alias cannot start or end with a hyphen",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
