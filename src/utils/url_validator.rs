//! URL validation for submitted links.
//!
//! URLs are checked but stored verbatim: the alias is ranked from the exact
//! text the user submitted.

use url::Url;

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Validates a URL submitted for shortening.
///
/// # Rules
///
/// 1. **Non-empty** after trimming surrounding whitespace
/// 2. **Parseable** as an absolute URL
/// 3. **Protocol**: only HTTP and HTTPS are allowed
/// 4. **Host**: must be present
///
/// Rejects potentially dangerous protocols like `javascript:`, `data:`, `file:`.
///
/// # Errors
///
/// Returns the first rule that the input violates.
///
/// # Examples
///
/// ```
/// use url_alias::utils::url_validator::validate_url;
///
/// assert!(validate_url("https://example.com/Path?q=1").is_ok());
/// assert!(validate_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
