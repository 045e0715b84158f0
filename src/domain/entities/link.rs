//! Link entity representing a stored alias-to-URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored mapping between an alias and the original URL.
///
/// The URL is kept verbatim, exactly as it was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id: i64,
    pub url: String,
    pub alias: String,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(id: i64, url: String, alias: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            url,
            alias,
            created_at,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub url: String,
    pub alias: String,
}
