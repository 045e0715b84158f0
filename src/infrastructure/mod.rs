//! Infrastructure layer for external integrations.
//!
//! - [`persistence`] - SQLite repository implementations
//!
//! The alias store is the only external system; caching and other
//! integrations are left to embedding applications.

pub mod persistence;
