//! # URL Alias
//!
//! A URL shortener whose aliases are drawn from the letters of the URL itself.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Alias generation, entities and repository traits
//! - **Application Layer** ([`application`]) - Shortening, lookup and deletion services
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite persistence
//!
//! ## Alias generation
//!
//! The letters of the URL are ranked by frequency and placed ahead of the rest
//! of the alphabet. A 6-character alias is sampled from that pool and checked
//! against the store; on collision single characters are mutated up to ten
//! times, after which a 2-character suffix guarantees termination. See
//! [`domain::alias`].
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL="sqlite://storage/storage.db"
//! cargo run -- shorten https://example.com/some/long/path
//! cargo run -- list
//! ```
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables via [`config::Config`].

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
pub mod prelude {
    pub use crate::application::services::{LinkService, OraclePolicy, Shortened};
    pub use crate::domain::alias::{AliasOracle, Resolution, ResolvedAlias, generate_alias};
    pub use crate::domain::entities::{Link, NewLink};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
