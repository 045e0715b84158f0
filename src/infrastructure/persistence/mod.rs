//! SQLite repository implementations and connection setup.
//!
//! # Repositories
//!
//! - [`SqliteLinkRepository`] - Alias storage and lookup

pub mod sqlite_link_repository;

pub use sqlite_link_repository::SqliteLinkRepository;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

/// Embedded schema migrations from `./migrations`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Opens a pool for `database_url`, creating the database file if missing,
/// and applies pending migrations.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the URL is malformed, the database
/// cannot be opened, or a migration fails.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    connect_timeout: Duration,
) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(connect_timeout)
        .connect_with(options)
        .await?;
    tracing::info!("Connected to database");

    MIGRATOR.run(&pool).await?;
    tracing::info!("Migrations applied");

    Ok(pool)
}
