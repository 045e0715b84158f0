#![allow(dead_code)]

use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use url_alias::application::services::LinkService;
use url_alias::infrastructure::persistence::{self, SqliteLinkRepository};

/// Opens a fresh in-memory database with migrations applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn test_pool() -> SqlitePool {
    persistence::connect("sqlite::memory:", 1, Duration::from_secs(5))
        .await
        .unwrap()
}

pub async fn create_test_link(pool: &SqlitePool, alias: &str, url: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO url (url, alias, created_at) VALUES (?1, ?2, ?3) RETURNING id",
    )
    .bind(url)
    .bind(alias)
    .bind(chrono::Utc::now())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn create_test_repository(pool: SqlitePool) -> Arc<SqliteLinkRepository> {
    Arc::new(SqliteLinkRepository::new(Arc::new(pool)))
}

pub fn create_test_service(pool: SqlitePool) -> LinkService<SqliteLinkRepository> {
    LinkService::new(create_test_repository(pool))
}
