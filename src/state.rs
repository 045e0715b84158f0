//! Shared application state built once at startup.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::application::services::LinkService;
use crate::config::Config;
use crate::infrastructure::persistence::SqliteLinkRepository;

/// Services and connections shared by every command.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<SqlitePool>,
    pub link_service: Arc<LinkService<SqliteLinkRepository>>,
}

impl AppState {
    /// Wires repositories and services on top of an open pool.
    pub fn new(pool: Arc<SqlitePool>, config: &Config) -> Self {
        let link_repository = Arc::new(SqliteLinkRepository::new(pool.clone()));
        let link_service = Arc::new(
            LinkService::new(link_repository)
                .with_oracle_policy(config.oracle_policy)
                .with_save_attempts(config.save_max_attempts),
        );

        Self { pool, link_service }
    }
}
