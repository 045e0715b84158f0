//! Repository trait for alias-to-URL mappings.

use crate::domain::alias::AliasOracle;
use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the alias store.
///
/// The store owns alias uniqueness: [`LinkRepository::create`] is an atomic
/// insert that rejects a duplicate alias with [`AppError::Conflict`], kept
/// distinct from every other failure so callers can retry with a new alias.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteLinkRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the alias is already stored.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a mapping by alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_alias(&self, alias: &str) -> Result<Option<Link>, AppError>;

    /// Returns whether `alias` is already stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn alias_exists(&self, alias: &str) -> Result<bool, AppError>;

    /// Lists every mapping, oldest first.
    async fn list(&self) -> Result<Vec<Link>, AppError>;

    /// Deletes the mapping for `alias`.
    ///
    /// Returns `Ok(false)` if nothing was stored under that alias.
    async fn delete(&self, alias: &str) -> Result<bool, AppError>;

    /// Counts stored mappings.
    async fn count(&self) -> Result<i64, AppError>;
}

/// Exposes a [`LinkRepository`] as the [`AliasOracle`] consulted during
/// alias generation.
pub struct RepositoryOracle<'a, R: ?Sized>(pub &'a R);

#[async_trait]
impl<R: LinkRepository + ?Sized> AliasOracle for RepositoryOracle<'_, R> {
    async fn exists(&self, alias: &str) -> Result<bool, AppError> {
        self.0.alias_exists(alias).await
    }
}
