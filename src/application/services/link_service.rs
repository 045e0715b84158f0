//! Link creation, lookup and deletion service.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::alias::{self, Resolution, ResolvedAlias};
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, RepositoryOracle};
use crate::error::AppError;
use crate::utils::alias_validator::validate_custom_alias;
use crate::utils::url_validator::validate_url;

/// Default number of generate-then-insert attempts.
pub const DEFAULT_SAVE_ATTEMPTS: usize = 3;

/// What to do when the store cannot answer the first existence check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OraclePolicy {
    /// Hand out the unchecked candidate; the store's constraint is the backstop.
    #[default]
    FailOpen,
    /// Refuse with [`AppError::Unavailable`].
    FailClosed,
}

impl FromStr for OraclePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fail-open" | "open" => Ok(Self::FailOpen),
            "fail-closed" | "closed" => Ok(Self::FailClosed),
            other => anyhow::bail!("expected 'fail-open' or 'fail-closed', got '{other}'"),
        }
    }
}

impl fmt::Display for OraclePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FailOpen => "fail-open",
            Self::FailClosed => "fail-closed",
        })
    }
}

/// A freshly stored link.
#[derive(Debug, Clone)]
pub struct Shortened {
    pub link: Link,
    /// How the alias was generated; `None` for user-chosen aliases.
    pub resolution: Option<Resolution>,
}

/// Service for creating, resolving and deleting short links.
///
/// Generated aliases come from [`alias::generate_alias`]. Because the
/// existence check and the insert are not atomic, a concurrent writer can
/// claim the same alias in between; the store then reports
/// [`AppError::Conflict`] and the whole generate-then-insert sequence is
/// retried with a new alias.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    oracle_policy: OraclePolicy,
    save_attempts: usize,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service with fail-open lookups and
    /// [`DEFAULT_SAVE_ATTEMPTS`] save attempts.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self {
            link_repository,
            oracle_policy: OraclePolicy::default(),
            save_attempts: DEFAULT_SAVE_ATTEMPTS,
        }
    }

    pub fn with_oracle_policy(mut self, policy: OraclePolicy) -> Self {
        self.oracle_policy = policy;
        self
    }

    /// Sets the number of generate-then-insert attempts (at least one).
    pub fn with_save_attempts(mut self, attempts: usize) -> Self {
        self.save_attempts = attempts.max(1);
        self
    }

    /// Shortens `url`, storing it verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL or custom alias is invalid.
    /// Returns [`AppError::Conflict`] if the custom alias is taken, or if
    /// every generated alias was claimed concurrently.
    /// Returns [`AppError::Unavailable`] under [`OraclePolicy::FailClosed`]
    /// when the alias lookup fails.
    pub async fn shorten(&self, url: &str, custom_alias: Option<&str>) -> Result<Shortened, AppError> {
        const OP: &str = "link_service.shorten";

        validate_url(url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if let Some(custom) = custom_alias {
            let link = self.save_custom(url, custom).await?;
            tracing::info!(op = OP, alias = %link.alias, "Link saved with custom alias");
            return Ok(Shortened {
                link,
                resolution: None,
            });
        }

        let strategy = ExponentialBackoff::from_millis(2)
            .factor(5)
            .max_delay(Duration::from_millis(200))
            .map(jitter)
            .take(self.save_attempts - 1);

        let shortened = RetryIf::start(
            strategy,
            || self.save_generated(url),
            |e: &AppError| e.is_conflict(),
        )
        .await?;

        tracing::info!(
            op = OP,
            alias = %shortened.link.alias,
            id = shortened.link.id,
            "Link saved"
        );

        Ok(shortened)
    }

    /// Generates an alias for `url` without storing anything.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] only under
    /// [`OraclePolicy::FailClosed`] when the first lookup fails. With the
    /// default policy this never fails.
    pub async fn generate_alias(&self, url: &str) -> Result<ResolvedAlias, AppError> {
        let mut rng = StdRng::from_rng(&mut rand::rng());
        let oracle = RepositoryOracle(self.link_repository.as_ref());

        let resolved = alias::generate_alias(url, &oracle, &mut rng).await;

        if resolved.resolution == Resolution::Unchecked
            && self.oracle_policy == OraclePolicy::FailClosed
        {
            return Err(AppError::unavailable(
                "Alias uniqueness could not be verified",
                json!({ "alias": resolved.alias }),
            ));
        }

        Ok(resolved)
    }

    /// Retrieves a link by alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link uses the alias.
    pub async fn resolve(&self, alias: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_alias(alias)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "alias": alias })))
    }

    /// Lists every stored link.
    pub async fn list(&self) -> Result<Vec<Link>, AppError> {
        self.link_repository.list().await
    }

    /// Counts stored links.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.link_repository.count().await
    }

    /// Deletes the link stored under `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link uses the alias.
    pub async fn delete(&self, alias: &str) -> Result<(), AppError> {
        if self.link_repository.delete(alias).await? {
            tracing::info!(alias, "Link deleted");
            Ok(())
        } else {
            Err(AppError::not_found(
                "Short link not found",
                json!({ "alias": alias }),
            ))
        }
    }

    async fn save_custom(&self, url: &str, custom: &str) -> Result<Link, AppError> {
        validate_custom_alias(custom)?;

        if self.link_repository.alias_exists(custom).await? {
            return Err(AppError::conflict(
                "Custom alias already exists",
                json!({ "alias": custom }),
            ));
        }

        self.link_repository
            .create(NewLink {
                url: url.to_string(),
                alias: custom.to_string(),
            })
            .await
    }

    async fn save_generated(&self, url: &str) -> Result<Shortened, AppError> {
        let resolved = self.generate_alias(url).await?;

        let new_link = NewLink {
            url: url.to_string(),
            alias: resolved.alias,
        };

        match self.link_repository.create(new_link).await {
            Ok(link) => Ok(Shortened {
                link,
                resolution: Some(resolved.resolution),
            }),
            Err(e) if e.is_conflict() => {
                tracing::warn!(
                    resolution = resolved.resolution.as_str(),
                    details = %e.details(),
                    "Alias claimed before insert"
                );
                metrics::counter!("alias_save_conflicts_total").increment(1);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alias::{ALIAS_LEN, MAX_MUTATION_ATTEMPTS, SUFFIX_LEN};
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;

    fn stored(new_link: NewLink) -> Result<Link, AppError> {
        Ok(Link::new(10, new_link.url, new_link.alias, Utc::now()))
    }

    fn create_test_link(id: i64, alias: &str, url: &str) -> Link {
        Link::new(id, url.to_string(), alias.to_string(), Utc::now())
    }

    fn alias_conflict() -> AppError {
        AppError::conflict("Unique constraint violation", json!({}))
    }

    #[tokio::test]
    async fn test_shorten_success() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_alias_exists()
            .times(1)
            .returning(|_| Ok(false));
        mock_link_repo
            .expect_create()
            .withf(|new_link| new_link.url == "http://example.com")
            .times(1)
            .returning(stored);

        let service = LinkService::new(Arc::new(mock_link_repo));

        let result = service.shorten("http://example.com", None).await;

        let shortened = result.unwrap();
        assert_eq!(shortened.resolution, Some(Resolution::Fresh));
        assert_eq!(shortened.link.alias.len(), ALIAS_LEN);
        assert_eq!(shortened.link.url, "http://example.com");
    }

    #[tokio::test]
    async fn test_shorten_keeps_url_verbatim() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo.expect_alias_exists().returning(|_| Ok(false));
        mock_link_repo
            .expect_create()
            .withf(|new_link| new_link.url == "HTTPS://Example.COM:443/Path#frag")
            .times(1)
            .returning(stored);

        let service = LinkService::new(Arc::new(mock_link_repo));

        let result = service
            .shorten("HTTPS://Example.COM:443/Path#frag", None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_shorten_invalid_url() {
        let mock_link_repo = MockLinkRepository::new();
        let service = LinkService::new(Arc::new(mock_link_repo));

        let result = service.shorten("not-a-url", None).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_shorten_suffix_fallback_when_everything_is_taken() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_alias_exists()
            .times(1 + MAX_MUTATION_ATTEMPTS)
            .returning(|_| Ok(true));
        mock_link_repo.expect_create().times(1).returning(stored);

        let service = LinkService::new(Arc::new(mock_link_repo));

        let shortened = service.shorten("http://example.com", None).await.unwrap();

        assert_eq!(shortened.resolution, Some(Resolution::Suffixed));
        assert_eq!(shortened.link.alias.len(), ALIAS_LEN + SUFFIX_LEN);
    }

    #[tokio::test]
    async fn test_shorten_retries_on_insert_conflict() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_alias_exists()
            .times(2)
            .returning(|_| Ok(false));

        let mut calls = 0;
        mock_link_repo
            .expect_create()
            .times(2)
            .returning(move |new_link| {
                calls += 1;
                if calls == 1 {
                    Err(alias_conflict())
                } else {
                    stored(new_link)
                }
            });

        let service = LinkService::new(Arc::new(mock_link_repo));

        let result = service.shorten("http://example.com", None).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_shorten_gives_up_after_save_attempts() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_alias_exists()
            .times(2)
            .returning(|_| Ok(false));
        mock_link_repo
            .expect_create()
            .times(2)
            .returning(|_| Err(alias_conflict()));

        let service = LinkService::new(Arc::new(mock_link_repo)).with_save_attempts(2);

        let result = service.shorten("http://example.com", None).await;

        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_shorten_does_not_retry_other_insert_errors() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_alias_exists()
            .times(1)
            .returning(|_| Ok(false));
        mock_link_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = LinkService::new(Arc::new(mock_link_repo));

        let result = service.shorten("http://example.com", None).await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_shorten_fail_open_saves_unchecked_alias() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_alias_exists()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        mock_link_repo.expect_create().times(1).returning(stored);

        let service = LinkService::new(Arc::new(mock_link_repo));

        let shortened = service.shorten("http://example.com", None).await.unwrap();

        assert_eq!(shortened.resolution, Some(Resolution::Unchecked));
    }

    #[tokio::test]
    async fn test_shorten_fail_closed_refuses_unchecked_alias() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_alias_exists()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        mock_link_repo.expect_create().times(0);

        let service =
            LinkService::new(Arc::new(mock_link_repo)).with_oracle_policy(OraclePolicy::FailClosed);

        let result = service.shorten("http://example.com", None).await;

        assert!(matches!(result.unwrap_err(), AppError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_shorten_with_custom_alias() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_alias_exists()
            .withf(|alias| alias == "my-link")
            .times(1)
            .returning(|_| Ok(false));
        mock_link_repo
            .expect_create()
            .withf(|new_link| new_link.alias == "my-link")
            .times(1)
            .returning(stored);

        let service = LinkService::new(Arc::new(mock_link_repo));

        let shortened = service
            .shorten("https://example.com", Some("my-link"))
            .await
            .unwrap();

        assert_eq!(shortened.link.alias, "my-link");
        assert_eq!(shortened.resolution, None);
    }

    #[tokio::test]
    async fn test_shorten_custom_alias_conflict() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_alias_exists()
            .times(1)
            .returning(|_| Ok(true));
        mock_link_repo.expect_create().times(0);

        let service = LinkService::new(Arc::new(mock_link_repo));

        let result = service.shorten("https://example.com", Some("taken")).await;

        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_shorten_invalid_custom_alias() {
        let mock_link_repo = MockLinkRepository::new();
        let service = LinkService::new(Arc::new(mock_link_repo));

        let result = service.shorten("https://example.com", Some("Bad Alias")).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut mock_link_repo = MockLinkRepository::new();

        let link = create_test_link(5, "emptac", "http://example.com");
        mock_link_repo
            .expect_find_by_alias()
            .withf(|alias| alias == "emptac")
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let service = LinkService::new(Arc::new(mock_link_repo));

        let link = service.resolve("emptac").await.unwrap();
        assert_eq!(link.url, "http://example.com");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_find_by_alias()
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(mock_link_repo));

        let result = service.resolve("nothing").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_delete()
            .withf(|alias| alias == "emptac")
            .returning(|_| Ok(true));
        mock_link_repo
            .expect_delete()
            .withf(|alias| alias == "absent")
            .returning(|_| Ok(false));

        let service = LinkService::new(Arc::new(mock_link_repo));

        assert!(service.delete("emptac").await.is_ok());
        assert!(matches!(
            service.delete("absent").await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_list() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo.expect_list().times(1).returning(|| {
            Ok(vec![
                create_test_link(1, "aaaaaa", "https://a.example"),
                create_test_link(2, "bbbbbb", "https://b.example"),
            ])
        });

        let service = LinkService::new(Arc::new(mock_link_repo));

        let links = service.list().await.unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].alias, "bbbbbb");
    }

    #[tokio::test]
    async fn test_count() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo.expect_count().times(1).returning(|| Ok(42));

        let service = LinkService::new(Arc::new(mock_link_repo));

        assert_eq!(service.count().await.unwrap(), 42);
    }

    #[test]
    fn test_oracle_policy_parsing() {
        assert_eq!("fail-open".parse::<OraclePolicy>().unwrap(), OraclePolicy::FailOpen);
        assert_eq!(
            "FAIL-CLOSED".parse::<OraclePolicy>().unwrap(),
            OraclePolicy::FailClosed
        );
        assert!("maybe".parse::<OraclePolicy>().is_err());
        assert_eq!(OraclePolicy::FailClosed.to_string(), "fail-closed");
    }

    #[test]
    fn test_save_attempts_at_least_one() {
        let service = LinkService::new(Arc::new(MockLinkRepository::new())).with_save_attempts(0);
        assert_eq!(service.save_attempts, 1);
    }
}
