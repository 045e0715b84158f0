//! Alias generation with bounded collision resolution.
//!
//! A candidate is sampled from the URL's [`CandidatePool`] and checked
//! against an [`AliasOracle`]. On collision, up to
//! [`MAX_MUTATION_ATTEMPTS`] single-character mutations are tried; if all of
//! them are taken, a random suffix is appended to the original candidate.
//! Every call therefore terminates after at most `1 + MAX_MUTATION_ATTEMPTS`
//! oracle queries.

use async_trait::async_trait;
use rand::Rng;

use super::ranker::{CandidatePool, candidate_pool};
use crate::error::AppError;

/// Length of a freshly generated alias.
pub const ALIAS_LEN: usize = 6;

/// Single-character mutations tried after the first candidate collides.
pub const MAX_MUTATION_ATTEMPTS: usize = 10;

/// Characters appended when every mutation attempt collides.
pub const SUFFIX_LEN: usize = 2;

/// Answers whether an alias is already taken.
///
/// Implementations only read; the store's unique constraint remains the
/// authority on uniqueness.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AliasOracle: Send + Sync {
    /// Returns `Ok(true)` if `alias` is already stored.
    ///
    /// # Errors
    ///
    /// Returns an error on a transient lookup failure.
    async fn exists(&self, alias: &str) -> Result<bool, AppError>;
}

/// How a generated alias was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// First candidate, confirmed free.
    Fresh,
    /// First candidate returned without confirmation because the oracle failed.
    Unchecked,
    /// Found free by the mutation attempt with this 1-based index.
    Mutated { attempt: usize },
    /// Mutation budget exhausted; suffix appended without confirmation.
    Suffixed,
}

impl Resolution {
    /// Returns true if the oracle confirmed the alias was free.
    pub fn is_verified(self) -> bool {
        matches!(self, Self::Fresh | Self::Mutated { .. })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Unchecked => "unchecked",
            Self::Mutated { .. } => "mutated",
            Self::Suffixed => "suffixed",
        }
    }
}

/// An alias together with the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAlias {
    pub alias: String,
    pub resolution: Resolution,
}

/// Generates an alias for `url` that the oracle has not reported as taken.
///
/// Never fails: oracle errors on the first check return the candidate
/// unchecked, oracle errors during mutation skip that attempt, and an
/// exhausted mutation budget falls back to an 8-character alias. The result
/// is still subject to the store's unique constraint at insert time.
pub async fn generate_alias<O, R>(url: &str, oracle: &O, rng: &mut R) -> ResolvedAlias
where
    O: AliasOracle + ?Sized,
    R: Rng,
{
    const OP: &str = "alias.generate";

    let pool = candidate_pool(url);
    tracing::debug!(
        op = OP,
        url,
        pool = %to_alias(pool.as_bytes()),
        "Candidate pool built"
    );

    let candidate = sample(&pool, ALIAS_LEN, rng);
    let alias = to_alias(&candidate);
    tracing::debug!(op = OP, alias = %alias, "Candidate generated");

    match oracle.exists(&alias).await {
        Err(e) => {
            tracing::error!(
                op = OP,
                alias = %alias,
                error = %e,
                "Alias lookup failed, returning unchecked candidate"
            );
            metrics::counter!("alias_oracle_errors_total", "stage" => "initial").increment(1);
            return finish(alias, Resolution::Unchecked);
        }
        Ok(false) => {
            tracing::info!(op = OP, alias = %alias, "Alias generated");
            return finish(alias, Resolution::Fresh);
        }
        Ok(true) => {
            tracing::info!(op = OP, alias = %alias, "Alias already taken, mutating");
        }
    }

    if let Some(resolved) = mutate(&candidate, &pool, oracle, rng).await {
        return resolved;
    }

    let original = to_alias(&candidate);
    let mut extended = candidate;
    extended.extend(sample(&pool, SUFFIX_LEN, rng));
    let alias = to_alias(&extended);

    tracing::warn!(
        op = OP,
        original = %original,
        alias = %alias,
        attempts = MAX_MUTATION_ATTEMPTS,
        "No free mutation found, appending suffix"
    );

    finish(alias, Resolution::Suffixed)
}

/// Runs the bounded single-character mutation loop.
///
/// A taken mutation is reverted before the next attempt; a mutation whose
/// lookup failed is kept, so the next attempt starts from it.
async fn mutate<O, R>(
    original: &[u8],
    pool: &CandidatePool,
    oracle: &O,
    rng: &mut R,
) -> Option<ResolvedAlias>
where
    O: AliasOracle + ?Sized,
    R: Rng,
{
    const OP: &str = "alias.mutate";

    let mut current = original.to_vec();

    for attempt in 1..=MAX_MUTATION_ATTEMPTS {
        let position = rng.random_range(0..current.len());
        let previous = current[position];
        let replacement = pick_other(pool, previous, rng);

        current[position] = replacement;
        let alias = to_alias(&current);

        tracing::debug!(
            op = OP,
            attempt,
            position,
            from = %char::from(previous),
            to = %char::from(replacement),
            alias = %alias,
            "Mutation attempted"
        );

        match oracle.exists(&alias).await {
            Err(e) => {
                tracing::error!(op = OP, attempt, alias = %alias, error = %e, "Mutation lookup failed");
                metrics::counter!("alias_oracle_errors_total", "stage" => "mutation").increment(1);
            }
            Ok(false) => {
                tracing::info!(op = OP, attempt, alias = %alias, "Mutated alias is free");
                return Some(finish(alias, Resolution::Mutated { attempt }));
            }
            Ok(true) => {
                current[position] = previous;
            }
        }
    }

    None
}

/// Picks a pool character other than `current`, uniformly.
fn pick_other<R: Rng>(pool: &CandidatePool, current: u8, rng: &mut R) -> u8 {
    let bytes = pool.as_bytes();
    let mut index = rng.random_range(0..bytes.len() - 1);

    // Shift past the current character so every other one is equally likely.
    if let Some(current_index) = bytes.iter().position(|&b| b == current)
        && index >= current_index
    {
        index += 1;
    }

    bytes[index]
}

fn sample<R: Rng>(pool: &CandidatePool, len: usize, rng: &mut R) -> Vec<u8> {
    let bytes = pool.as_bytes();
    (0..len)
        .map(|_| bytes[rng.random_range(0..bytes.len())])
        .collect()
}

fn to_alias(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

fn finish(alias: String, resolution: Resolution) -> ResolvedAlias {
    metrics::counter!("alias_resolutions_total", "outcome" => resolution.as_str()).increment(1);
    ResolvedAlias { alias, resolution }
}
