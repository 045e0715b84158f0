//! Alias generation biased toward the letters of the target URL.
//!
//! - [`ranker`] - Letter-frequency ranking and the sampling alphabet
//! - [`resolver`] - Candidate sampling and bounded collision resolution
//!
//! # Flow
//!
//! 1. [`rank`] orders the URL's letters by frequency (at most six kept)
//! 2. [`candidate_pool`] appends the rest of `a`..`z` behind them
//! 3. [`generate_alias`] samples a 6-character candidate and checks it
//!    against an [`AliasOracle`], mutating one character at a time on
//!    collision and appending a 2-character suffix once the budget is spent

pub mod ranker;
pub mod resolver;

pub use ranker::{CandidatePool, RankedAlphabet, candidate_pool, rank};
pub use resolver::{
    ALIAS_LEN, AliasOracle, MAX_MUTATION_ATTEMPTS, Resolution, ResolvedAlias, SUFFIX_LEN,
    generate_alias,
};

#[cfg(test)]
pub use resolver::MockAliasOracle;
