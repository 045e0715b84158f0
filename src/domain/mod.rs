//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`alias`] - Alias generation and collision resolution
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Alias generation talks to storage only through [`alias::AliasOracle`]

pub mod alias;
pub mod entities;
pub mod repositories;
