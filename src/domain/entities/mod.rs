//! Core domain entities.
//!
//! - [`Link`] - A stored alias-to-URL mapping
//! - [`NewLink`] - Input for creating a mapping

pub mod link;

pub use link::{Link, NewLink};
