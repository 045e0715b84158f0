//! Application layer services implementing business logic.
//!
//! Services orchestrate domain operations by coordinating repository calls,
//! validation, and policy decisions.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Shortening, lookup, listing and deletion

pub mod services;
