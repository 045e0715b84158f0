//! Input validation helpers.
//!
//! - [`url_validator`] - Checks URLs submitted for shortening
//! - [`alias_validator`] - Checks user-chosen aliases

pub mod alias_validator;
pub mod url_validator;
