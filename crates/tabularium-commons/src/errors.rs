//! Shared error types for the tabularium data layer.
//!
//! This module provides the common error type used across the workspace
//! crates for validation and lookup failures that are not tied to a
//! specific subsystem.
//!
//! ## Example Usage
//!
//! ```rust
//! use tabularium_commons::errors::{CommonError, Result};
//!
//! fn validate_slug(slug: &str) -> Result<()> {
//!     if slug.is_empty() {
//!         return Err(CommonError::InvalidInput("Slug cannot be empty".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Common error type for tabularium operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Invalid input provided to a function
    InvalidInput(String),

    /// Resource not found (dataset, version, table, field)
    NotFound(String),

    /// A derived identifier exceeds the datastore identifier length bound
    IdentifierTooLong(String),

    /// Configuration error
    ConfigurationError(String),

    /// Internal error (unexpected state)
    Internal(String),
}

impl CommonError {
    /// Creates an InvalidInput error with a message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates a NotFound error with a message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates an IdentifierTooLong error with a message.
    pub fn identifier_too_long(msg: impl Into<String>) -> Self {
        Self::IdentifierTooLong(msg.into())
    }

    /// Creates a ConfigurationError with a message.
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Creates an Internal error with a message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommonError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CommonError::NotFound(msg) => write!(f, "Not found: {}", msg),
            CommonError::IdentifierTooLong(msg) => write!(f, "Identifier too long: {}", msg),
            CommonError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            CommonError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for CommonError {}

/// Result alias using [`CommonError`].
pub type Result<T> = std::result::Result<T, CommonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = CommonError::invalid_input("bad slug");
        assert_eq!(err.to_string(), "Invalid input: bad slug");

        let err = CommonError::not_found("dataset xyz");
        assert_eq!(err.to_string(), "Not found: dataset xyz");

        let err = CommonError::identifier_too_long("data_verylongname_table");
        assert!(err.to_string().starts_with("Identifier too long"));
    }

    #[test]
    fn test_constructors_accept_str_and_string() {
        let a = CommonError::internal("boom");
        let b = CommonError::internal("boom".to_string());
        assert_eq!(a, b);
    }
}
