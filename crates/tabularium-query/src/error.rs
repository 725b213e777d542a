// Error types module
use thiserror::Error;

/// Main error type for query materialization.
///
/// Malformed querystring input is not an error anywhere in this crate:
/// unknown fields, operators and unparseable values are dropped before a
/// query is built, so the surface always yields a valid result set. What
/// remains is datastore failure.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}

/// Result alias using [`QueryError`].
pub type Result<T> = std::result::Result<T, QueryError>;
