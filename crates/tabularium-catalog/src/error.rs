// Error types module
use tabularium_commons::CommonError;
use thiserror::Error;

/// Main error type for catalog lookups and updates.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Dataset has no versions: {0}")]
    NoVersions(String),

    #[error("Field '{field}' is not an attribute of record type {type_name}")]
    UnknownColumn { field: String, type_name: String },

    #[error("Invalid metadata: {0}")]
    Metadata(#[from] CommonError),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}

/// Result alias using [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
