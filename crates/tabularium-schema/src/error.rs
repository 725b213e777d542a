// Error types module
use tabularium_commons::CommonError;
use thiserror::Error;

/// Main error type for schema synthesis and physical schema management.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A field declared a type spelling outside the closed enum. Fatal at
    /// synthesis time; the record type is not constructed.
    #[error("Unknown field type '{type_name}' for field '{field}'")]
    UnknownFieldType { field: String, type_name: String },

    /// Metadata that cannot be turned into safe identifiers (bad table
    /// name, identifier over the length bound).
    #[error("Invalid table metadata: {0}")]
    Metadata(#[from] CommonError),

    /// The search trigger cannot be installed with the given language
    /// configuration value.
    #[error("Invalid search language configuration: {0}")]
    InvalidSearchLanguage(String),

    /// DDL execution failure, propagated unchanged from the datastore.
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}

/// Result alias using [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
