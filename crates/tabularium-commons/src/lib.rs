//! # tabularium-commons
//!
//! Shared types for the tabularium data layer.
//!
//! This crate provides the foundational pieces used across the workspace
//! (tabularium-catalog, tabularium-schema, tabularium-query): the catalog
//! entity models, type-safe identifier wrappers, the closed field type
//! system, configuration loading and the common error type.
//!
//! ## Type-Safe Wrappers
//!
//! - `DatasetId` / `VersionId` / `TableId` / `FieldId`: row identifiers
//! - `Slug`: validated URL-safe dataset slug
//!
//! ## Example Usage
//!
//! ```rust
//! use tabularium_commons::models::{Slug, TableId};
//! use tabularium_commons::types::FieldType;
//!
//! let slug = Slug::new("socios-brasil");
//! let table_id = TableId::new(42);
//! let field_type: FieldType = "datetime".parse().unwrap();
//! assert_eq!(field_type, FieldType::DateTime);
//! ```

pub mod config;
pub mod errors;
pub mod models;
pub mod types;

pub use config::DataLayerConfig;
pub use errors::{CommonError, Result};
pub use models::{
    Dataset, DatasetId, Field, FieldId, Link, Slug, Table, TableId, Version, VersionId,
    MAX_IDENTIFIER_LENGTH,
};
pub use types::{FieldOptions, FieldType};
