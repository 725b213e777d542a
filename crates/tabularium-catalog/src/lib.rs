//! # tabularium-catalog
//!
//! Metadata catalog access for the tabularium data layer.
//!
//! Reads the catalog entities (`Dataset` → `Version` → `Table` → `Field`,
//! plus `Link`) from the PostgreSQL metadata store and maintains the cached
//! distinct-value lists for choiceable fields. Version resolution follows
//! the platform rule: only the highest-`order` version's tables are
//! current.
//!
//! Note that catalog reads are not cached here: the process-wide cache for
//! the expensive artifact (the synthesized record type) lives in
//! `tabularium_schema::RecordTypeRegistry`, keyed by `TableId`.

pub mod error;
pub mod store;

pub use error::CatalogError;
pub use store::CatalogStore;
