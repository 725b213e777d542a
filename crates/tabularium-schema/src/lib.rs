//! # tabularium-schema
//!
//! Dynamic record-type synthesis and physical schema management.
//!
//! Given a `Table` metadata row and its `Field` children, this crate
//! produces a [`RecordType`] descriptor (typed attributes, derived index
//! set, the declared ordering/filtering/search surfaces and the hidden
//! search-vector column), caches it process-wide by `TableId`, and
//! materializes/destroys the physical PostgreSQL storage for it.
//!
//! Record types are descriptors consumed by a generic query layer: nothing
//! is generated or compiled at runtime.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tabularium_schema::{PhysicalSchemaManager, RecordTypeRegistry};
//!
//! let registry = RecordTypeRegistry::new();
//! let record_type = registry.get_or_synthesize(&slug, &table, &fields, false)?;
//!
//! let manager = PhysicalSchemaManager::new(pool);
//! manager.create_table(&record_type, false).await?;
//! manager.create_indexes(&record_type).await?;         // CONCURRENTLY
//! manager.install_search_trigger(&record_type, &config.search.language).await?;
//! manager.analyze(&record_type).await?;
//! ```

pub mod declaration;
pub mod error;
pub mod indexes;
pub mod physical;
pub mod record_type;
pub mod registry;

pub use declaration::render_declaration;
pub use error::SchemaError;
pub use indexes::{derive_indexes, index_name, IndexDefinition, IndexKind};
pub use physical::PhysicalSchemaManager;
pub use record_type::{synthesize, AttributeDescriptor, RecordType, SEARCH_VECTOR_COLUMN};
pub use registry::{RecordTypeRegistry, RegistryStats};
