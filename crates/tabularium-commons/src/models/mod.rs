//! Catalog entity models and typed identifiers.
//!
//! These are the fixed metadata entities describing what tabular datasets
//! exist (`Dataset` → `Version` → `Table` → `Field`, plus `Link`). The
//! metadata store owns the rows; this crate owns their in-process shape.

mod dataset;
mod field;
mod ids;
mod link;
mod slug;
mod table;
mod version;

pub use dataset::Dataset;
pub use field::Field;
pub use ids::{DatasetId, FieldId, TableId, VersionId};
pub use link::Link;
pub use slug::{Slug, SlugValidationError, MAX_SLUG_LENGTH};
pub use table::{Table, MAX_IDENTIFIER_LENGTH, PHYSICAL_TABLE_PREFIX};
pub use version::Version;
