//! Runtime record-type synthesis from table metadata.
//!
//! A [`RecordType`] is a data-driven descriptor, not a generated type: the
//! storage and query layers are parameterized over it instead of compiling
//! anything at runtime. One descriptor exists per `TableId` in the
//! process-wide registry unless explicitly invalidated.

use crate::error::SchemaError;
use crate::indexes::{derive_indexes, IndexDefinition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tabularium_commons::models::{Field, Slug, Table, TableId};
use tabularium_commons::types::{FieldOptions, FieldType};

/// Hidden tsvector column maintained by the search trigger on every
/// physical table.
pub const SEARCH_VECTOR_COLUMN: &str = "search_data";

/// One typed attribute of a synthesized record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Physical column identifier.
    pub name: String,

    pub field_type: FieldType,

    pub nullable: bool,

    /// Bounds for the bounded types (string length, decimal precision).
    pub options: FieldOptions,
}

impl AttributeDescriptor {
    /// DDL fragment for this attribute's column.
    pub fn to_sql(&self) -> String {
        let mut parts = vec![self.name.clone(), self.field_type.sql_type(&self.options)];
        if !self.nullable {
            parts.push("NOT NULL".to_string());
        }
        parts.join(" ")
    }
}

/// Runtime descriptor for one table's rows: physical binding, ordered
/// attributes, derived indexes and the declared query surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    /// Metadata row this type was synthesized from; registry key.
    pub table_id: TableId,

    /// Synthetic type name, unique per physical table name.
    pub type_name: String,

    /// Physical table name in the datastore.
    pub table_name: String,

    /// Attribute descriptors in declared field order. The implicit search
    /// vector column is not listed here; see [`SEARCH_VECTOR_COLUMN`].
    pub attributes: Vec<AttributeDescriptor>,

    /// Declared sort order (descending markers preserved).
    pub ordering: Vec<String>,

    /// Fields eligible for predicate filtering.
    pub filtering: Vec<String>,

    /// Fields feeding the search vector.
    pub search: Vec<String>,

    /// Derived index set, see [`crate::indexes::derive_indexes`].
    pub indexes: Vec<IndexDefinition>,
}

impl RecordType {
    /// Look up an attribute by column name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Field names allowed in `order-by` requests: declared ordering plus
    /// filtering fields, lowercased with descending markers stripped.
    pub fn allowed_sort_fields(&self) -> BTreeSet<String> {
        self.ordering
            .iter()
            .chain(self.filtering.iter())
            .map(|field| field.trim_start_matches('-').trim().to_lowercase())
            .collect()
    }

    /// Whether full-text search is available on this type.
    pub fn has_search(&self) -> bool {
        !self.search.is_empty()
    }
}

/// Build the synthetic type name: slug and table name joined with a dash,
/// underscores normalized to dashes, each word capitalized.
fn type_name_for(slug: &Slug, table_name: &str) -> String {
    let joined = format!("{}-{}", slug.as_str(), table_name.replace('_', "-"));
    joined
        .split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Synthesize a record type from a table metadata row and its fields.
///
/// Fields are taken in `order` position; every field's type spelling must
/// resolve against the closed enum or synthesis aborts with
/// [`SchemaError::UnknownFieldType`]. The index set is derived from the
/// table's declared capabilities.
pub fn synthesize(slug: &Slug, table: &Table, fields: &[Field]) -> Result<RecordType, SchemaError> {
    let table_name = table.physical_table_name(slug)?;

    let mut sorted: Vec<&Field> = fields.iter().collect();
    sorted.sort_by_key(|field| field.order);

    let mut attributes = Vec::with_capacity(sorted.len());
    for field in sorted {
        let field_type = field
            .field_type()
            .map_err(|_| SchemaError::UnknownFieldType {
                field: field.name.clone(),
                type_name: field.type_name.clone(),
            })?;
        attributes.push(AttributeDescriptor {
            name: field.name.clone(),
            field_type,
            nullable: field.null,
            options: field.field_options(),
        });
    }

    let ordering = table.ordering.clone();
    let filtering = table.filtering().to_vec();
    let search = table.search().to_vec();

    // The hash base matches the pre-capitalization type name, so index
    // names stay stable when only display metadata changes.
    let base_name = format!("{}-{}", slug.as_str(), table.name.replace('_', "-"));
    let indexes = derive_indexes(
        &base_name,
        &ordering,
        &filtering,
        &search,
        SEARCH_VECTOR_COLUMN,
    );

    Ok(RecordType {
        table_id: table.id,
        type_name: type_name_for(slug, &table.name),
        table_name,
        attributes,
        ordering,
        filtering,
        search,
        indexes,
    })
}
