//! Index derivation and deterministic index naming.

use serde::{Deserialize, Serialize};

/// Physical index kinds the schema manager knows how to build.
///
/// The set is closed on purpose: every variant has exactly one DDL
/// rendering, so an unrecognizable index kind cannot reach the index
/// creation batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    /// Ordered B-tree index, honors per-field ASC/DESC.
    BTree,
    /// Inverted index over the search vector column.
    Gin,
}

impl IndexKind {
    /// DDL spelling used in `CREATE INDEX ... USING <kind>`.
    pub fn sql_name(&self) -> &'static str {
        match self {
            IndexKind::BTree => "btree",
            IndexKind::Gin => "gin",
        }
    }
}

/// One derived index over a synthesized record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Deterministic name, see [`index_name`].
    pub name: String,

    pub kind: IndexKind,

    /// Field names; `-` prefix marks a descending B-tree member.
    pub fields: Vec<String>,
}

/// Number of table-stem bytes kept in the index name.
const INDEX_NAME_STEM: usize = 12;

/// Number of hash-suffix characters kept in the index name.
const INDEX_NAME_HASH: usize = 12;

/// Derive a deterministic index name.
///
/// The hash input covers table name, index purpose and the sorted field
/// set, so distinct field sets on one table cannot collide while repeated
/// derivations always agree. The table stem is truncated and the hash tail
/// is fixed-length, keeping every name well under the identifier bound.
pub fn index_name(tablename: &str, index_type: &str, fields: &[String]) -> String {
    let mut sorted = fields.to_vec();
    sorted.sort();
    let digest = md5::compute(format!("{} {} {}", tablename, index_type, sorted.join(", ")));
    let hash = format!("{:x}", digest);

    let stem: String = tablename
        .trim_start_matches("data_")
        .chars()
        .filter(|c| *c != '-')
        .take(INDEX_NAME_STEM)
        .collect();
    let initial = index_type.chars().next().unwrap_or('x');
    let tail = &hash[hash.len() - INDEX_NAME_HASH..];

    format!("idx_{}_{}{}", stem, initial, tail)
}

/// Derive the index set for a table's declared capabilities.
///
/// Policy:
/// - non-empty `ordering` gets one composite B-tree over exactly those
///   fields, descending markers preserved;
/// - every `filtering` field gets a single-field B-tree, unless it is the
///   sole ordering field (that index already covers it);
/// - non-empty `search` gets one GIN index over the search vector column.
pub fn derive_indexes(
    base_name: &str,
    ordering: &[String],
    filtering: &[String],
    search: &[String],
    search_vector_column: &str,
) -> Vec<IndexDefinition> {
    let mut indexes = Vec::new();

    if !ordering.is_empty() {
        indexes.push(IndexDefinition {
            name: index_name(base_name, "order", ordering),
            kind: IndexKind::BTree,
            fields: ordering.to_vec(),
        });
    }

    for field_name in filtering {
        if ordering.len() == 1 && ordering[0] == *field_name {
            continue;
        }
        let fields = vec![field_name.clone()];
        indexes.push(IndexDefinition {
            name: index_name(base_name, "filter", &fields),
            kind: IndexKind::BTree,
            fields,
        });
    }

    if !search.is_empty() {
        let fields = vec![search_vector_column.to_string()];
        indexes.push(IndexDefinition {
            name: index_name(base_name, "search", &fields),
            kind: IndexKind::Gin,
            fields,
        });
    }

    indexes
}
