//! Table catalog entity.

use crate::errors::CommonError;
use crate::models::{DatasetId, Slug, TableId, VersionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// PostgreSQL truncates identifiers beyond this many bytes, which would
/// silently alias two distinct physical tables. Derivations check the bound
/// instead of relying on truncation.
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Prefix shared by every physical table this layer materializes.
pub const PHYSICAL_TABLE_PREFIX: &str = "data";

/// One tabular resource within a dataset version.
///
/// Carries the declared query capabilities (`ordering`, `filtering`,
/// `search`) that the synthesizer turns into indexes and the query layer
/// turns into allow-lists. Exactly one table per dataset/version is expected
/// to carry the `default` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Table {
    pub id: TableId,
    pub dataset_id: DatasetId,
    pub version_id: VersionId,

    /// Logical table name, unique within the dataset version.
    pub name: String,

    /// Whether this is the dataset's default table.
    pub default: bool,

    /// Hidden tables are excluded from the default listing surface but stay
    /// queryable when asked for explicitly.
    pub hidden: bool,

    /// Declared sort order: field names, `-` prefix marks descending.
    pub ordering: Vec<String>,

    /// Fields eligible for predicate filtering.
    pub filtering: Option<Vec<String>>,

    /// Fields indexed for full-text search.
    pub search: Option<Vec<String>>,

    /// Free-form per-table settings (frontend hints, import tuning).
    pub options: Option<serde_json::Value>,

    pub import_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl Table {
    /// Filtering field names, empty when none were declared.
    pub fn filtering(&self) -> &[String] {
        self.filtering.as_deref().unwrap_or(&[])
    }

    /// Search field names, empty when none were declared.
    pub fn search(&self) -> &[String] {
        self.search.as_deref().unwrap_or(&[])
    }

    /// Whether the table shows up in the default listing surface.
    pub fn enabled(&self) -> bool {
        !self.hidden
    }

    /// Derive the physical table name for this table.
    ///
    /// Deterministic: `data_{slug minus dashes}_{name minus underscores}`.
    /// The result must fit the datastore identifier bound and, because it is
    /// interpolated into DDL, is restricted to ASCII alphanumerics and the
    /// two joining underscores.
    pub fn physical_table_name(&self, slug: &Slug) -> Result<String, CommonError> {
        let slug_part: String = slug.as_str().chars().filter(|c| *c != '-').collect();
        let name_part: String = self
            .name
            .to_lowercase()
            .chars()
            .filter(|c| *c != '_')
            .collect();

        if name_part.is_empty()
            || !name_part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(CommonError::invalid_input(format!(
                "Table name '{}' does not reduce to a safe identifier",
                self.name
            )));
        }

        let physical = format!("{}_{}_{}", PHYSICAL_TABLE_PREFIX, slug_part, name_part);
        if physical.len() > MAX_IDENTIFIER_LENGTH {
            return Err(CommonError::identifier_too_long(physical));
        }

        Ok(physical)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
