//! Dataset version catalog entity.

use crate::models::{DatasetId, VersionId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A point-in-time snapshot of a dataset's tables.
///
/// Versions are ordered by the explicit `order` integer; only the tables of
/// the highest-`order` version are considered current by the catalog
/// listing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Version {
    pub id: VersionId,
    pub dataset_id: DatasetId,

    /// Human-readable version label, e.g. "2019-02".
    pub name: String,

    /// When the snapshot was collected from the source.
    pub collected_at: NaiveDate,

    /// Where the raw snapshot can be downloaded.
    pub download_url: String,

    /// Explicit sequence number; highest wins "latest".
    pub order: i32,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (order: {})", self.name, self.order)
    }
}
