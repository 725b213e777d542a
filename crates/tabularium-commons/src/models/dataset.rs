//! Dataset catalog entity.

use crate::models::{DatasetId, Slug};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A published collection of tabular data with attribution and license
/// metadata.
///
/// A dataset owns many [`crate::models::Version`]s (point-in-time snapshots)
/// and, through them, the tables this layer materializes. Datasets are
/// created and edited by catalog maintainers; deleting one cascades to its
/// versions, tables and fields in the metadata store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Dataset {
    pub id: DatasetId,

    /// Display name, e.g. "Gastos Diretos".
    pub name: String,

    /// Unique, URL-safe identifier. Also a component of every physical
    /// table name derived for this dataset.
    pub slug: Slug,

    pub description: String,

    /// Icon identifier used by the listing frontend.
    pub icon: String,

    pub author_name: String,
    pub author_url: Option<String>,

    /// Repository of the capture/cleaning code for this dataset.
    pub code_url: String,

    pub source_name: String,
    pub source_url: String,

    pub license_name: String,
    pub license_url: String,

    /// Whether the dataset is listed publicly.
    pub show: bool,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (by {}, source: {})",
            self.name, self.author_name, self.source_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> Dataset {
        Dataset {
            id: DatasetId::new(1),
            name: "Salários Magistrados".to_string(),
            slug: Slug::new("salarios-magistrados"),
            description: "Planilhas de salários".to_string(),
            icon: "money".to_string(),
            author_name: "Ana".to_string(),
            author_url: None,
            code_url: "https://example.org/code".to_string(),
            source_name: "CNJ".to_string(),
            source_url: "https://example.org/source".to_string(),
            license_name: "CC-BY".to_string(),
            license_url: "https://example.org/license".to_string(),
            show: true,
        }
    }

    #[test]
    fn test_display_includes_attribution() {
        let dataset = sample_dataset();
        assert_eq!(
            dataset.to_string(),
            "Salários Magistrados (by Ana, source: CNJ)"
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let dataset = sample_dataset();
        let encoded = serde_json::to_string(&dataset).unwrap();
        let decoded: Dataset = serde_json::from_str(&encoded).unwrap();
        assert_eq!(dataset, decoded);
    }
}
