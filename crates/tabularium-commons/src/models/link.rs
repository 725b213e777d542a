//! Related-link catalog entity.

use crate::models::DatasetId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A titled external URL attached to a dataset (documentation, methodology,
/// press coverage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Link {
    pub id: i64,
    pub dataset_id: DatasetId,
    pub title: String,
    pub url: String,
}

impl Link {
    /// Host portion of the URL, for compact display next to the title.
    pub fn domain(&self) -> &str {
        let rest = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.url);
        rest.split(['/', '?', '#']).next().unwrap_or(rest)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.domain())
    }
}
