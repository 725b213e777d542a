//! Field (column definition) catalog entity.

use crate::errors::CommonError;
use crate::models::{DatasetId, FieldId, TableId, VersionId};
use crate::types::{FieldOptions, FieldType};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// One typed column definition within a table.
///
/// The logical type is stored as a string in the metadata store and only
/// resolved against the closed [`FieldType`] enum when a record type is
/// synthesized; an unknown spelling is a hard error there, never a fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Field {
    pub id: FieldId,
    pub dataset_id: DatasetId,
    pub table_id: TableId,
    pub version_id: Option<VersionId>,

    /// Physical column identifier.
    pub name: String,

    /// Display title for the frontend.
    pub title: String,

    /// Logical type spelling, resolved via [`Field::field_type`].
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub type_name: String,

    /// Whether the physical column accepts NULL.
    pub null: bool,

    /// Position within the table (drives column ordering).
    pub order: i32,

    /// Type-specific options blob, decoded via [`FieldOptions::from_json`].
    pub options: Option<serde_json::Value>,

    /// Whether the distinct-value list is maintained for this field.
    pub has_choices: bool,

    /// Cached distinct values, shaped `{"data": ["a", "b", ...]}`.
    pub choices: Option<serde_json::Value>,

    /// Whether the frontend offers this field as a filter control.
    pub frontend_filter: bool,

    /// Whether the field shows up in default row listings.
    pub show: bool,

    /// Whether the field shows up on the dataset detail page.
    pub show_on_frontend: bool,

    /// Obfuscated fields are masked by the serialization layer.
    pub obfuscate: bool,

    pub description: Option<String>,

    /// Template for rendering the value as an external link.
    pub link_template: Option<String>,
}

impl Field {
    /// Resolve the stored type spelling against the closed enum.
    pub fn field_type(&self) -> Result<FieldType, CommonError> {
        self.type_name.parse()
    }

    /// Decoded type-specific options.
    pub fn field_options(&self) -> FieldOptions {
        FieldOptions::from_json(self.options.as_ref())
    }

    /// `key=value` rendering of the options blob for display.
    pub fn options_text(&self) -> String {
        match &self.options {
            Some(serde_json::Value::Object(map)) => map
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>()
                .join(", "),
            _ => String::new(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.options_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample_field(name: &str, type_name: &str, order: i32) -> Field {
        Field {
            id: FieldId::new(order as i64),
            dataset_id: DatasetId::new(1),
            table_id: TableId::new(10),
            version_id: Some(VersionId::new(2)),
            name: name.to_string(),
            title: name.to_string(),
            type_name: type_name.to_string(),
            null: true,
            order,
            options: None,
            has_choices: false,
            choices: None,
            frontend_filter: false,
            show: true,
            show_on_frontend: false,
            obfuscate: false,
            description: None,
            link_template: None,
        }
    }

    #[test]
    fn test_field_type_resolution() {
        let field = sample_field("age", "integer", 1);
        assert_eq!(field.field_type().unwrap(), FieldType::Integer);
    }

    #[test]
    fn test_unknown_field_type_is_error() {
        let field = sample_field("age", "number", 1);
        assert!(field.field_type().is_err());
    }

    #[test]
    fn test_options_text() {
        let mut field = sample_field("name", "string", 1);
        field.options = Some(json!({"max_length": 255}));
        assert_eq!(field.options_text(), "max_length=255");
        assert_eq!(field.field_options().max_length, Some(255));
    }

    #[test]
    fn test_options_text_empty_without_options() {
        let field = sample_field("name", "string", 1);
        assert_eq!(field.options_text(), "");
    }
}
