//! Field type system for synthesized record types.
//!
//! `FieldType` is the closed enum of logical column types a [`crate::models::Field`]
//! may declare. Each variant maps to exactly one physical PostgreSQL column
//! type; an unrecognized type string in the metadata store is a hard error
//! at synthesis time, never a silent fallback.

use crate::errors::CommonError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical field types supported by the platform.
///
/// The set is fixed: adding a variant means adding a physical column
/// mapping, a cell decoder and a predicate bind path in the query layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Binary,
    Bool,
    Date,
    DateTime,
    Decimal,
    Email,
    Float,
    Integer,
    Json,
    String,
    Text,
}

/// Type-specific options attached to a field definition.
///
/// Stored as free-form JSON on the metadata row; only the keys relevant to
/// the declared type are honored (`max_length` for string, `max_digits` and
/// `decimal_places` for decimal). Unknown keys are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_digits: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u32>,
}

impl FieldOptions {
    /// Decode options from the metadata row's JSON blob.
    ///
    /// `None` and `null` both mean "no options". Keys other than the known
    /// ones are ignored rather than rejected, since the options column is
    /// shared with frontend-only settings.
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        match value {
            None => Self::default(),
            Some(serde_json::Value::Null) => Self::default(),
            Some(v) => {
                let mut opts = Self::default();
                if let Some(n) = v.get("max_length").and_then(|n| n.as_u64()) {
                    opts.max_length = Some(n as u32);
                }
                if let Some(n) = v.get("max_digits").and_then(|n| n.as_u64()) {
                    opts.max_digits = Some(n as u32);
                }
                if let Some(n) = v.get("decimal_places").and_then(|n| n.as_u64()) {
                    opts.decimal_places = Some(n as u32);
                }
                opts
            }
        }
    }
}

/// Email columns are bounded strings; validation of the address shape
/// happens at import time, the column only carries the length bound.
const EMAIL_MAX_LENGTH: u32 = 254;

impl FieldType {
    /// All supported types, in metadata-store spelling order.
    pub fn all() -> &'static [FieldType] {
        &[
            FieldType::Binary,
            FieldType::Bool,
            FieldType::Date,
            FieldType::DateTime,
            FieldType::Decimal,
            FieldType::Email,
            FieldType::Float,
            FieldType::Integer,
            FieldType::Json,
            FieldType::String,
            FieldType::Text,
        ]
    }

    /// The metadata-store spelling of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Binary => "binary",
            FieldType::Bool => "bool",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Decimal => "decimal",
            FieldType::Email => "email",
            FieldType::Float => "float",
            FieldType::Integer => "integer",
            FieldType::Json => "json",
            FieldType::String => "string",
            FieldType::Text => "text",
        }
    }

    /// Physical PostgreSQL column type for this field type.
    ///
    /// Options refine the bounded types: `string` honors `max_length`,
    /// `decimal` honors `max_digits`/`decimal_places`. A decimal without
    /// declared precision becomes an unconstrained `NUMERIC`.
    pub fn sql_type(&self, options: &FieldOptions) -> String {
        match self {
            FieldType::Binary => "BYTEA".to_string(),
            FieldType::Bool => "BOOLEAN".to_string(),
            FieldType::Date => "DATE".to_string(),
            FieldType::DateTime => "TIMESTAMPTZ".to_string(),
            FieldType::Decimal => match (options.max_digits, options.decimal_places) {
                (Some(digits), Some(places)) => format!("NUMERIC({}, {})", digits, places),
                (Some(digits), None) => format!("NUMERIC({})", digits),
                _ => "NUMERIC".to_string(),
            },
            FieldType::Email => format!("VARCHAR({})", EMAIL_MAX_LENGTH),
            FieldType::Float => "DOUBLE PRECISION".to_string(),
            FieldType::Integer => "BIGINT".to_string(),
            FieldType::Json => "JSONB".to_string(),
            FieldType::String => match options.max_length {
                Some(n) => format!("VARCHAR({})", n),
                None => "VARCHAR".to_string(),
            },
            FieldType::Text => "TEXT".to_string(),
        }
    }

    /// Whether values of this type are carried as text in the datastore.
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::Email | FieldType::String | FieldType::Text)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary" => Ok(FieldType::Binary),
            "bool" => Ok(FieldType::Bool),
            "date" => Ok(FieldType::Date),
            "datetime" => Ok(FieldType::DateTime),
            "decimal" => Ok(FieldType::Decimal),
            "email" => Ok(FieldType::Email),
            "float" => Ok(FieldType::Float),
            "integer" => Ok(FieldType::Integer),
            "json" => Ok(FieldType::Json),
            "string" => Ok(FieldType::String),
            "text" => Ok(FieldType::Text),
            other => Err(CommonError::invalid_input(format!(
                "Unknown field type '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roundtrip_all_spellings() {
        for field_type in FieldType::all() {
            let parsed: FieldType = field_type.as_str().parse().unwrap();
            assert_eq!(parsed, *field_type);
        }
    }

    #[test]
    fn test_unknown_type_is_error() {
        let result = "varchar".parse::<FieldType>();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("varchar"));
    }

    #[test]
    fn test_serde_spelling_matches_as_str() {
        for field_type in FieldType::all() {
            let encoded = serde_json::to_string(field_type).unwrap();
            assert_eq!(encoded, format!("\"{}\"", field_type.as_str()));
        }
    }

    #[test]
    fn test_sql_type_mapping() {
        let opts = FieldOptions::default();
        assert_eq!(FieldType::Binary.sql_type(&opts), "BYTEA");
        assert_eq!(FieldType::Bool.sql_type(&opts), "BOOLEAN");
        assert_eq!(FieldType::Date.sql_type(&opts), "DATE");
        assert_eq!(FieldType::DateTime.sql_type(&opts), "TIMESTAMPTZ");
        assert_eq!(FieldType::Email.sql_type(&opts), "VARCHAR(254)");
        assert_eq!(FieldType::Float.sql_type(&opts), "DOUBLE PRECISION");
        assert_eq!(FieldType::Integer.sql_type(&opts), "BIGINT");
        assert_eq!(FieldType::Json.sql_type(&opts), "JSONB");
        assert_eq!(FieldType::Text.sql_type(&opts), "TEXT");
    }

    #[test]
    fn test_bounded_types_honor_options() {
        let opts = FieldOptions {
            max_length: Some(80),
            max_digits: Some(12),
            decimal_places: Some(3),
        };
        assert_eq!(FieldType::String.sql_type(&opts), "VARCHAR(80)");
        assert_eq!(FieldType::Decimal.sql_type(&opts), "NUMERIC(12, 3)");

        assert_eq!(
            FieldType::String.sql_type(&FieldOptions::default()),
            "VARCHAR"
        );
        assert_eq!(
            FieldType::Decimal.sql_type(&FieldOptions::default()),
            "NUMERIC"
        );
    }

    #[test]
    fn test_options_from_json() {
        let value = json!({"max_length": 63, "label": "ignored"});
        let opts = FieldOptions::from_json(Some(&value));
        assert_eq!(opts.max_length, Some(63));
        assert_eq!(opts.max_digits, None);

        assert_eq!(FieldOptions::from_json(None), FieldOptions::default());
        assert_eq!(
            FieldOptions::from_json(Some(&serde_json::Value::Null)),
            FieldOptions::default()
        );
    }
}
