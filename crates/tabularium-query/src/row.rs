//! Dynamic row representation.
//!
//! Rows of synthesized tables cannot have a compile-time struct, so results
//! come back as a [`DynamicRow`]: an ordered column list shared across the
//! result set plus one typed [`CellValue`] per column.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use std::str::FromStr;
use std::sync::Arc;
use tabularium_commons::types::FieldType;

/// One typed cell, tagged over the closed field type enum.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Json(serde_json::Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl CellValue {
    /// Parse an untrusted querystring value into a typed cell for the
    /// given field type.
    ///
    /// Returns `None` when the value does not parse: the caller drops the
    /// filter rather than failing the request. Binary columns are not
    /// filterable at all.
    pub fn parse(field_type: FieldType, raw: &str) -> Option<CellValue> {
        match field_type {
            FieldType::Binary => None,
            FieldType::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(CellValue::Bool(true)),
                "false" | "0" => Some(CellValue::Bool(false)),
                _ => None,
            },
            FieldType::Date => NaiveDate::from_str(raw).ok().map(CellValue::Date),
            FieldType::DateTime => parse_datetime(raw).map(CellValue::DateTime),
            FieldType::Decimal => Decimal::from_str(raw).ok().map(CellValue::Decimal),
            FieldType::Float => raw.parse::<f64>().ok().map(CellValue::Float),
            FieldType::Integer => raw.parse::<i64>().ok().map(CellValue::Integer),
            FieldType::Json => serde_json::from_str(raw).ok().map(CellValue::Json),
            FieldType::Email | FieldType::String | FieldType::Text => {
                Some(CellValue::Text(raw.to_string()))
            }
        }
    }

    /// Push this cell as a bind parameter.
    pub fn push_bind(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            CellValue::Null => builder.push_bind(Option::<String>::None),
            CellValue::Bool(v) => builder.push_bind(*v),
            CellValue::Integer(v) => builder.push_bind(*v),
            CellValue::Float(v) => builder.push_bind(*v),
            CellValue::Decimal(v) => builder.push_bind(*v),
            CellValue::Date(v) => builder.push_bind(*v),
            CellValue::DateTime(v) => builder.push_bind(*v),
            CellValue::Json(v) => builder.push_bind(v.clone()),
            CellValue::Text(v) => builder.push_bind(v.clone()),
            CellValue::Bytes(v) => builder.push_bind(v.clone()),
        };
    }

    /// The textual payload, when this cell carries one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    // Date-only input means midnight UTC of that day.
    NaiveDate::from_str(raw)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Decode one column of a result row into a typed cell.
pub fn decode_cell(
    row: &PgRow,
    index: usize,
    field_type: FieldType,
) -> std::result::Result<CellValue, sqlx::Error> {
    macro_rules! take {
        ($ty:ty, $variant:expr) => {
            row.try_get::<Option<$ty>, _>(index)?
                .map($variant)
                .unwrap_or(CellValue::Null)
        };
    }

    let cell = match field_type {
        FieldType::Binary => take!(Vec<u8>, CellValue::Bytes),
        FieldType::Bool => take!(bool, CellValue::Bool),
        FieldType::Date => take!(NaiveDate, CellValue::Date),
        FieldType::DateTime => take!(DateTime<Utc>, CellValue::DateTime),
        FieldType::Decimal => take!(Decimal, CellValue::Decimal),
        FieldType::Float => take!(f64, CellValue::Float),
        FieldType::Integer => take!(i64, CellValue::Integer),
        FieldType::Json => take!(serde_json::Value, CellValue::Json),
        FieldType::Email | FieldType::String | FieldType::Text => {
            take!(String, CellValue::Text)
        }
    };
    Ok(cell)
}

/// One materialized row: column names shared across the result set, one
/// typed cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRow {
    columns: Arc<Vec<String>>,
    values: Vec<CellValue>,
}

impl DynamicRow {
    pub fn new(columns: Arc<Vec<String>>, values: Vec<CellValue>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Cell by column name.
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .position(|column| column == name)
            .map(|index| &self.values[index])
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }
}
