//! Filter expression processing.
//!
//! Security boundary between untrusted querystring keys and SQL text. A
//! requested filter only survives when its base field is in the record
//! type's filtering allow-list, its operator suffix is in the closed
//! operator set, and its value parses for the field's declared type.
//! Everything else is dropped silently (logged at debug), never an error.

use crate::row::CellValue;
use tabularium_schema::RecordType;

/// Closed set of comparison operators accepted as `field__op` suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Default when no suffix is given.
    Exact,
    Lt,
    Lte,
    Gt,
    Gte,
    /// Case-sensitive substring match; textual fields only.
    Contains,
    /// Case-insensitive substring match; textual fields only.
    IContains,
}

impl FilterOperator {
    /// Resolve an operator suffix. `None` input means no suffix was given.
    pub fn parse(suffix: Option<&str>) -> Option<FilterOperator> {
        match suffix {
            None => Some(FilterOperator::Exact),
            Some("exact") => Some(FilterOperator::Exact),
            Some("lt") => Some(FilterOperator::Lt),
            Some("lte") => Some(FilterOperator::Lte),
            Some("gt") => Some(FilterOperator::Gt),
            Some("gte") => Some(FilterOperator::Gte),
            Some("contains") => Some(FilterOperator::Contains),
            Some("icontains") => Some(FilterOperator::IContains),
            Some(_) => None,
        }
    }

    /// SQL comparison spelling for the non-pattern operators.
    pub fn sql_operator(&self) -> &'static str {
        match self {
            FilterOperator::Exact => "=",
            FilterOperator::Lt => "<",
            FilterOperator::Lte => "<=",
            FilterOperator::Gt => ">",
            FilterOperator::Gte => ">=",
            FilterOperator::Contains => "LIKE",
            FilterOperator::IContains => "ILIKE",
        }
    }

    /// Whether this operator builds a LIKE pattern from the value.
    pub fn is_pattern(&self) -> bool {
        matches!(self, FilterOperator::Contains | FilterOperator::IContains)
    }
}

/// One validated filter: allow-listed field, closed operator, typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpression {
    pub field: String,
    pub operator: FilterOperator,
    pub value: CellValue,
}

/// Split a requested key into base field name and optional operator
/// suffix. Only the last `__` separates; field names themselves may not
/// contain double underscores.
pub fn parse_filter_key(key: &str) -> (&str, Option<&str>) {
    match key.rsplit_once("__") {
        Some((base, suffix)) if !base.is_empty() => (base, Some(suffix)),
        _ => (key, None),
    }
}

/// Build the validated filter list for a record type.
///
/// Keys are processed independently; survivors combine conjunctively in
/// the query builder. The output only ever references fields from the
/// type's filtering allow-list and operators from the closed set.
pub fn build_filters(
    requested: &[(String, String)],
    record_type: &RecordType,
) -> Vec<FilterExpression> {
    let mut expressions = Vec::new();

    for (key, raw_value) in requested {
        let (base, suffix) = parse_filter_key(key);

        if !record_type.filtering.iter().any(|field| field == base) {
            log::debug!("Dropping filter '{}': field not filterable", key);
            continue;
        }

        let operator = match FilterOperator::parse(suffix) {
            Some(operator) => operator,
            None => {
                log::debug!("Dropping filter '{}': unknown operator", key);
                continue;
            }
        };

        let attribute = match record_type.attribute(base) {
            Some(attribute) => attribute,
            None => {
                // Declared as filterable but not an actual attribute:
                // stale metadata, nothing safe to build.
                log::debug!("Dropping filter '{}': no such attribute", key);
                continue;
            }
        };

        if operator.is_pattern() && !attribute.field_type.is_textual() {
            log::debug!("Dropping filter '{}': pattern match on non-text field", key);
            continue;
        }

        let value = match CellValue::parse(attribute.field_type, raw_value) {
            Some(value) => value,
            None => {
                log::debug!("Dropping filter '{}': value does not parse", key);
                continue;
            }
        };

        expressions.push(FilterExpression {
            field: base.to_string(),
            operator,
            value,
        });
    }

    expressions
}
