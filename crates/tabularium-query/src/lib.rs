//! # tabularium-query
//!
//! Read-query surface over synthesized record types.
//!
//! Translates an untrusted querystring (free filters, `search`, `order-by`)
//! into one safe SELECT against a record type's physical table: validated
//! conjunctive predicates, full-text search with rank ordering, and
//! allow-listed ordering, materialized as [`DynamicRow`]s.
//!
//! The pipeline is a sequence of pure stages over an accumulating
//! [`SelectQuery`]; malformed or disallowed input is dropped, never an
//! error, so every request yields a valid result set.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tabularium_query::{QueryParams, SelectQuery};
//!
//! let params = QueryParams::from_pairs(querystring_pairs);
//! let mut query = SelectQuery::from_querystring(record_type, &config.search.language, &params)
//!     .limit(50);
//! let rows = query.fetch(&pool).await?;
//! let total = query.count(&pool).await?;
//! ```

pub mod builder;
pub mod error;
pub mod filters;
pub mod querystring;
pub mod row;
pub mod search;

pub use builder::{OrderTerm, SelectQuery};
pub use error::QueryError;
pub use filters::{build_filters, parse_filter_key, FilterExpression, FilterOperator};
pub use querystring::{QueryParams, ORDER_BY_KEY, SEARCH_KEY};
pub use row::{CellValue, DynamicRow};
pub use search::SearchPredicate;
