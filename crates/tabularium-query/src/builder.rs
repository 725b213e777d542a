//! Querystring-driven SELECT pipeline.
//!
//! A [`SelectQuery`] accumulates through independent stages (search, then
//! filters, then ordering), each a pure function from (query, parameters)
//! to query. Materialization renders exactly one SELECT with every value as
//! a bind parameter; the only strings that reach SQL text are identifiers
//! that already passed an allow-list.

use crate::error::Result;
use crate::filters::{build_filters, FilterExpression};
use crate::querystring::QueryParams;
use crate::row::{decode_cell, DynamicRow};
use crate::search::SearchPredicate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use tabularium_commons::types::FieldType;
use tabularium_schema::{RecordType, SEARCH_VECTOR_COLUMN};

/// One ORDER BY directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderTerm {
    /// Descending full-text rank; pushed by the search stage.
    SearchRank,
    Field {
        name: String,
        descending: bool,
    },
}

/// An accumulating query over one synthesized record type.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    record_type: Arc<RecordType>,
    language: String,
    filters: Vec<FilterExpression>,
    search: Option<SearchPredicate>,
    ordering: Vec<OrderTerm>,
    limit: Option<i64>,
    offset: Option<i64>,
    cached_count: Option<i64>,
}

impl SelectQuery {
    pub fn new(record_type: Arc<RecordType>, language: impl Into<String>) -> Self {
        Self {
            record_type,
            language: language.into(),
            filters: Vec::new(),
            search: None,
            ordering: Vec::new(),
            limit: None,
            offset: None,
            cached_count: None,
        }
    }

    /// Run the full pipeline over parsed querystring parameters.
    ///
    /// Stage order is significant: search before filters (the reserved
    /// keys were already popped during parsing), ordering resolution last,
    /// appending to (never replacing) the search-rank directive.
    pub fn from_querystring(
        record_type: Arc<RecordType>,
        language: impl Into<String>,
        params: &QueryParams,
    ) -> Self {
        let mut query = Self::new(record_type, language);
        if let Some(raw) = &params.search {
            query = query.search_stage(raw);
        }
        query = query.filter_stage(&params.filters);
        query.ordering_stage(&params.order_by)
    }

    /// Search stage: attach a full-text predicate and append descending
    /// rank ordering. No-op when the record type declares no search fields.
    pub fn search_stage(mut self, raw: &str) -> Self {
        if !self.record_type.has_search() {
            log::debug!(
                "Ignoring search on {}: no search fields declared",
                self.record_type.type_name
            );
            return self;
        }
        if let Some(predicate) = SearchPredicate::parse(raw) {
            self.search = Some(predicate);
            self.ordering.push(OrderTerm::SearchRank);
        }
        self
    }

    /// Filter stage: validate candidate filters against the record type's
    /// allow-list and append the survivors.
    pub fn filter_stage(mut self, requested: &[(String, String)]) -> Self {
        self.filters
            .extend(build_filters(requested, &self.record_type));
        self
    }

    /// Ordering stage: keep requested terms whose base field is in the
    /// allowed sort set (declared ordering ∪ filtering), in request order;
    /// fall back to the declared ordering when none survive. Directives
    /// accumulate after any search-rank ordering.
    pub fn ordering_stage(mut self, requested: &[String]) -> Self {
        let allowed = self.record_type.allowed_sort_fields();

        let mut survivors = Vec::new();
        for term in requested {
            let (name, descending) = parse_order_term(term);
            if allowed.contains(&name) && is_safe_identifier(&name) {
                survivors.push(OrderTerm::Field { name, descending });
            } else {
                log::debug!("Dropping order-by term '{}': not sortable", term);
            }
        }

        if survivors.is_empty() {
            for term in &self.record_type.ordering {
                let (name, descending) = parse_order_term(term);
                if is_safe_identifier(&name) {
                    survivors.push(OrderTerm::Field { name, descending });
                }
            }
        }

        self.ordering.extend(survivors);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Whether any predicate (search or filter) restricts the row set.
    pub fn has_predicates(&self) -> bool {
        self.search.is_some() || !self.filters.is_empty()
    }

    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    /// Column names of the materialized rows: surrogate id first, then the
    /// declared attributes.
    fn result_columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.record_type.attributes.len() + 1);
        columns.push("id".to_string());
        for attribute in &self.record_type.attributes {
            columns.push(attribute.name.clone());
        }
        columns
    }

    fn push_search_predicate(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        if let Some(predicate) = &self.search {
            builder.push(format!("{} @@ plainto_tsquery(", SEARCH_VECTOR_COLUMN));
            builder.push_bind(self.language.clone());
            builder.push("::regconfig, ");
            builder.push_bind(predicate.tsquery_input());
            builder.push(")");
        }
    }

    fn push_predicates(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        if !self.has_predicates() {
            return;
        }
        builder.push(" WHERE ");

        let mut first = true;
        if self.search.is_some() {
            self.push_search_predicate(builder);
            first = false;
        }

        for filter in &self.filters {
            if !first {
                builder.push(" AND ");
            }
            first = false;

            builder.push(format!("{} {} ", filter.field, filter.operator.sql_operator()));
            if filter.operator.is_pattern() {
                let raw = filter.value.as_text().unwrap_or_default();
                builder.push_bind(format!("%{}%", escape_like(raw)));
            } else {
                filter.value.push_bind(builder);
            }
        }
    }

    fn push_ordering(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        if self.ordering.is_empty() {
            return;
        }
        builder.push(" ORDER BY ");

        let mut first = true;
        for term in &self.ordering {
            match term {
                OrderTerm::SearchRank => {
                    if self.search.is_none() {
                        continue;
                    }
                    if !first {
                        builder.push(", ");
                    }
                    first = false;
                    builder.push(format!("ts_rank({}, plainto_tsquery(", SEARCH_VECTOR_COLUMN));
                    builder.push_bind(self.language.clone());
                    builder.push("::regconfig, ");
                    builder.push_bind(
                        self.search
                            .as_ref()
                            .map(SearchPredicate::tsquery_input)
                            .unwrap_or_default(),
                    );
                    builder.push(")) DESC");
                }
                OrderTerm::Field { name, descending } => {
                    if !first {
                        builder.push(", ");
                    }
                    first = false;
                    builder.push(format!(
                        "{} {}",
                        name,
                        if *descending { "DESC" } else { "ASC" }
                    ));
                }
            }
        }
    }

    fn select_builder(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {} FROM {}",
            self.result_columns().join(", "),
            self.record_type.table_name
        ));
        self.push_predicates(&mut builder);
        self.push_ordering(&mut builder);
        if let Some(limit) = self.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit);
        }
        if let Some(offset) = self.offset {
            builder.push(" OFFSET ");
            builder.push_bind(offset);
        }
        builder
    }

    fn count_builder(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT COUNT(*) FROM {}",
            self.record_type.table_name
        ));
        self.push_predicates(&mut builder);
        builder
    }

    /// The SELECT statement this query renders, with `$n` placeholders.
    pub fn select_sql(&self) -> String {
        self.select_builder().sql().to_string()
    }

    /// The exact-count statement this query renders.
    pub fn count_sql(&self) -> String {
        self.count_builder().sql().to_string()
    }

    /// Execute the query and materialize dynamic rows.
    pub async fn fetch(&self, pool: &PgPool) -> Result<Vec<DynamicRow>> {
        let columns = Arc::new(self.result_columns());
        let mut builder = self.select_builder();
        let pg_rows = builder.build().fetch_all(pool).await?;

        let mut rows = Vec::with_capacity(pg_rows.len());
        for pg_row in &pg_rows {
            let mut values = Vec::with_capacity(columns.len());
            values.push(decode_cell(pg_row, 0, FieldType::Integer)?);
            for (index, attribute) in self.record_type.attributes.iter().enumerate() {
                values.push(decode_cell(pg_row, index + 1, attribute.field_type)?);
            }
            rows.push(DynamicRow::new(Arc::clone(&columns), values));
        }
        Ok(rows)
    }

    /// Row count for this query, memoized per instance.
    ///
    /// Unfiltered counts prefer the planner's row estimate and fall back to
    /// an exact count when the estimate is unavailable (missing pg_class
    /// row, never-analyzed table, or any read failure). Filtered counts are
    /// always exact. Callers of unfiltered counts must tolerate the
    /// approximation.
    pub async fn count(&mut self, pool: &PgPool) -> Result<i64> {
        if let Some(count) = self.cached_count {
            return Ok(count);
        }

        let count = if self.has_predicates() {
            self.exact_count(pool).await?
        } else {
            match self.approximate_count(pool).await {
                Ok(Some(estimate)) if estimate >= 0 => estimate,
                Ok(_) => self.exact_count(pool).await?,
                Err(error) => {
                    log::debug!(
                        "Planner estimate unavailable for {}: {}",
                        self.record_type.table_name,
                        error
                    );
                    self.exact_count(pool).await?
                }
            }
        };

        self.cached_count = Some(count);
        Ok(count)
    }

    async fn approximate_count(&self, pool: &PgPool) -> Result<Option<i64>> {
        let estimate: Option<i64> =
            sqlx::query_scalar("SELECT reltuples::bigint FROM pg_class WHERE relname = $1")
                .bind(&self.record_type.table_name)
                .fetch_optional(pool)
                .await?;
        Ok(estimate)
    }

    async fn exact_count(&self, pool: &PgPool) -> Result<i64> {
        let mut builder = self.count_builder();
        let count: i64 = builder.build_query_scalar().fetch_one(pool).await?;
        Ok(count)
    }
}

fn parse_order_term(term: &str) -> (String, bool) {
    match term.strip_prefix('-') {
        Some(name) => (name.trim().to_lowercase(), true),
        None => (term.trim().to_lowercase(), false),
    }
}

fn is_safe_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
