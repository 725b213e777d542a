//! Catalog store: reads and updates the metadata rows.
//!
//! The metadata tables (`datasets`, `versions`, `tables`, `fields`,
//! `links`) are owned by the admin side of the platform; this layer only
//! queries them and maintains the cached distinct-value lists. All values
//! travel as bind parameters; the single interpolated identifier
//! (`update_field_choices`) is allow-listed through the record type first.

use crate::error::{CatalogError, Result};
use sqlx::PgPool;
use tabularium_commons::models::{
    Dataset, DatasetId, Field, Link, Table, TableId, Version, VersionId,
};
use tabularium_schema::RecordType;

const DATASET_COLUMNS: &str = "id, name, slug, description, icon, author_name, author_url, \
     code_url, source_name, source_url, license_name, license_url, show";

const TABLE_COLUMNS: &str = "id, dataset_id, version_id, name, \"default\", hidden, ordering, \
     filtering, search, options, import_date, description";

const FIELD_COLUMNS: &str = "id, dataset_id, table_id, version_id, name, title, type, \"null\", \
     \"order\", options, has_choices, choices, frontend_filter, show, show_on_frontend, \
     obfuscate, description, link_template";

/// Async lookup surface over the metadata store.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    pool: PgPool,
}

impl CatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fetch a dataset by its unique slug.
    pub async fn dataset_by_slug(&self, slug: &str) -> Result<Dataset> {
        let sql = format!("SELECT {} FROM datasets WHERE slug = $1", DATASET_COLUMNS);
        sqlx::query_as::<_, Dataset>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::DatasetNotFound(slug.to_string()))
    }

    /// Related links for a dataset, title-ordered.
    pub async fn links_for_dataset(&self, dataset_id: DatasetId) -> Result<Vec<Link>> {
        let rows = sqlx::query_as::<_, Link>(
            "SELECT id, dataset_id, title, url FROM links WHERE dataset_id = $1 ORDER BY title",
        )
        .bind(dataset_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// The dataset's latest version: highest explicit `order`.
    pub async fn latest_version(&self, dataset_id: DatasetId) -> Result<Option<Version>> {
        let row = sqlx::query_as::<_, Version>(
            "SELECT id, dataset_id, name, collected_at, download_url, \"order\" \
             FROM versions WHERE dataset_id = $1 ORDER BY \"order\" DESC LIMIT 1",
        )
        .bind(dataset_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Current tables of a dataset: the latest version's tables, hidden
    /// excluded, name-ordered. Empty when the dataset has no versions.
    pub async fn tables_for_dataset(&self, dataset_id: DatasetId) -> Result<Vec<Table>> {
        self.tables_for_dataset_inner(dataset_id, false).await
    }

    /// Like [`Self::tables_for_dataset`], including hidden tables.
    pub async fn all_tables_for_dataset(&self, dataset_id: DatasetId) -> Result<Vec<Table>> {
        self.tables_for_dataset_inner(dataset_id, true).await
    }

    async fn tables_for_dataset_inner(
        &self,
        dataset_id: DatasetId,
        include_hidden: bool,
    ) -> Result<Vec<Table>> {
        let version = match self.latest_version(dataset_id).await? {
            Some(version) => version,
            None => return Ok(Vec::new()),
        };

        let sql = if include_hidden {
            format!(
                "SELECT {} FROM tables WHERE dataset_id = $1 AND version_id = $2 ORDER BY name",
                TABLE_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM tables WHERE dataset_id = $1 AND version_id = $2 \
                 AND hidden = FALSE ORDER BY name",
                TABLE_COLUMNS
            )
        };

        let rows = sqlx::query_as::<_, Table>(&sql)
            .bind(dataset_id)
            .bind(version.id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// One named table within a dataset version.
    ///
    /// Hidden tables are only reachable with `allow_hidden`, mirroring the
    /// listing surface's default exclusion.
    pub async fn table_for_dataset(
        &self,
        dataset_id: DatasetId,
        version_id: VersionId,
        name: &str,
        allow_hidden: bool,
    ) -> Result<Table> {
        let sql = if allow_hidden {
            format!(
                "SELECT {} FROM tables WHERE dataset_id = $1 AND version_id = $2 AND name = $3",
                TABLE_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM tables WHERE dataset_id = $1 AND version_id = $2 AND name = $3 \
                 AND hidden = FALSE",
                TABLE_COLUMNS
            )
        };

        sqlx::query_as::<_, Table>(&sql)
            .bind(dataset_id)
            .bind(version_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::TableNotFound(name.to_string()))
    }

    /// The dataset version's default table.
    pub async fn default_table(
        &self,
        dataset_id: DatasetId,
        version_id: VersionId,
    ) -> Result<Table> {
        let sql = format!(
            "SELECT {} FROM tables WHERE dataset_id = $1 AND version_id = $2 \
             AND \"default\" = TRUE AND hidden = FALSE",
            TABLE_COLUMNS
        );
        sqlx::query_as::<_, Table>(&sql)
            .bind(dataset_id)
            .bind(version_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::TableNotFound("<default>".to_string()))
    }

    /// Convenience lookup: dataset slug + logical table name → table row,
    /// resolved against the latest version.
    pub async fn get_table(
        &self,
        slug: &str,
        table_name: &str,
        allow_hidden: bool,
    ) -> Result<(Dataset, Table)> {
        let dataset = self.dataset_by_slug(slug).await?;
        let version = self
            .latest_version(dataset.id)
            .await?
            .ok_or_else(|| CatalogError::NoVersions(slug.to_string()))?;
        let table = self
            .table_for_dataset(dataset.id, version.id, table_name, allow_hidden)
            .await?;
        Ok((dataset, table))
    }

    /// A table's fields, position-ordered.
    pub async fn fields_for_table(&self, table_id: TableId) -> Result<Vec<Field>> {
        let sql = format!(
            "SELECT {} FROM fields WHERE table_id = $1 ORDER BY \"order\"",
            FIELD_COLUMNS
        );
        let rows = sqlx::query_as::<_, Field>(&sql)
            .bind(table_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Fields whose distinct-value list feeds a frontend filter control.
    pub async fn choiceable_fields(&self, table_id: TableId) -> Result<Vec<Field>> {
        let sql = format!(
            "SELECT {} FROM fields WHERE table_id = $1 \
             AND has_choices = TRUE AND frontend_filter = TRUE ORDER BY \"order\"",
            FIELD_COLUMNS
        );
        let rows = sqlx::query_as::<_, Field>(&sql)
            .bind(table_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Render the distinct-value query for a choiceable field.
    ///
    /// The column identifier is interpolated, so it must name an attribute
    /// of the synthesized record type: anything else is rejected before
    /// any SQL is built.
    pub fn distinct_values_sql(record_type: &RecordType, column: &str) -> Result<String> {
        if record_type.attribute(column).is_none() {
            return Err(CatalogError::UnknownColumn {
                field: column.to_string(),
                type_name: record_type.type_name.clone(),
            });
        }
        Ok(format!(
            "SELECT DISTINCT {col}::text FROM {table} WHERE {col} IS NOT NULL ORDER BY 1",
            col = column,
            table = record_type.table_name
        ))
    }

    /// Recompute and persist a field's cached distinct-value list from the
    /// physical table. Returns the fresh values.
    pub async fn update_field_choices(
        &self,
        field: &Field,
        record_type: &RecordType,
    ) -> Result<Vec<String>> {
        let sql = Self::distinct_values_sql(record_type, &field.name)?;
        let values: Vec<String> = sqlx::query_scalar(&sql).fetch_all(&self.pool).await?;

        let choices = serde_json::json!({ "data": values });
        sqlx::query("UPDATE fields SET choices = $1 WHERE id = $2")
            .bind(&choices)
            .bind(field.id)
            .execute(&self.pool)
            .await?;

        log::debug!(
            "Refreshed {} choice values for field {}.{}",
            values.len(),
            record_type.table_name,
            field.name
        );
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabularium_commons::types::{FieldOptions, FieldType};
    use tabularium_schema::{AttributeDescriptor, RecordType};

    fn sample_record_type() -> RecordType {
        RecordType {
            table_id: TableId::new(10),
            type_name: "Covid19Caso".to_string(),
            table_name: "data_covid19_caso".to_string(),
            attributes: vec![AttributeDescriptor {
                name: "state".to_string(),
                field_type: FieldType::String,
                nullable: true,
                options: FieldOptions::default(),
            }],
            ordering: vec![],
            filtering: vec![],
            search: vec![],
            indexes: vec![],
        }
    }

    #[test]
    fn test_distinct_values_sql() {
        let sql = CatalogStore::distinct_values_sql(&sample_record_type(), "state").unwrap();
        assert_eq!(
            sql,
            "SELECT DISTINCT state::text FROM data_covid19_caso \
             WHERE state IS NOT NULL ORDER BY 1"
        );
    }

    #[test]
    fn test_distinct_values_rejects_unknown_column() {
        let result =
            CatalogStore::distinct_values_sql(&sample_record_type(), "state; DROP TABLE x");
        assert!(matches!(
            result,
            Err(CatalogError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_distinct_values_rejects_search_vector_column() {
        // The search vector is not a declared attribute, so it is not
        // choiceable either.
        let result = CatalogStore::distinct_values_sql(&sample_record_type(), "search_data");
        assert!(result.is_err());
    }
}
