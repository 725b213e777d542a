//! Physical schema management: DDL for synthesized record types.
//!
//! All statement rendering is pure over the immutable [`RecordType`]
//! descriptor; execution goes through a shared `PgPool`. Schema mutation is
//! administrative and expected to run single-flight per table under
//! external coordination: concurrent `create_table`/`drop_table`/
//! `create_indexes` on the same table is undefined behavior this layer does
//! not guard against.

use crate::error::SchemaError;
use crate::record_type::{RecordType, SEARCH_VECTOR_COLUMN};
use crate::indexes::{IndexDefinition, IndexKind};
use sqlx::PgPool;

/// DDL surface for one datastore.
#[derive(Debug, Clone)]
pub struct PhysicalSchemaManager {
    pool: PgPool,
}

impl PhysicalSchemaManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Render the CREATE TABLE statement for a record type.
    ///
    /// Every physical table gets a surrogate `id` key and the hidden
    /// search-vector column in addition to the declared attributes.
    pub fn create_table_sql(record_type: &RecordType) -> String {
        let mut columns = Vec::with_capacity(record_type.attributes.len() + 2);
        columns.push("id BIGSERIAL PRIMARY KEY".to_string());
        for attribute in &record_type.attributes {
            columns.push(attribute.to_sql());
        }
        columns.push(format!("{} TSVECTOR", SEARCH_VECTOR_COLUMN));

        format!(
            "CREATE TABLE {} (\n    {}\n)",
            record_type.table_name,
            columns.join(",\n    ")
        )
    }

    /// Render one CREATE INDEX statement.
    ///
    /// B-tree members carry their ASC/DESC direction; GIN indexes take the
    /// bare column (direction is meaningless in an inverted index).
    pub fn create_index_sql(
        table_name: &str,
        index: &IndexDefinition,
        concurrently: bool,
    ) -> String {
        let mut members = Vec::with_capacity(index.fields.len());
        for field in &index.fields {
            let member = match index.kind {
                IndexKind::BTree => match field.strip_prefix('-') {
                    Some(name) => format!("{} DESC", name),
                    None => format!("{} ASC", field),
                },
                IndexKind::Gin => field.trim_start_matches('-').to_string(),
            };
            members.push(member);
        }

        format!(
            "CREATE INDEX {}{} ON {} USING {} ({})",
            if concurrently { "CONCURRENTLY " } else { "" },
            index.name,
            table_name,
            index.kind.sql_name(),
            members.join(", ")
        )
    }

    /// Render the DROP TABLE statement. `IF EXISTS` makes retry after a
    /// partial failure idempotent; `CASCADE` takes dependent objects down
    /// with the table.
    pub fn drop_table_sql(record_type: &RecordType) -> String {
        format!("DROP TABLE IF EXISTS {} CASCADE", record_type.table_name)
    }

    /// Create the physical table.
    ///
    /// With `with_indexes=false` the bare table is created and none of the
    /// derived indexes are built: use [`Self::create_indexes`] afterwards
    /// so bulk loads run unindexed and writers stay unblocked.
    pub async fn create_table(
        &self,
        record_type: &RecordType,
        with_indexes: bool,
    ) -> Result<(), SchemaError> {
        let sql = Self::create_table_sql(record_type);
        log::info!("Creating physical table {}", record_type.table_name);
        sqlx::query(&sql).execute(&self.pool).await?;

        if with_indexes {
            for index in &record_type.indexes {
                let sql = Self::create_index_sql(&record_type.table_name, index, false);
                sqlx::query(&sql).execute(&self.pool).await?;
            }
        }

        Ok(())
    }

    /// Build all derived indexes with `CONCURRENTLY`, so concurrent readers
    /// and writers on the table are never blocked.
    ///
    /// Concurrent builds cannot run inside a transaction; each statement
    /// executes on its own autocommit connection.
    pub async fn create_indexes(&self, record_type: &RecordType) -> Result<(), SchemaError> {
        for index in &record_type.indexes {
            let sql = Self::create_index_sql(&record_type.table_name, index, true);
            log::info!(
                "Building index {} on {} ({})",
                index.name,
                record_type.table_name,
                index.kind.sql_name()
            );
            sqlx::query(&sql).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Drop the physical table. Absence after the call is success, so a
    /// second drop of the same table is a no-op rather than an error.
    pub async fn drop_table(&self, record_type: &RecordType) -> Result<(), SchemaError> {
        let sql = Self::drop_table_sql(record_type);
        log::info!("Dropping physical table {}", record_type.table_name);
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    /// Render the search-vector trigger statement.
    pub fn search_trigger_sql(record_type: &RecordType, language: &str) -> String {
        let trigger_name = format!("tgr_tsv_{}", record_type.table_name);
        let fieldnames = record_type.search.join(", ");
        format!(
            "CREATE TRIGGER {}\n    BEFORE INSERT OR UPDATE\n    ON {}\n    FOR EACH ROW EXECUTE PROCEDURE\n    tsvector_update_trigger({}, '{}', {})",
            trigger_name, record_type.table_name, SEARCH_VECTOR_COLUMN, language, fieldnames
        )
    }

    /// Install the trigger that recomputes the search vector on every
    /// insert/update from the type's `search` fields.
    ///
    /// The language is one global configuration value for all datasets; it
    /// is not derived from dataset metadata. No-op when the type declares
    /// no search fields.
    pub async fn install_search_trigger(
        &self,
        record_type: &RecordType,
        language: &str,
    ) -> Result<(), SchemaError> {
        if record_type.search.is_empty() {
            log::debug!(
                "Table {} declares no search fields, skipping trigger",
                record_type.table_name
            );
            return Ok(());
        }

        // DDL cannot take bind parameters, so the configured language is
        // re-checked before interpolation.
        if language.is_empty()
            || !language
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_' || c == '.')
        {
            return Err(SchemaError::InvalidSearchLanguage(language.to_string()));
        }

        let sql = Self::search_trigger_sql(record_type, language);
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    /// Refresh planner statistics and reclaim dead tuples.
    ///
    /// VACUUM is disallowed inside a transaction block, so the statement
    /// runs on a pool connection in autocommit mode.
    pub async fn analyze(&self, record_type: &RecordType) -> Result<(), SchemaError> {
        let sql = format!("VACUUM ANALYZE {}", record_type.table_name);
        log::info!("Running VACUUM ANALYZE on {}", record_type.table_name);
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_type::tests::{sample_fields, sample_table};
    use crate::record_type::synthesize;
    use tabularium_commons::models::Slug;

    fn sample_record_type() -> RecordType {
        let slug = Slug::new("socios-brasil");
        synthesize(&slug, &sample_table(), &sample_fields()).unwrap()
    }

    #[test]
    fn test_create_table_sql_shape() {
        let sql = PhysicalSchemaManager::create_table_sql(&sample_record_type());
        assert!(sql.starts_with("CREATE TABLE data_sociosbrasil_empresasocios ("));
        assert!(sql.contains("id BIGSERIAL PRIMARY KEY"));
        assert!(sql.contains("name VARCHAR"));
        assert!(sql.contains("age BIGINT"));
        assert!(sql.contains("balance NUMERIC"));
        assert!(sql.contains("search_data TSVECTOR"));
    }

    #[test]
    fn test_create_table_sql_column_order() {
        let sql = PhysicalSchemaManager::create_table_sql(&sample_record_type());
        let id_pos = sql.find("id BIGSERIAL").unwrap();
        let name_pos = sql.find("name VARCHAR").unwrap();
        let search_pos = sql.find("search_data").unwrap();
        assert!(id_pos < name_pos);
        assert!(name_pos < search_pos);
    }

    #[test]
    fn test_create_index_sql_directions() {
        let index = IndexDefinition {
            name: "idx_caso_oabc".to_string(),
            kind: IndexKind::BTree,
            fields: vec!["-date".to_string(), "state".to_string()],
        };
        let sql = PhysicalSchemaManager::create_index_sql("data_covid19_caso", &index, true);
        assert_eq!(
            sql,
            "CREATE INDEX CONCURRENTLY idx_caso_oabc ON data_covid19_caso USING btree (date DESC, state ASC)"
        );
    }

    #[test]
    fn test_create_index_sql_gin_strips_direction() {
        let index = IndexDefinition {
            name: "idx_caso_sdef".to_string(),
            kind: IndexKind::Gin,
            fields: vec!["search_data".to_string()],
        };
        let sql = PhysicalSchemaManager::create_index_sql("data_covid19_caso", &index, false);
        assert_eq!(
            sql,
            "CREATE INDEX idx_caso_sdef ON data_covid19_caso USING gin (search_data)"
        );
    }

    #[test]
    fn test_drop_table_sql_is_idempotent_form() {
        let sql = PhysicalSchemaManager::drop_table_sql(&sample_record_type());
        assert_eq!(
            sql,
            "DROP TABLE IF EXISTS data_sociosbrasil_empresasocios CASCADE"
        );
    }

    #[test]
    fn test_search_trigger_sql() {
        let sql = PhysicalSchemaManager::search_trigger_sql(
            &sample_record_type(),
            "pg_catalog.portuguese",
        );
        assert!(sql.starts_with("CREATE TRIGGER tgr_tsv_data_sociosbrasil_empresasocios"));
        assert!(sql.contains("BEFORE INSERT OR UPDATE"));
        assert!(sql.contains(
            "tsvector_update_trigger(search_data, 'pg_catalog.portuguese', name)"
        ));
    }

    #[tokio::test]
    async fn test_install_search_trigger_rejects_bad_language() {
        // connect_lazy never touches the network, so the validation path is
        // exercised without a datastore.
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let manager = PhysicalSchemaManager::new(pool);
        let result = manager
            .install_search_trigger(&sample_record_type(), "pt'; DROP TABLE x; --")
            .await;
        assert!(matches!(
            result,
            Err(SchemaError::InvalidSearchLanguage(_))
        ));
    }

    #[tokio::test]
    async fn test_install_search_trigger_no_search_fields_is_noop() {
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let manager = PhysicalSchemaManager::new(pool);
        let mut record_type = sample_record_type();
        record_type.search.clear();
        // No SQL is issued, so the lazy pool never needs a connection.
        assert!(manager
            .install_search_trigger(&record_type, "pg_catalog.portuguese")
            .await
            .is_ok());
    }
}
