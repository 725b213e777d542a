//! Schema lifecycle against a running PostgreSQL.
//!
//! Run with `cargo test -- --ignored` and `TABULARIUM_TEST_DATABASE_URL`
//! pointing at a scratch database.

use sqlx::PgPool;
use tabularium_commons::models::{
    DatasetId, Field, FieldId, Slug, Table, TableId, VersionId,
};
use tabularium_schema::{synthesize, PhysicalSchemaManager};

fn scratch_table() -> (Slug, Table, Vec<Field>) {
    let table = Table {
        id: TableId::new(90001),
        dataset_id: DatasetId::new(1),
        version_id: VersionId::new(1),
        name: "lifecycle_check".to_string(),
        default: true,
        hidden: false,
        ordering: vec!["name".to_string()],
        filtering: Some(vec!["name".to_string()]),
        search: Some(vec!["name".to_string()]),
        options: None,
        import_date: None,
        description: None,
    };
    let fields = vec![Field {
        id: FieldId::new(1),
        dataset_id: DatasetId::new(1),
        table_id: TableId::new(90001),
        version_id: Some(VersionId::new(1)),
        name: "name".to_string(),
        title: "Name".to_string(),
        type_name: "string".to_string(),
        null: true,
        order: 1,
        options: None,
        has_choices: false,
        choices: None,
        frontend_filter: false,
        show: true,
        show_on_frontend: false,
        obfuscate: false,
        description: None,
        link_template: None,
    }];
    (Slug::new("schematest"), table, fields)
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (TABULARIUM_TEST_DATABASE_URL)"]
async fn create_drop_drop_is_idempotent() {
    let _ = env_logger::builder().is_test(true).try_init();
    let url = std::env::var("TABULARIUM_TEST_DATABASE_URL")
        .expect("TABULARIUM_TEST_DATABASE_URL must point at a scratch database");
    let pool = PgPool::connect(&url).await.unwrap();

    let (slug, table, fields) = scratch_table();
    let record_type = synthesize(&slug, &table, &fields).unwrap();
    let manager = PhysicalSchemaManager::new(pool);

    manager.drop_table(&record_type).await.unwrap();
    manager.create_table(&record_type, false).await.unwrap();
    manager.create_indexes(&record_type).await.unwrap();
    manager
        .install_search_trigger(&record_type, "pg_catalog.portuguese")
        .await
        .unwrap();
    manager.analyze(&record_type).await.unwrap();

    // Second drop is a no-op success, not an error.
    manager.drop_table(&record_type).await.unwrap();
    manager.drop_table(&record_type).await.unwrap();
}
