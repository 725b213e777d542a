//! Querystring-to-SQL flow over a freshly synthesized record type.

use std::sync::Arc;
use tabularium_commons::models::{
    DatasetId, Field, FieldId, Slug, Table, TableId, VersionId,
};
use tabularium_query::{QueryParams, SelectQuery};
use tabularium_schema::synthesize;

const LANG: &str = "pg_catalog.portuguese";

fn record_type() -> Arc<tabularium_schema::RecordType> {
    let table = Table {
        id: TableId::new(7),
        dataset_id: DatasetId::new(3),
        version_id: VersionId::new(4),
        name: "people".to_string(),
        default: true,
        hidden: false,
        ordering: vec!["name".to_string()],
        filtering: Some(vec!["name".to_string(), "age".to_string()]),
        search: Some(vec!["name".to_string()]),
        options: None,
        import_date: None,
        description: None,
    };
    let field = |name: &str, type_name: &str, order: i32| Field {
        id: FieldId::new(order as i64),
        dataset_id: DatasetId::new(3),
        table_id: TableId::new(7),
        version_id: Some(VersionId::new(4)),
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
    };
    let fields = vec![field("name", "string", 1), field("age", "integer", 2)];
    Arc::new(synthesize(&Slug::new("registry"), &table, &fields).unwrap())
}

fn params(items: &[(&str, &str)]) -> QueryParams {
    QueryParams::from_pairs(
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>(),
    )
}

#[test]
fn full_pipeline_renders_one_safe_select() {
    let query = SelectQuery::from_querystring(
        record_type(),
        LANG,
        &params(&[
            ("age__gte", "18"),
            ("order-by", "-name"),
            ("search", "ann"),
            ("bogus__operator", "x"),
            ("empty", ""),
        ]),
    );

    let sql = query.select_sql();
    assert_eq!(
        sql,
        "SELECT id, name, age FROM data_registry_people \
         WHERE search_data @@ plainto_tsquery($1::regconfig, $2) AND age >= $3 \
         ORDER BY ts_rank(search_data, plainto_tsquery($4::regconfig, $5)) DESC, name DESC"
    );
}

#[test]
fn hostile_input_degrades_to_a_valid_query() {
    let query = SelectQuery::from_querystring(
        record_type(),
        LANG,
        &params(&[
            ("name; DROP TABLE data_registry_people; --", "x"),
            ("age__regex", ".*"),
            ("order-by", "name); DROP TABLE x; --"),
        ]),
    );

    // Nothing hostile survived: unfiltered select with declared ordering.
    let sql = query.select_sql();
    assert_eq!(
        sql,
        "SELECT id, name, age FROM data_registry_people ORDER BY name ASC"
    );
    assert!(!query.has_predicates());
}

#[test]
fn count_sql_matches_predicate_state() {
    let unfiltered = SelectQuery::from_querystring(record_type(), LANG, &params(&[]));
    assert_eq!(
        unfiltered.count_sql(),
        "SELECT COUNT(*) FROM data_registry_people"
    );

    let filtered =
        SelectQuery::from_querystring(record_type(), LANG, &params(&[("age__lt", "30")]));
    assert_eq!(
        filtered.count_sql(),
        "SELECT COUNT(*) FROM data_registry_people WHERE age < $1"
    );
}
