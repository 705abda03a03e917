use std::sync::Arc;

use datashelf::{Column, ColumnType, Database, PortableType, Schema, ShelfError, TimeUnit};

fn base_user_schema() -> Schema {
    Schema::builder("user")
        .column("id", Column::int64().primary_key())
        .column("email", Column::text().unique())
        .column("joined", Column::date())
        .build()
        .expect("schema should build")
}

#[test]
fn test_derived_schema_overrides_and_extends() {
    let base = base_user_schema();

    // Override one inherited column, add one new column.
    let derived = Schema::builder("verified_user")
        .extends(&base)
        .column("email", Column::text())
        .column("verified_at", Column::timestamp(TimeUnit::Microseconds))
        .build()
        .expect("derived should build");

    assert_eq!(
        derived.column_names(),
        vec!["id", "email", "joined", "verified_at"]
    );

    // The override replaced the column wholesale: no unique flag survives.
    assert!(!derived.column("email").unwrap().is_unique());
    assert!(derived.unique_keys().is_empty());

    // The ancestor is untouched.
    assert!(base.column("email").unwrap().is_unique());
    assert_eq!(base.unique_keys(), &["email".to_string()]);
}

#[test]
fn test_projections_agree_on_names_and_order() {
    let schema = Schema::builder("measurements")
        .column("sensor", Column::categorical().primary_key())
        .column("taken_at", Column::timestamp(TimeUnit::Nanoseconds).primary_key())
        .column("reading", Column::float64())
        .column("tags", Column::list(ColumnType::Text))
        .build()
        .expect("schema should build");

    let value_types = schema.value_types();
    let portable_types = schema.portable_types();
    assert_eq!(value_types.len(), 4);
    assert_eq!(portable_types.len(), 4);

    for ((value_name, _), (portable_name, _)) in value_types.iter().zip(portable_types.iter()) {
        assert_eq!(value_name, portable_name);
    }

    // The portable lowering erases engine detail but keeps the class.
    assert_eq!(portable_types[0].1, PortableType::Text);
    assert_eq!(portable_types[1].1, PortableType::Timestamp);
    assert_eq!(portable_types[2].1, PortableType::Float);
    assert_eq!(portable_types[3].1, PortableType::List);

    // The SQL lowering keeps engine detail.
    let sql = schema.sql_columns();
    assert_eq!(sql[1], "\"taken_at\" TIMESTAMP_NS");
    assert_eq!(sql[3], "\"tags\" VARCHAR[]");
}

#[test]
fn test_create_table_sql_with_composite_key() {
    let schema = Schema::builder("measurements")
        .column("sensor", Column::text().primary_key())
        .column("taken_at", Column::timestamp(TimeUnit::Microseconds).primary_key())
        .column("reading", Column::float64())
        .build()
        .expect("schema should build");

    assert_eq!(
        schema.create_table_sql("measurements"),
        "CREATE TABLE IF NOT EXISTS \"measurements\" (\"sensor\" VARCHAR, \
         \"taken_at\" TIMESTAMP, \"reading\" DOUBLE, PRIMARY KEY (\"sensor\", \"taken_at\"))"
    );
}

#[test]
fn test_create_table_sql_with_single_key_and_unique() {
    let schema = base_user_schema();
    assert_eq!(
        schema.create_table_sql("users"),
        "CREATE TABLE IF NOT EXISTS \"users\" (\"id\" BIGINT PRIMARY KEY, \
         \"email\" VARCHAR UNIQUE, \"joined\" DATE)"
    );
}

#[test]
fn test_database_ddl_uses_table_names() {
    let schema = Arc::new(base_user_schema());
    let db = Database::builder("warehouse")
        .table("accounts", Arc::clone(&schema))
        .table("maintainers", schema)
        .bare_table("scratch")
        .build()
        .expect("warehouse should build");

    let statements = db.create_table_statements();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].contains("\"accounts\""));
    assert!(statements[1].contains("\"maintainers\""));
}

#[test]
fn test_schema_json_round_trip() {
    let base = base_user_schema();
    let derived = Schema::builder("verified_user")
        .extends(&base)
        .column("verified_at", Column::timestamp(TimeUnit::Milliseconds))
        .column("score", Column::decimal(10, 2))
        .build()
        .expect("derived should build");

    let json = derived.to_json().expect("serialize");
    let restored = Schema::from_json(&json).expect("deserialize");

    assert_eq!(restored, derived);
    assert_eq!(restored.column_names(), derived.column_names());
    assert_eq!(restored.primary_keys(), derived.primary_keys());
    assert_eq!(
        restored.column("score").unwrap().column_type(),
        &ColumnType::Decimal {
            precision: 10,
            scale: 2
        }
    );
}

#[test]
fn test_malformed_schema_json_is_rejected() {
    let err = Schema::from_json("{\"name\": \"bad name\", \"columns\": []}").unwrap_err();
    assert!(matches!(err, ShelfError::Serialization(_)));
}

#[test]
fn test_unknown_column_lookup_reports_schema_name() {
    let schema = base_user_schema();
    let err = schema.column("missing").unwrap_err();
    assert!(matches!(
        err,
        ShelfError::UnknownMember { container, name }
            if container == "user" && name == "missing"
    ));
}
