//! SQL projection of a schema.
//!
//! Identifiers are double-quoted. A lone primary key column gets its
//! constraint inline; a composite key moves into a trailing table-level
//! `PRIMARY KEY (...)` clause.

use super::{Column, Schema};

fn quoted(name: &str) -> String {
    format!("\"{}\"", name)
}

/// Render one column definition, optionally with its inline constraints.
pub(crate) fn column_definition(column: &Column, inline_primary_key: bool) -> String {
    let mut definition = format!("{} {}", quoted(column.name()), column.column_type().sql());
    if inline_primary_key && column.is_primary_key() {
        definition.push_str(" PRIMARY KEY");
    }
    if column.is_unique() {
        definition.push_str(" UNIQUE");
    }
    definition
}

/// Render a full `CREATE TABLE` statement for the schema.
pub(crate) fn create_table(schema: &Schema, table: &str) -> String {
    let composite = schema.primary_keys().len() > 1;
    let mut parts: Vec<String> = schema
        .columns()
        .map(|column| column_definition(column, !composite))
        .collect();

    if composite {
        let keys: Vec<String> = schema.primary_keys().iter().map(|k| quoted(k)).collect();
        parts.push(format!("PRIMARY KEY ({})", keys.join(", ")));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quoted(table),
        parts.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use crate::schema::{Column, Schema};

    #[test]
    fn single_primary_key_is_inlined() {
        let schema = Schema::builder("users")
            .column("id", Column::int64().primary_key())
            .column("email", Column::text().unique())
            .build()
            .unwrap();

        assert_eq!(
            schema.create_table_sql("users"),
            "CREATE TABLE IF NOT EXISTS \"users\" (\"id\" BIGINT PRIMARY KEY, \"email\" VARCHAR UNIQUE)"
        );
    }

    #[test]
    fn composite_primary_key_moves_to_table_constraint() {
        let schema = Schema::builder("events")
            .column("day", Column::date().primary_key())
            .column("seq", Column::int32().primary_key())
            .column("payload", Column::text())
            .build()
            .unwrap();

        assert_eq!(
            schema.create_table_sql("events"),
            "CREATE TABLE IF NOT EXISTS \"events\" (\"day\" DATE, \"seq\" INTEGER, \
             \"payload\" VARCHAR, PRIMARY KEY (\"day\", \"seq\"))"
        );
    }
}
