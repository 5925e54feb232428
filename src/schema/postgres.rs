//! PostgreSQL schema inspector over `information_schema` and `pg_enum`.

use super::inspector::SchemaInspector;
use super::types::ColumnInfo;
use crate::error::{Result, TableError};
use crate::executor::{QueryExecutor, Record};
use sea_query::{Value, Values};

// Types are matched within the schema that declares them; tenants may share type names.
const COLUMNS_SQL: &str = r#"SELECT c.column_name AS name,
       CASE WHEN t.typtype = 'e' THEN 'enum' ELSE c.data_type END AS storage_type
FROM information_schema.columns c
LEFT JOIN (pg_catalog.pg_type t
           JOIN pg_catalog.pg_namespace n ON n.oid = t.typnamespace)
       ON t.typname = c.udt_name AND n.nspname = c.udt_schema
WHERE c.table_schema = current_schema() AND c.table_name = $1
ORDER BY c.ordinal_position"#;

const ENUM_LABELS_SQL: &str = r#"SELECT e.enumlabel AS label
FROM information_schema.columns c
JOIN pg_catalog.pg_type t ON t.typname = c.udt_name
JOIN pg_catalog.pg_namespace n ON n.oid = t.typnamespace AND n.nspname = c.udt_schema
JOIN pg_catalog.pg_enum e ON e.enumtypid = t.oid
WHERE c.table_schema = current_schema() AND c.table_name = $1 AND c.column_name = $2
ORDER BY e.enumsortorder"#;

// Quotes are doubled by hand: quote_literal switches to E'' syntax on backslashes.
const ENUM_DEFINITION_SQL: &str = r#"SELECT 'enum(' || string_agg('''' || replace(e.enumlabel, '''', '''''') || '''', ',' ORDER BY e.enumsortorder) || ')' AS definition
FROM information_schema.columns c
JOIN pg_catalog.pg_type t ON t.typname = c.udt_name
JOIN pg_catalog.pg_namespace n ON n.oid = t.typnamespace AND n.nspname = c.udt_schema
JOIN pg_catalog.pg_enum e ON e.enumtypid = t.oid
WHERE c.table_schema = current_schema() AND c.table_name = $1 AND c.column_name = $2"#;

/// Inspector backed by the connected database's current schema.
pub struct PostgresSchema<E> {
    executor: E,
}

impl<E: QueryExecutor> PostgresSchema<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

fn text_field(record: &Record, field: &str) -> Result<Option<String>> {
    match record.get(field) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(TableError::Parse(format!(
            "expected text in {field}, found {other}"
        ))),
    }
}

impl<E: QueryExecutor> SchemaInspector for PostgresSchema<E> {
    fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let values = Values(vec![Value::from(table)]);
        let records = self.executor.query_records(COLUMNS_SQL, &values)?;
        records
            .iter()
            .map(|record| {
                let name = text_field(record, "name")?
                    .ok_or_else(|| TableError::Parse("column without a name".to_string()))?;
                let storage_type = text_field(record, "storage_type")?.unwrap_or_default();
                Ok(ColumnInfo { name, storage_type })
            })
            .collect()
    }

    fn enum_definition(&self, table: &str, column: &str) -> Result<Option<String>> {
        let values = Values(vec![Value::from(table), Value::from(column)]);
        let records = self.executor.query_records(ENUM_DEFINITION_SQL, &values)?;
        match records.first() {
            Some(record) => text_field(record, "definition"),
            None => Ok(None),
        }
    }

    /// Labels straight from `pg_enum`; nothing is re-parsed.
    fn enum_values(&self, table: &str, column: &str) -> Result<Vec<String>> {
        let values = Values(vec![Value::from(table), Value::from(column)]);
        let records = self.executor.query_records(ENUM_LABELS_SQL, &values)?;
        if records.is_empty() {
            return Err(TableError::SchemaIntrospection {
                table: table.to_string(),
                column: column.to_string(),
                definition: None,
            });
        }
        records
            .iter()
            .map(|record| {
                text_field(record, "label")?
                    .ok_or_else(|| TableError::Parse("enum label is null".to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_enum_definition;
    use crate::test_helpers::{record, RecordingExecutor};
    use serde_json::json;

    #[test]
    fn test_columns_are_read_in_order() {
        let executor = RecordingExecutor::new();
        executor.push_records(vec![
            record(json!({"name": "id", "storage_type": "bigint"})),
            record(json!({"name": "status", "storage_type": "enum"})),
        ]);
        let schema = PostgresSchema::new(&executor);

        let columns = schema.columns("posts").unwrap();
        assert_eq!(
            columns,
            vec![ColumnInfo::new("id", "bigint"), ColumnInfo::new("status", "enum")]
        );
        let captured = executor.captured();
        assert!(captured[0].sql.contains("information_schema.columns"));
        assert_eq!(captured[0].values, vec![Value::from("posts")]);
    }

    #[test]
    fn test_type_lookups_are_scoped_to_the_column_schema() {
        for sql in [COLUMNS_SQL, ENUM_LABELS_SQL, ENUM_DEFINITION_SQL] {
            assert!(sql.contains("pg_catalog.pg_namespace"), "{sql}");
            assert!(sql.contains("n.nspname = c.udt_schema"), "{sql}");
        }
    }

    #[test]
    fn test_enum_values_are_read_as_labels() {
        let executor = RecordingExecutor::new();
        executor.push_records(vec![
            record(json!({"label": "a,b"})),
            record(json!({"label": "it's"})),
            record(json!({"label": r"back\slash"})),
        ]);
        let schema = PostgresSchema::new(&executor);

        let values = schema.enum_values("posts", "status").unwrap();
        assert_eq!(values, vec!["a,b", "it's", r"back\slash"]);
        let captured = executor.captured();
        assert!(captured[0].sql.contains("e.enumlabel AS label"));
        assert!(captured[0].sql.ends_with("ORDER BY e.enumsortorder"));
        assert_eq!(
            captured[0].values,
            vec![Value::from("posts"), Value::from("status")]
        );
    }

    #[test]
    fn test_enum_definition_parses_back_to_labels() {
        let executor = RecordingExecutor::new();
        executor.push_records(vec![record(json!({"definition": "enum('a,b','it''s')"}))]);
        let schema = PostgresSchema::new(&executor);

        let definition = schema.enum_definition("posts", "status").unwrap();
        assert_eq!(
            definition.as_deref().and_then(parse_enum_definition),
            Some(vec!["a,b".to_string(), "it's".to_string()])
        );
        assert!(!executor.captured()[0].sql.contains("quote_literal"));
    }

    #[test]
    fn test_enum_values_for_non_enum_column_fail() {
        let executor = RecordingExecutor::new();
        // a non-enum column joins no pg_enum rows
        executor.push_records(Vec::new());
        let schema = PostgresSchema::new(&executor);

        assert!(matches!(
            schema.enum_values("posts", "title"),
            Err(TableError::SchemaIntrospection { definition: None, .. })
        ));
    }
}
