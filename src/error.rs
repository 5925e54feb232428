//! Error type shared by the resolver, the query layer and the composer.

use may_postgres::Error as PostgresError;
use thiserror::Error;

/// Errors raised while introspecting, querying or rendering a table.
#[derive(Debug, Error)]
pub enum TableError {
    /// `PostgreSQL` error from `may_postgres`
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] PostgresError),

    /// Query could not be built or executed
    #[error("Query error: {0}")]
    Query(String),

    /// Row parsing/conversion error
    #[error("Parse error: {0}")]
    Parse(String),

    /// An enum column's native declaration could not be read as a literal list.
    #[error("Schema introspection error: column {table}.{column} is not an enum declaration ({definition:?})")]
    SchemaIntrospection {
        table: String,
        column: String,
        definition: Option<String>,
    },

    /// Connection string or connection establishment failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Payload could not be serialised for the view layer
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other execution errors
    #[error("Execution error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_error_display() {
        let err = TableError::Query("test error".to_string());
        assert!(err.to_string().contains("Query error"));
        assert!(err.to_string().contains("test error"));

        let err = TableError::Parse("bad row".to_string());
        assert!(err.to_string().contains("Parse error"));

        let err = TableError::Other("boom".to_string());
        assert!(err.to_string().contains("Execution error"));
    }

    #[test]
    fn test_schema_introspection_display_names_column() {
        let err = TableError::SchemaIntrospection {
            table: "posts".to_string(),
            column: "status".to_string(),
            definition: Some("varchar(255)".to_string()),
        };
        let display = err.to_string();
        assert!(display.contains("posts.status"));
        assert!(display.contains("varchar(255)"));
    }
}
