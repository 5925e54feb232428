//! Model metadata: the table a model lives in and how its columns are typed.

use crate::inflect;
use crate::query::TableQuery;
use crate::schema::SemanticType;

/// Static description of a model.
///
/// Casts and type overrides keep declaration order so resolution stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMeta {
    name: String,
    table: String,
    key_name: String,
    casts: Vec<(String, String)>,
    type_overrides: Vec<(String, SemanticType)>,
    deleted_at: Option<String>,
}

impl ModelMeta {
    /// Create metadata for model `name`; the table defaults to the snake_case plural.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let table = default_table_name(&name);
        Self {
            name,
            table,
            key_name: "id".to_string(),
            casts: Vec::new(),
            type_overrides: Vec::new(),
            deleted_at: None,
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn key(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = key_name.into();
        self
    }

    /// Declare a cast, e.g. `("price", "decimal:2")`.
    pub fn cast(mut self, column: impl Into<String>, cast: impl Into<String>) -> Self {
        self.casts.push((column.into(), cast.into()));
        self
    }

    /// Force a column's semantic type regardless of casts and storage type.
    pub fn column_type(mut self, column: impl Into<String>, semantic: SemanticType) -> Self {
        self.type_overrides.push((column.into(), semantic));
        self
    }

    /// Mark the model as soft-deleting through `column` (usually `deleted_at`).
    pub fn soft_deletes(mut self, column: impl Into<String>) -> Self {
        self.deleted_at = Some(column.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn casts(&self) -> &[(String, String)] {
        &self.casts
    }

    pub fn type_overrides(&self) -> &[(String, SemanticType)] {
        &self.type_overrides
    }

    pub fn deleted_at_column(&self) -> Option<&str> {
        self.deleted_at.as_deref()
    }

    pub fn plural_name(&self) -> String {
        inflect::plural(&self.name)
    }
}

fn default_table_name(model: &str) -> String {
    let mut snake = String::with_capacity(model.len() + 4);
    for (i, c) in model.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                snake.push('_');
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
    }
    inflect::plural(&snake)
}

/// Implemented by application models that can be rendered as tables.
pub trait TableModel {
    fn meta() -> ModelMeta;

    /// A fresh query over the model's table.
    fn query() -> TableQuery {
        TableQuery::new(Self::meta())
    }
}
