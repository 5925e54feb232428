//! Schema introspection capability.

use super::types::ColumnInfo;
use crate::error::{Result, TableError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static ENUM_DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^\s*enum\s*\((.*)\)\s*$").expect("valid enum pattern"));

/// Lists a table's columns and exposes native enum declarations.
pub trait SchemaInspector {
    /// Physical columns of `table` in definition order.
    fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>>;

    /// Native type declaration of an enum column, e.g. `enum('draft','published')`.
    ///
    /// `None` when the column has no enum declaration.
    fn enum_definition(&self, table: &str, column: &str) -> Result<Option<String>>;

    /// Permitted values of an enum column, in declaration order.
    ///
    /// # Errors
    ///
    /// `TableError::SchemaIntrospection` when the declaration is missing or is not
    /// an enum literal list.
    fn enum_values(&self, table: &str, column: &str) -> Result<Vec<String>> {
        let definition = self.enum_definition(table, column)?;
        if let Some(values) = definition.as_deref().and_then(parse_enum_definition) {
            return Ok(values);
        }
        Err(TableError::SchemaIntrospection {
            table: table.to_string(),
            column: column.to_string(),
            definition,
        })
    }
}

/// Extract the literals of an `enum('a','b')` declaration.
///
/// Literals are single or double quoted; a doubled quote inside a literal stands for
/// one quote character and commas inside quotes belong to the literal. `None` when
/// the declaration is not an enum or a literal is malformed.
pub fn parse_enum_definition(definition: &str) -> Option<Vec<String>> {
    let captures = ENUM_DECLARATION.captures(definition)?;
    let mut chars = captures.get(1)?.as_str().chars().peekable();
    let mut values = Vec::new();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(first) = chars.next() else {
            return Some(values);
        };
        let mut literal = String::new();
        if first == '\'' || first == '"' {
            loop {
                let c = chars.next()?;
                if c != first {
                    literal.push(c);
                } else if chars.next_if_eq(&first).is_some() {
                    literal.push(first);
                } else {
                    break;
                }
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            match chars.next() {
                None | Some(',') => {}
                Some(_) => return None,
            }
        } else {
            // bare word, up to the next comma
            literal.push(first);
            while let Some(c) = chars.next_if(|&c| c != ',') {
                literal.push(c);
            }
            chars.next();
            literal.truncate(literal.trim_end().len());
        }
        values.push(literal);
    }
}

/// In-memory inspector for storage engines without introspection, and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    tables: HashMap<String, Vec<ColumnInfo>>,
    enums: HashMap<(String, String), String>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        self.tables.insert(table.into(), columns);
        self
    }

    /// Register the native declaration of an enum column.
    pub fn enum_column(
        mut self,
        table: impl Into<String>,
        column: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        self.enums
            .insert((table.into(), column.into()), definition.into());
        self
    }
}

impl SchemaInspector for StaticSchema {
    fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| TableError::Query(format!("unknown table {table}")))
    }

    fn enum_definition(&self, table: &str, column: &str) -> Result<Option<String>> {
        Ok(self
            .enums
            .get(&(table.to_string(), column.to_string()))
            .cloned())
    }
}
