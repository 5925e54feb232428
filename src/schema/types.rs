//! Semantic column types and the fixed tables mapping casts and storage types onto them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Front-end facing data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    String,
    Int,
    Boolean,
    Date,
    Datetime,
    Decimal,
    Json,
    Text,
    Enum,
    Time,
    Year,
    Unknown,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::String => "string",
            SemanticType::Int => "int",
            SemanticType::Boolean => "boolean",
            SemanticType::Date => "date",
            SemanticType::Datetime => "datetime",
            SemanticType::Decimal => "decimal",
            SemanticType::Json => "json",
            SemanticType::Text => "text",
            SemanticType::Enum => "enum",
            SemanticType::Time => "time",
            SemanticType::Year => "year",
            SemanticType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(SemanticType::String),
            "int" => Ok(SemanticType::Int),
            "boolean" => Ok(SemanticType::Boolean),
            "date" => Ok(SemanticType::Date),
            "datetime" => Ok(SemanticType::Datetime),
            "decimal" => Ok(SemanticType::Decimal),
            "json" => Ok(SemanticType::Json),
            "text" => Ok(SemanticType::Text),
            "enum" => Ok(SemanticType::Enum),
            "time" => Ok(SemanticType::Time),
            "year" => Ok(SemanticType::Year),
            "unknown" => Ok(SemanticType::Unknown),
            _ => Err(()),
        }
    }
}

/// A physical column as reported by a schema inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    /// Storage-level type name, e.g. `character varying`, `int4`, `enum`.
    pub storage_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, storage_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage_type: storage_type.into(),
        }
    }
}

/// A rendered column: its name, resolved type and optional display alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub semantic: SemanticType,
    pub alias: Option<String>,
}

/// Map a model cast declaration (`decimal:2`, `array`, `immutable_datetime`) to a semantic type.
///
/// Cast arguments after `:` are ignored.
pub fn cast_semantic_type(cast: &str) -> Option<SemanticType> {
    let name = cast.split(':').next().unwrap_or_default().trim().to_lowercase();
    let semantic = match name.as_str() {
        "int" | "integer" => SemanticType::Int,
        "real" | "float" | "double" | "decimal" => SemanticType::Decimal,
        "string" | "encrypted" | "hashed" => SemanticType::String,
        "bool" | "boolean" => SemanticType::Boolean,
        "object" | "array" | "collection" | "json" => SemanticType::Json,
        "date" | "immutable_date" => SemanticType::Date,
        "datetime" | "custom_datetime" | "immutable_datetime" | "immutable_custom_datetime" | "timestamp" => {
            SemanticType::Datetime
        }
        "text" => SemanticType::Text,
        "enum" => SemanticType::Enum,
        "time" => SemanticType::Time,
        "year" => SemanticType::Year,
        _ => return None,
    };
    Some(semantic)
}

/// Map a storage-level column type to a semantic type.
///
/// Accepts PostgreSQL `information_schema` names (`character varying`,
/// `timestamp with time zone`), their internal aliases (`int4`, `timestamptz`)
/// and the portable names used by other inspectors (`string`, `bigint`).
pub fn storage_semantic_type(storage_type: &str) -> Option<SemanticType> {
    let lower = storage_type.trim().to_lowercase();
    // Length/precision modifiers do not change the type: varchar(255), numeric(10,2).
    let base = lower.split('(').next().unwrap_or_default().trim();
    let semantic = match base {
        "string" | "character varying" | "varchar" | "character" | "char" | "bpchar" | "name"
        | "uuid" | "guid" | "citext" | "inet" | "cidr" | "macaddr" => SemanticType::String,
        "text" | "tinytext" | "mediumtext" | "longtext" | "xml" => SemanticType::Text,
        "integer" | "int" | "int2" | "int4" | "int8" | "smallint" | "bigint" | "tinyint"
        | "mediumint" | "serial" | "bigserial" | "smallserial" | "oid" => SemanticType::Int,
        "boolean" | "bool" => SemanticType::Boolean,
        "date" => SemanticType::Date,
        "datetime" | "datetimetz" | "timestamp" | "timestamptz" | "timestamp without time zone"
        | "timestamp with time zone" => SemanticType::Datetime,
        "decimal" | "numeric" | "float" | "float4" | "float8" | "real" | "double"
        | "double precision" | "money" => SemanticType::Decimal,
        "json" | "jsonb" | "array" | "simple_array" => SemanticType::Json,
        "enum" => SemanticType::Enum,
        "time" | "timetz" | "time without time zone" | "time with time zone" => SemanticType::Time,
        "year" => SemanticType::Year,
        _ => return None,
    };
    Some(semantic)
}
