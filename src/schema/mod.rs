//! Column type inference from schema metadata.
//!
//! [`resolve_columns`] turns a model and an optional requested column list into
//! an ordered name → [`SemanticType`] map; [`SchemaInspector`] supplies the
//! physical columns and enum declarations it works from.

pub mod inspector;
pub mod postgres;
pub mod resolver;
pub mod types;

#[doc(inline)]
pub use inspector::{parse_enum_definition, SchemaInspector, StaticSchema};
#[doc(inline)]
pub use postgres::PostgresSchema;
#[doc(inline)]
pub use resolver::{resolve_columns, ColumnResolver, RequestedColumn, TypeStrategy};
#[doc(inline)]
pub use types::{cast_semantic_type, storage_semantic_type, ColumnDescriptor, ColumnInfo, SemanticType};
