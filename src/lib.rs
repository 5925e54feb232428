//! # inertia-table
//!
//! Table payloads for server-driven single-page views, built on `sea-query` and
//! `may_postgres`.
//!
//! Given a model (or a query over one) and the inbound request, [`InertiaTable`]
//! infers column types from schema metadata, applies ordering, search, soft-delete
//! scoping and pagination, and assembles the nested payload a front-end table
//! component consumes.
//!
//! ```no_run
//! use inertia_table::{InertiaTable, ModelMeta, StaticSchema, TableOptions, TableRequest};
//! # fn run(executor: &dyn inertia_table::QueryExecutor) -> inertia_table::Result<()> {
//! let schema = StaticSchema::new();
//! let tables = InertiaTable::new(&schema, executor);
//! let request = TableRequest::from_query_string("/comments", "orderColumn=created_at&orderDirection=desc")?;
//! let rendered = tables.render(ModelMeta::new("Comment"), &request, TableOptions::new())?;
//! assert_eq!(rendered.view, "Comments/Index");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod inflect;
pub mod metrics;
pub mod model;
pub mod query;
pub mod request;
pub mod routes;
mod row;
pub mod schema;
pub mod table;

#[cfg(test)]
mod test_helpers;

pub use crate::config::{DatabaseConfig, Settings, TableConfig};
pub use error::{Result, TableError};
pub use executor::{PostgresExecutor, QueryExecutor, Record};
pub use model::{ModelMeta, TableModel};
pub use query::{parse_order, Direction, OrderDirective, Page, TableQuery};
pub use request::{FilterState, OrderState, TableRequest, Trashed};
pub use routes::{ResourceRoutes, RouteDef, RouteMethod};
pub use schema::{
    ColumnDescriptor, ColumnInfo, PostgresSchema, RequestedColumn, SchemaInspector, SemanticType,
    StaticSchema,
};
pub use table::{
    view_name, InertiaPage, InertiaTable, PageMeta, PaginationState, RenderedTable, TableOptions,
    TablePayload, ViewRenderer,
};
