//! Table composer: resolves columns, shapes the query, executes it and assembles
//! the payload.

use super::options::TableOptions;
use super::payload::{PageMeta, PaginationState, TableData, TablePayload};
use super::view::{view_name, ViewRenderer};
use crate::config::TableConfig;
use crate::error::Result;
use crate::executor::QueryExecutor;
use crate::inflect;
use crate::query::{parse_order, TableQuery};
use crate::schema::{resolve_columns, ColumnDescriptor, SchemaInspector, SemanticType};
use crate::request::TableRequest;
use std::time::Instant;

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// A composed table: the view to render and its payload.
#[derive(Debug, Clone)]
pub struct RenderedTable {
    pub view: String,
    pub columns: Vec<ColumnDescriptor>,
    pub payload: TablePayload,
}

/// Renders tables from one schema inspector and one executor.
///
/// # Example
///
/// ```no_run
/// use inertia_table::{
///     InertiaPage, InertiaTable, ModelMeta, PostgresExecutor, PostgresSchema, TableOptions,
///     TableRequest,
/// };
///
/// # fn main() -> inertia_table::Result<()> {
/// let executor = PostgresExecutor::connect("postgresql://localhost/app")?;
/// let schema = PostgresSchema::new(&executor);
/// let tables = InertiaTable::new(&schema, &executor);
///
/// let request = TableRequest::from_query_string("/posts", "search=rust&page=2")?;
/// let page = tables.render_with(
///     &InertiaPage::new("/posts?search=rust&page=2"),
///     ModelMeta::new("Post").soft_deletes("deleted_at"),
///     &request,
///     TableOptions::new().filterable(["title"]),
/// )?;
/// # Ok(())
/// # }
/// ```
pub struct InertiaTable<'a> {
    schema: &'a dyn SchemaInspector,
    executor: &'a dyn QueryExecutor,
    config: TableConfig,
}

impl<'a> InertiaTable<'a> {
    pub fn new(schema: &'a dyn SchemaInspector, executor: &'a dyn QueryExecutor) -> Self {
        Self {
            schema,
            executor,
            config: TableConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Compose the table for `query` under `request`.
    ///
    /// # Errors
    ///
    /// Schema and database failures propagate; an enum column whose declaration
    /// cannot be parsed fails with `TableError::SchemaIntrospection`.
    pub fn render(
        &self,
        query: impl Into<TableQuery>,
        request: &TableRequest,
        options: TableOptions,
    ) -> Result<RenderedTable> {
        let query = query.into();
        let meta = query.meta().clone();

        #[cfg(feature = "tracing")]
        let span = tracing_helpers::render_span(meta.name());
        #[cfg(feature = "tracing")]
        let _guard = span.enter();

        let start = Instant::now();
        let result = self.compose(query, request, options);
        let elapsed = start.elapsed();

        match &result {
            Ok(rendered) => {
                log::debug!(
                    "rendered {} as {} ({} records) in {:?}",
                    meta.name(),
                    rendered.view,
                    rendered.payload.table.records.len(),
                    elapsed
                );
                #[cfg(feature = "metrics")]
                METRICS.record_render(meta.name(), elapsed);
            }
            Err(e) => log::warn!("rendering {} failed: {e}", meta.name()),
        }
        result
    }

    /// Compose the table and hand it to `renderer`.
    pub fn render_with<R: ViewRenderer>(
        &self,
        renderer: &R,
        query: impl Into<TableQuery>,
        request: &TableRequest,
        options: TableOptions,
    ) -> Result<R::Output> {
        let rendered = self.render(query, request, options)?;
        renderer.render(&rendered.view, rendered.payload.to_value()?)
    }

    fn compose(
        &self,
        query: TableQuery,
        request: &TableRequest,
        mut options: TableOptions,
    ) -> Result<RenderedTable> {
        let meta = query.meta().clone();
        let table = meta.table_name();

        // Column types, reconciled against the requested list.
        let types = resolve_columns(self.schema, &meta, options.columns.as_deref())?;

        let mut enums = serde_json::Map::new();
        for (column, semantic) in &types {
            if *semantic == SemanticType::Enum {
                let values = self.schema.enum_values(table, column)?;
                enums.insert(column.clone(), values.into());
            }
        }

        let names: Vec<String> = types.iter().map(|(name, _)| name.clone()).collect();
        let filterable = options.filterable.take().unwrap_or_else(|| names.clone());

        let order_column = request.order_column().unwrap_or(meta.key_name());
        let mut query = query
            .select(names.iter().cloned())
            .order(parse_order(order_column, request.order_direction()))
            .search(request.search().unwrap_or_default(), &filterable)
            .trashed(request.trashed());

        if let Some(callback) = options.query.take() {
            query = callback(query);
        }

        let (records, pagination) = if options.paginate {
            let page_size = self.config.page_size_for(request.page_size());
            let page = request.page(&self.config.page_parameter);
            let page = query.paginate(self.executor, page_size, page)?;
            let meta = PageMeta::describe(
                &page,
                request,
                &self.config.page_parameter,
                &self.config.page_sizes,
            );
            (page.records, PaginationState::active(meta))
        } else {
            (query.all(self.executor)?, PaginationState::inactive())
        };
        let records = match options.transform.take() {
            Some(transform) => transform(records),
            None => records,
        };

        let columns: Vec<ColumnDescriptor> = types
            .into_iter()
            .map(|(name, semantic)| ColumnDescriptor {
                alias: options.alias_for(&name).map(str::to_string),
                name,
                semantic,
            })
            .collect();

        let plural = meta.plural_name();
        let route = options.route.take().unwrap_or_else(|| {
            vec![
                plural.to_lowercase(),
                inflect::singular(&plural).to_lowercase(),
            ]
        });

        let payload = TablePayload {
            attach: std::mem::take(&mut options.attach),
            table: TableData {
                model: [plural.clone(), meta.name().to_string()],
                route,
                filters: request.filter_state(),
                order: request.order_state(),
                types: columns
                    .iter()
                    .map(|c| (c.name.clone(), c.semantic.as_str().into()))
                    .collect(),
                enums,
                columns: columns
                    .iter()
                    .map(|c| (c.name.clone(), c.alias.clone().into()))
                    .collect(),
                pagination,
                records,
            },
        };

        Ok(RenderedTable {
            view: view_name(&plural, options.view.as_deref()),
            columns,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use crate::model::ModelMeta;
    use crate::request::Trashed;
    use crate::schema::{ColumnInfo, StaticSchema};
    use crate::test_helpers::{record, RecordingExecutor};
    use serde_json::json;

    fn schema() -> StaticSchema {
        StaticSchema::new()
            .table(
                "posts",
                vec![
                    ColumnInfo::new("id", "bigint"),
                    ColumnInfo::new("title", "character varying"),
                    ColumnInfo::new("status", "enum"),
                    ColumnInfo::new("deleted_at", "timestamp without time zone"),
                ],
            )
            .enum_column("posts", "status", "enum('draft','published')")
    }

    fn post() -> ModelMeta {
        ModelMeta::new("Post").soft_deletes("deleted_at")
    }

    #[test]
    fn test_processing_order_and_payload() {
        let schema = schema();
        let executor = RecordingExecutor::new();
        executor.push_records(vec![record(json!({"aggregate": 1}))]);
        executor.push_records(vec![record(json!({"id": 1, "title": "hello"}))]);
        let tables = InertiaTable::new(&schema, &executor);

        let request = TableRequest::new("/posts")
            .with("search", "hello")
            .with("trashed", "only");
        let rendered = tables
            .render(
                post(),
                &request,
                TableOptions::new()
                    .filterable(["title"])
                    .alias("title", "Title")
                    .attach("can_create", true),
            )
            .unwrap();

        assert_eq!(rendered.view, "Posts/Index");
        let table = &rendered.payload.table;
        assert_eq!(table.model, ["Posts".to_string(), "Post".to_string()]);
        assert_eq!(table.route, vec!["posts", "post"]);
        assert_eq!(
            serde_json::Value::Object(table.types.clone()),
            json!({"id": "int", "title": "string", "status": "enum", "deleted_at": "datetime"})
        );
        assert_eq!(table.enums["status"], json!(["draft", "published"]));
        assert_eq!(table.columns["title"], json!("Title"));
        assert_eq!(table.columns["id"], json!(null));
        assert!(table.pagination.active);
        assert_eq!(rendered.payload.attach["can_create"], json!(true));

        let captured = executor.captured();
        assert_eq!(captured.len(), 2);
        let sql = &captured[1].sql;
        assert!(sql.starts_with(r#"SELECT "id", "title", "status", "deleted_at" FROM "posts""#), "{sql}");
        assert!(sql.contains(r#"CAST("title" AS TEXT) ILIKE $1"#), "{sql}");
        assert!(sql.contains(r#""deleted_at" IS NOT NULL"#), "{sql}");
        assert!(sql.contains(r#"ORDER BY "id" ASC"#), "{sql}");
    }

    #[test]
    fn test_query_and_transform_callbacks() {
        let schema = schema();
        let executor = RecordingExecutor::new();
        executor.push_records(vec![record(json!({"id": 1})), record(json!({"id": 2}))]);
        let tables = InertiaTable::new(&schema, &executor);

        let rendered = tables
            .render(
                post(),
                &TableRequest::new("/posts"),
                TableOptions::new()
                    .columns(["id"])
                    .paginate(false)
                    .query(|q| q.trashed(Trashed::With))
                    .transform(|records| records.into_iter().rev().collect()),
            )
            .unwrap();

        let table = &rendered.payload.table;
        assert_eq!(table.pagination, PaginationState::inactive());
        assert_eq!(table.records[0]["id"], json!(2));
        assert!(!executor.captured()[0].sql.contains("deleted_at"));
    }

    #[test]
    fn test_bad_enum_declaration_fails_render() {
        let schema = schema().enum_column("posts", "status", "varchar(10)");
        let executor = RecordingExecutor::new();
        let tables = InertiaTable::new(&schema, &executor);

        let err = tables
            .render(post(), &TableRequest::new("/posts"), TableOptions::new())
            .unwrap_err();
        assert!(matches!(err, TableError::SchemaIntrospection { .. }));
        assert!(executor.captured().is_empty());
    }

    #[test]
    fn test_page_size_and_custom_view() {
        let schema = schema();
        let executor = RecordingExecutor::new();
        executor.push_records(vec![record(json!({"aggregate": 30}))]);
        let tables = InertiaTable::new(&schema, &executor).with_config(TableConfig {
            default_page_size: 5,
            ..TableConfig::default()
        });

        let request = TableRequest::new("/posts").with("page", "3");
        let rendered = tables
            .render(
                post(),
                &request,
                TableOptions::new().columns(["id"]).view("Archive").route(["admin.posts", "post"]),
            )
            .unwrap();
        assert_eq!(rendered.view, "Posts/Archive");
        assert_eq!(rendered.payload.table.route, vec!["admin.posts", "post"]);
        let meta = rendered.payload.table.pagination.page.as_ref().unwrap();
        assert_eq!(meta.page_size, 5);
        assert_eq!(meta.current_page, 3);
        assert_eq!(meta.last_page, 6);
        assert_eq!(
            executor.captured()[1].values,
            vec![sea_query::Value::from(5u64), sea_query::Value::from(10u64)]
        );
    }

    #[test]
    fn test_oversized_page_size_and_page_stay_bindable() {
        let schema = schema();
        let executor = RecordingExecutor::new();
        executor.push_records(vec![record(json!({"aggregate": 3}))]);
        let tables = InertiaTable::new(&schema, &executor);

        let request = TableRequest::new("/posts")
            .with("pageSize", u64::MAX.to_string())
            .with("page", u64::MAX.to_string());
        let rendered = tables
            .render(post(), &request, TableOptions::new().columns(["id"]))
            .unwrap();

        let meta = rendered.payload.table.pagination.page.as_ref().unwrap();
        assert_eq!(meta.page_size, 100);
        assert_eq!(
            executor.captured()[1].values,
            vec![
                sea_query::Value::from(100u64),
                sea_query::Value::from(i64::MAX as u64)
            ]
        );
    }
}
