//! Select query builder for table renders.
//!
//! `TableQuery` is threaded through `self -> Self` steps and turned into a
//! `SelectStatement` only when executed. Column selection, ordering, the
//! soft-delete scope and paging are held aside until then so the count query can
//! be built from the same state without them.

use super::order::OrderDirective;
use crate::model::ModelMeta;
use crate::request::Trashed;
use sea_query::extension::postgres::PgExpr;
use sea_query::{
    ColumnRef, Condition, DynIden, Expr, ExprTrait, IntoColumnRef, IntoCondition,
    SelectStatement, TableName, TableRef,
};

/// Query over a model's table.
///
/// # Example
///
/// ```no_run
/// use inertia_table::{ModelMeta, TableQuery, Trashed};
/// use inertia_table::query::OrderDirective;
///
/// let query = TableQuery::new(ModelMeta::new("Post").soft_deletes("deleted_at"))
///     .select(["id", "title"])
///     .order(vec![OrderDirective::desc("id")])
///     .search("hello", &["title"])
///     .trashed(Trashed::Only);
/// ```
#[derive(Debug, Clone)]
pub struct TableQuery {
    meta: ModelMeta,
    pub(crate) query: SelectStatement,
    columns: Vec<String>,
    orders: Vec<OrderDirective>,
    trashed: Trashed,
    limit: Option<u64>,
    offset: Option<u64>,
}

pub(crate) fn iden(name: &str) -> DynIden {
    DynIden::from(name.to_string())
}

/// Column reference; `table.column` becomes a qualified reference.
pub(crate) fn column_ref(name: &str) -> ColumnRef {
    match name.split_once('.') {
        Some((table, column)) => (iden(table), iden(column)).into_column_ref(),
        None => iden(name).into_column_ref(),
    }
}

impl TableQuery {
    pub fn new(meta: ModelMeta) -> Self {
        let mut query = SelectStatement::default();
        query.from(TableRef::Table(TableName(None, iden(meta.table_name())), None));
        Self {
            meta,
            query,
            columns: Vec::new(),
            orders: Vec::new(),
            trashed: Trashed::Exclude,
            limit: None,
            offset: None,
        }
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    pub fn orders(&self) -> &[OrderDirective] {
        &self.orders
    }

    pub fn selected(&self) -> &[String] {
        &self.columns
    }

    pub fn trashed_scope(&self) -> Trashed {
        self.trashed
    }

    /// Restrict the selected columns. An empty selection means `*`.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn order_by(mut self, directive: OrderDirective) -> Self {
        self.orders.push(directive);
        self
    }

    /// Append several ORDER BY terms in order.
    pub fn order(mut self, directives: Vec<OrderDirective>) -> Self {
        self.orders.extend(directives);
        self
    }

    /// AND a condition into the WHERE clause.
    pub fn filter<F>(mut self, condition: F) -> Self
    where
        F: IntoCondition,
    {
        self.query.cond_where(condition.into_condition());
        self
    }

    /// Case-insensitive substring search: `(c1 ILIKE %term% OR c2 ILIKE %term% ...)`.
    ///
    /// Columns are compared as text. An empty term or column list leaves the query
    /// unchanged.
    pub fn search<S: AsRef<str>>(self, term: &str, columns: &[S]) -> Self {
        if term.is_empty() || columns.is_empty() {
            return self;
        }
        let pattern = format!("%{term}%");
        let any = columns.iter().fold(Condition::any(), |any, column| {
            any.add(
                Expr::col(column_ref(column.as_ref()))
                    .cast_as("TEXT")
                    .ilike(pattern.as_str()),
            )
        });
        self.filter(any)
    }

    /// Soft-delete scope; ignored for models without a deleted-at column.
    pub fn trashed(mut self, trashed: Trashed) -> Self {
        self.trashed = trashed;
        self
    }

    /// Direct access to the underlying statement for anything the builder does not cover.
    pub fn modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut SelectStatement),
    {
        f(&mut self.query);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Statement with filters and the soft-delete scope but without selection,
    /// ordering or paging.
    pub(crate) fn filtered_statement(&self) -> SelectStatement {
        let mut query = self.query.clone();
        if let Some(deleted_at) = self.meta.deleted_at_column() {
            match self.trashed {
                Trashed::Exclude => {
                    query.and_where(Expr::col(iden(deleted_at)).is_null());
                }
                Trashed::Only => {
                    query.and_where(Expr::col(iden(deleted_at)).is_not_null());
                }
                Trashed::With => {}
            }
        }
        query
    }

    /// The complete SELECT statement.
    pub fn build(&self) -> SelectStatement {
        let mut query = self.filtered_statement();
        if self.columns.is_empty() {
            query.column(sea_query::Asterisk);
        } else {
            for column in &self.columns {
                query.column(column_ref(column));
            }
        }
        for directive in &self.orders {
            query.order_by(column_ref(&directive.column), directive.direction.into());
        }
        if let Some(limit) = self.limit {
            query.limit(limit);
        }
        if let Some(offset) = self.offset {
            query.offset(offset);
        }
        query
    }
}

impl From<ModelMeta> for TableQuery {
    fn from(meta: ModelMeta) -> Self {
        TableQuery::new(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_query::PostgresQueryBuilder;

    fn post() -> ModelMeta {
        ModelMeta::new("Post").soft_deletes("deleted_at")
    }

    fn sql(query: &TableQuery) -> String {
        query.build().to_string(PostgresQueryBuilder)
    }

    #[test]
    fn test_default_selects_everything_active() {
        assert_eq!(
            sql(&TableQuery::new(post())),
            r#"SELECT * FROM "posts" WHERE "deleted_at" IS NULL"#
        );
        // no soft deletes, no scope
        assert_eq!(
            sql(&TableQuery::new(ModelMeta::new("Tag"))),
            r#"SELECT * FROM "tags""#
        );
    }

    #[test]
    fn test_selection_and_order_directives() {
        let query = TableQuery::new(ModelMeta::new("Post"))
            .select(["id", "title"])
            .order(vec![OrderDirective::desc("title"), OrderDirective::asc("id")]);
        assert_eq!(
            sql(&query),
            r#"SELECT "id", "title" FROM "posts" ORDER BY "title" DESC, "id" ASC"#
        );
    }

    #[test]
    fn test_qualified_columns_are_split() {
        let query = TableQuery::new(ModelMeta::new("Post"))
            .select(["posts.id"])
            .order(vec![OrderDirective::desc("posts.title")]);
        assert_eq!(
            sql(&query),
            r#"SELECT "posts"."id" FROM "posts" ORDER BY "posts"."title" DESC"#
        );
    }

    #[test]
    fn test_search_and_only_trashed() {
        let query = TableQuery::new(post())
            .search("hello", &["title", "body"])
            .trashed(Trashed::Only);
        let (sql, values) = query.build().build(PostgresQueryBuilder);
        assert!(sql.contains(r#"CAST("title" AS TEXT) ILIKE $1"#), "{sql}");
        assert!(sql.contains(r#"CAST("body" AS TEXT) ILIKE $2"#), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
        assert!(sql.ends_with(r#""deleted_at" IS NOT NULL"#), "{sql}");
        assert_eq!(values.0.len(), 2);
        assert_eq!(values.0[0], sea_query::Value::from("%hello%"));
    }

    #[test]
    fn test_with_trashed_has_no_scope() {
        let query = TableQuery::new(post()).trashed(Trashed::With);
        assert_eq!(sql(&query), r#"SELECT * FROM "posts""#);
    }

    #[test]
    fn test_empty_search_is_noop() {
        let empty: [&str; 0] = [];
        let base = sql(&TableQuery::new(ModelMeta::new("Post")));
        assert_eq!(sql(&TableQuery::new(ModelMeta::new("Post")).search("x", &empty)), base);
        assert_eq!(sql(&TableQuery::new(ModelMeta::new("Post")).search("", &["title"])), base);
    }

    #[test]
    fn test_limit_offset_and_modify() {
        let query = TableQuery::new(ModelMeta::new("Post"))
            .modify(|q| {
                q.and_where(Expr::col(iden("published")).eq(true));
            })
            .limit(10)
            .offset(20);
        let sql = sql(&query);
        assert!(sql.contains(r#""published" = TRUE"#), "{sql}");
        assert!(sql.ends_with("LIMIT 10 OFFSET 20"), "{sql}");
    }
}
