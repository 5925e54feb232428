//! Per-render options.

use crate::executor::Record;
use crate::query::TableQuery;
use crate::schema::{RequestedColumn, SemanticType};

/// Runs after selection, ordering and filtering, before execution.
pub type QueryCallback = Box<dyn FnOnce(TableQuery) -> TableQuery>;

/// Runs on the final record set.
pub type TransformCallback = Box<dyn FnOnce(Vec<Record>) -> Vec<Record>>;

/// What to render and how.
///
/// ```
/// use inertia_table::{SemanticType, TableOptions};
///
/// let options = TableOptions::new()
///     .columns(["id", "title"])
///     .typed_column("status", SemanticType::Enum)
///     .filterable(["title"])
///     .alias("title", "Title")
///     .attach("can_create", true);
/// assert!(options.paginates());
/// ```
pub struct TableOptions {
    pub(crate) columns: Option<Vec<RequestedColumn>>,
    pub(crate) filterable: Option<Vec<String>>,
    pub(crate) route: Option<Vec<String>>,
    pub(crate) view: Option<String>,
    pub(crate) paginate: bool,
    pub(crate) aliases: Vec<(String, String)>,
    pub(crate) attach: serde_json::Map<String, serde_json::Value>,
    pub(crate) query: Option<QueryCallback>,
    pub(crate) transform: Option<TransformCallback>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            columns: None,
            filterable: None,
            route: None,
            view: None,
            paginate: true,
            aliases: Vec::new(),
            attach: serde_json::Map::new(),
            query: None,
            transform: None,
        }
    }
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render these columns, in this order, with inferred types.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns
            .get_or_insert_with(Vec::new)
            .extend(columns.into_iter().map(RequestedColumn::named));
        self
    }

    /// Render a column with a caller-supplied type.
    pub fn typed_column(mut self, column: impl Into<String>, semantic: SemanticType) -> Self {
        self.columns
            .get_or_insert_with(Vec::new)
            .push(RequestedColumn::typed(column, semantic));
        self
    }

    /// Columns searched by the `search` parameter. Defaults to every rendered column.
    pub fn filterable<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filterable = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Route identity sent to the front end, e.g. `["admin.posts", "post"]`.
    pub fn route<I, S>(mut self, route: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route = Some(route.into_iter().map(Into::into).collect());
        self
    }

    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    pub fn paginate(mut self, paginate: bool) -> Self {
        self.paginate = paginate;
        self
    }

    pub fn paginates(&self) -> bool {
        self.paginate
    }

    /// Display name of a column.
    pub fn alias(mut self, column: impl Into<String>, alias: impl Into<String>) -> Self {
        self.aliases.push((column.into(), alias.into()));
        self
    }

    /// Extra top-level payload field.
    pub fn attach(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attach.insert(key.into(), value.into());
        self
    }

    pub fn query<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(TableQuery) -> TableQuery + 'static,
    {
        self.query = Some(Box::new(callback));
        self
    }

    pub fn transform<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(Vec<Record>) -> Vec<Record> + 'static,
    {
        self.transform = Some(Box::new(callback));
        self
    }

    pub(crate) fn alias_for(&self, column: &str) -> Option<&str> {
        self.aliases
            .iter()
            .rev()
            .find(|(name, _)| name == column)
            .map(|(_, alias)| alias.as_str())
    }
}
