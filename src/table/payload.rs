//! Outbound payload shapes.
//!
//! Serialised form:
//!
//! ```text
//! { ...attach, table: { model, route, filters, order, types, enums, columns, pagination, records } }
//! ```

use crate::executor::Record;
use crate::query::Page;
use crate::request::{FilterState, OrderState, TableRequest};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Payload handed to the view layer.
///
/// Attachments are flattened to the top level; a caller attachment named `table`
/// is shadowed by the table data.
#[derive(Debug, Clone)]
pub struct TablePayload {
    pub attach: JsonMap,
    pub table: TableData,
}

impl TablePayload {
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl Serialize for TablePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let attached = self.attach.iter().filter(|(key, _)| key.as_str() != "table");
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in attached {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("table", &self.table)?;
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableData {
    /// `[plural, singular]` model names.
    pub model: [String; 2],
    pub route: Vec<String>,
    pub filters: FilterState,
    pub order: OrderState,
    /// Column name to semantic type, in column order.
    pub types: JsonMap,
    /// Enum column name to permitted values.
    pub enums: JsonMap,
    /// Column name to display alias (`null` when unset).
    pub columns: JsonMap,
    pub pagination: PaginationState,
    pub records: Vec<Record>,
}

/// `{active: false}` or `{active: true, ...PageMeta}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationState {
    pub active: bool,
    #[serde(flatten)]
    pub page: Option<PageMeta>,
}

impl PaginationState {
    pub fn inactive() -> Self {
        Self {
            active: false,
            page: None,
        }
    }

    pub fn active(meta: PageMeta) -> Self {
        Self {
            active: true,
            page: Some(meta),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page_size: u64,
    pub current_page: u64,
    pub last_page: u64,
    pub total: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub available_page_sizes: Vec<u64>,
    pub links: PageLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl PageMeta {
    /// Describe `page`, linking through `request` with the page number in `parameter`.
    pub fn describe(
        page: &Page,
        request: &TableRequest,
        parameter: &str,
        available_page_sizes: &[u64],
    ) -> Self {
        let last_page = page.last_page();
        let link = |n: u64| request.url_for_page(parameter, n);
        Self {
            page_size: page.page_size,
            current_page: page.current_page,
            last_page,
            total: page.total,
            from: page.from(),
            to: page.to(),
            available_page_sizes: available_page_sizes.to_vec(),
            links: PageLinks {
                first: link(1),
                last: link(last_page),
                prev: (page.current_page > 1).then(|| link(page.current_page - 1)),
                next: (page.current_page < last_page).then(|| link(page.current_page + 1)),
            },
        }
    }
}
