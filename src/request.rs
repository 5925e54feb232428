//! Inbound request state: search, trash filter, ordering and paging parameters.

use crate::error::{Result, TableError};
use serde::Serialize;

/// Soft-delete visibility requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trashed {
    /// Active rows only.
    #[default]
    Exclude,
    /// Active and soft-deleted rows.
    With,
    /// Soft-deleted rows only.
    Only,
}

impl Trashed {
    /// `"with"` and `"only"` select their scopes; anything else excludes trashed rows.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("with") => Trashed::With,
            Some("only") => Trashed::Only,
            _ => Trashed::Exclude,
        }
    }
}

/// Filter parameters echoed back to the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub search: Option<String>,
    pub trashed: Option<String>,
    pub query: Option<String>,
}

/// Order parameters echoed back to the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderState {
    pub order_column: Option<String>,
    pub order_direction: Option<String>,
}

/// Query parameters of the request being rendered.
///
/// Every raw pair is kept so pagination links reproduce the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRequest {
    path: String,
    pairs: Vec<(String, String)>,
}

impl TableRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            pairs: Vec::new(),
        }
    }

    /// Parse `query` (without the leading `?`) for the request at `path`.
    pub fn from_query_string(path: impl Into<String>, query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| TableError::Parse(format!("invalid query string: {e}")))?;
        Ok(Self {
            path: path.into(),
            pairs,
        })
    }

    /// Add or replace a parameter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.pairs.retain(|(k, _)| *k != key);
        self.pairs.push((key, value.into()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Non-empty search term.
    pub fn search(&self) -> Option<&str> {
        self.get("search").filter(|s| !s.is_empty())
    }

    pub fn trashed(&self) -> Trashed {
        Trashed::from_param(self.get("trashed"))
    }

    pub fn order_column(&self) -> Option<&str> {
        self.get("orderColumn").filter(|s| !s.trim().is_empty())
    }

    pub fn order_direction(&self) -> Option<&str> {
        self.get("orderDirection")
    }

    /// Requested page size; `None` when absent, unparsable or zero.
    pub fn page_size(&self) -> Option<u64> {
        self.get("pageSize")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
    }

    /// Requested page read from `parameter`, never below 1.
    pub fn page(&self, parameter: &str) -> u64 {
        self.get(parameter)
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(1)
            .max(1)
    }

    pub fn filter_state(&self) -> FilterState {
        FilterState {
            search: self.get("search").map(str::to_string),
            trashed: self.get("trashed").map(str::to_string),
            query: self.get("query").map(str::to_string),
        }
    }

    pub fn order_state(&self) -> OrderState {
        OrderState {
            order_column: self.get("orderColumn").map(str::to_string),
            order_direction: self.get("orderDirection").map(str::to_string),
        }
    }

    /// URL of this request with `parameter` set to `page`; other parameters keep their order.
    pub fn url_for_page(&self, parameter: &str, page: u64) -> String {
        let mut pairs: Vec<(&str, String)> = self
            .pairs
            .iter()
            .filter(|(k, _)| k != parameter)
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();
        pairs.push((parameter, page.to_string()));
        // Serialising owned string pairs cannot fail.
        let query = serde_urlencoded::to_string(&pairs).unwrap_or_default();
        format!("{}?{}", self.path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_string() {
        let request = TableRequest::from_query_string(
            "/posts",
            "search=hello%20world&trashed=only&orderColumn=title&orderDirection=asc&pageSize=25&page=3",
        )
        .unwrap();

        assert_eq!(request.search(), Some("hello world"));
        assert_eq!(request.trashed(), Trashed::Only);
        assert_eq!(request.order_column(), Some("title"));
        assert_eq!(request.order_direction(), Some("asc"));
        assert_eq!(request.page_size(), Some(25));
        assert_eq!(request.page("page"), 3);
    }

    #[test]
    fn test_defaults_for_missing_or_bad_values() {
        let request =
            TableRequest::from_query_string("/posts", "?search=&trashed=maybe&pageSize=zero&page=0")
                .unwrap();
        assert_eq!(request.search(), None);
        assert_eq!(request.trashed(), Trashed::Exclude);
        assert_eq!(request.page_size(), None);
        assert_eq!(request.page("page"), 1);
        assert_eq!(request.order_column(), None);
    }

    #[test]
    fn test_echo_states() {
        let request = TableRequest::new("/posts")
            .with("search", "x")
            .with("query", "raw")
            .with("orderDirection", "desc");
        assert_eq!(
            request.filter_state(),
            FilterState {
                search: Some("x".to_string()),
                trashed: None,
                query: Some("raw".to_string()),
            }
        );
        let order = serde_json::to_value(request.order_state()).unwrap();
        assert_eq!(order, serde_json::json!({"orderColumn": null, "orderDirection": "desc"}));
    }

    #[test]
    fn test_url_for_page_preserves_query() {
        let request =
            TableRequest::from_query_string("/posts", "search=a+b&page=2&pageSize=10").unwrap();
        assert_eq!(
            request.url_for_page("page", 3),
            "/posts?search=a+b&pageSize=10&page=3"
        );
    }
}
