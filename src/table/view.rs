//! View naming and rendering.

use crate::error::Result;
use serde::Serialize;

/// Component name for a model's table view.
///
/// No view gives `<Plural>/Index`; a view containing `/` is used verbatim; any
/// other view is namespaced under the plural model name.
pub fn view_name(plural: &str, view: Option<&str>) -> String {
    match view {
        None => format!("{plural}/Index"),
        Some(view) if view.contains('/') => view.to_string(),
        Some(view) => format!("{plural}/{view}"),
    }
}

/// Turns a view identifier and its payload into a response.
pub trait ViewRenderer {
    type Output;

    fn render(&self, view: &str, props: serde_json::Value) -> Result<Self::Output>;
}

/// Inertia page object: `{component, props, url, version}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageObject {
    pub component: String,
    pub props: serde_json::Value,
    pub url: String,
    pub version: Option<String>,
}

/// Renders Inertia page objects for the request at `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InertiaPage {
    url: String,
    version: Option<String>,
}

impl InertiaPage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            version: None,
        }
    }

    /// Asset version used by the client to detect stale bundles.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

impl ViewRenderer for InertiaPage {
    type Output = PageObject;

    fn render(&self, view: &str, props: serde_json::Value) -> Result<PageObject> {
        Ok(PageObject {
            component: view.to_string(),
            props,
            url: self.url.clone(),
            version: self.version.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_view_name() {
        assert_eq!(view_name("Comments", None), "Comments/Index");
        assert_eq!(view_name("Comments", Some("Admin/List")), "Admin/List");
        assert_eq!(view_name("Comments", Some("List")), "Comments/List");
    }

    #[test]
    fn test_inertia_page_object() {
        let page = InertiaPage::new("/comments?page=2")
            .version("abc123")
            .render("Comments/Index", json!({"table": {}}))
            .unwrap();
        assert_eq!(
            serde_json::to_value(page).unwrap(),
            json!({
                "component": "Comments/Index",
                "props": {"table": {}},
                "url": "/comments?page=2",
                "version": "abc123"
            })
        );
    }
}
