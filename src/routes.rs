//! Conventional resource routes for table screens.
//!
//! A resource name expands to seven endpoints (index, create, store, edit,
//! update, destroy, restore) bound to `Controller@action` handlers. The host
//! framework registers the resulting [`RouteDef`]s however it likes.

use crate::inflect;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RouteMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMethod::Get => "GET",
            RouteMethod::Post => "POST",
            RouteMethod::Put => "PUT",
            RouteMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDef {
    pub method: RouteMethod,
    pub path: String,
    pub name: String,
    pub handler: String,
    pub middleware: Vec<String>,
}

/// Builder for a resource's seven routes.
///
/// ```
/// use inertia_table::routes::{ResourceRoutes, RouteMethod};
///
/// let routes = ResourceRoutes::new("Posts").prefix("admin").build();
/// assert_eq!(routes[0].method, RouteMethod::Get);
/// assert_eq!(routes[0].path, "/admin/posts");
/// assert_eq!(routes[0].name, "admin.posts");
/// assert_eq!(routes[0].handler, "PostsController@index");
/// assert_eq!(routes[3].path, "/admin/posts/{post}/edit");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRoutes {
    name: String,
    prefix: Option<String>,
    singular: Option<String>,
    controller: Option<String>,
    index: String,
    create: String,
    store: String,
    edit: String,
    update: String,
    destroy: String,
    restore: String,
}

impl ResourceRoutes {
    /// Routes for resource `name`; the name is lowercased.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().to_lowercase(),
            prefix: None,
            singular: None,
            controller: None,
            index: "index".to_string(),
            create: "create".to_string(),
            store: "store".to_string(),
            edit: "edit".to_string(),
            update: "update".to_string(),
            destroy: "destroy".to_string(),
            restore: "restore".to_string(),
        }
    }

    /// Dot-separated prefix applied to route names and, as path segments, to paths.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Route parameter name; defaults to the singular of the resource name.
    pub fn singular(mut self, singular: impl Into<String>) -> Self {
        self.singular = Some(singular.into());
        self
    }

    /// Handler target; defaults to `<Name>Controller`.
    pub fn controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    pub fn index(mut self, action: impl Into<String>) -> Self {
        self.index = action.into();
        self
    }

    pub fn create(mut self, action: impl Into<String>) -> Self {
        self.create = action.into();
        self
    }

    pub fn store(mut self, action: impl Into<String>) -> Self {
        self.store = action.into();
        self
    }

    pub fn edit(mut self, action: impl Into<String>) -> Self {
        self.edit = action.into();
        self
    }

    pub fn update(mut self, action: impl Into<String>) -> Self {
        self.update = action.into();
        self
    }

    pub fn destroy(mut self, action: impl Into<String>) -> Self {
        self.destroy = action.into();
        self
    }

    pub fn restore(mut self, action: impl Into<String>) -> Self {
        self.restore = action.into();
        self
    }

    pub fn build(&self) -> Vec<RouteDef> {
        let route_name = match &self.prefix {
            Some(prefix) => format!("{prefix}.{}", self.name),
            None => self.name.clone(),
        };
        let base = format!("/{}", route_name.replace('.', "/"));
        let singular = self
            .singular
            .clone()
            .unwrap_or_else(|| inflect::singular(&self.name));
        let member = format!("{base}/{{{singular}}}");
        let controller = self
            .controller
            .clone()
            .unwrap_or_else(|| format!("{}Controller", inflect::ucfirst(&self.name)));

        let route = |method, path: String, name: String, action: &str| RouteDef {
            method,
            path,
            name,
            handler: format!("{controller}@{action}"),
            middleware: Vec::new(),
        };
        let named = |action: &str| format!("{route_name}.{action}");

        let mut index = route(RouteMethod::Get, base.clone(), route_name.clone(), &self.index);
        index.middleware.push("remember".to_string());

        vec![
            index,
            route(
                RouteMethod::Get,
                format!("{base}/create"),
                named(&self.create),
                &self.create,
            ),
            route(RouteMethod::Post, base.clone(), named(&self.store), &self.store),
            route(
                RouteMethod::Get,
                format!("{member}/{}", self.edit),
                named(&self.edit),
                &self.edit,
            ),
            route(RouteMethod::Put, member.clone(), named(&self.update), &self.update),
            route(
                RouteMethod::Delete,
                member.clone(),
                named(&self.destroy),
                &self.destroy,
            ),
            route(
                RouteMethod::Put,
                format!("{member}/{}", self.restore),
                named(&self.restore),
                &self.restore,
            ),
        ]
    }
}

/// Expand a resource name into its seven [`RouteDef`]s.
///
/// Options are builder calls on [`ResourceRoutes`](crate::routes::ResourceRoutes):
///
/// ```
/// use inertia_table::resource_routes;
///
/// let routes = resource_routes!("posts", controller = "Admin\\PostController", restore = "recover");
/// assert_eq!(routes.len(), 7);
/// assert_eq!(routes[6].path, "/posts/{post}/recover");
/// assert_eq!(routes[6].handler, "Admin\\PostController@recover");
/// ```
#[macro_export]
macro_rules! resource_routes {
    ($name:expr $(, $option:ident = $value:expr)* $(,)?) => {{
        let routes = $crate::routes::ResourceRoutes::new($name);
        $( let routes = routes.$option($value); )*
        routes.build()
    }};
}
