use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;
use serde::Serialize;

/// A route as seen by the documentation layer.
///
/// `name` is the route identifier (the handler's name), `path` the host path
/// as mounted on the router, and `doc` the handler's documentation string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub name: String,
    pub path: String,
    pub doc: Option<String>,
}

impl RouteInfo {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            doc: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// The documentation string, if present and not blank.
    pub fn documentation(&self) -> Option<&str> {
        self.doc.as_deref().filter(|d| !d.trim().is_empty())
    }
}

/// Shared, enumerable mapping from route name to [`RouteInfo`].
///
/// Cloning the table yields another handle to the same routes, so routes
/// registered after the application is built are visible to every holder.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    inner: Arc<RwLock<IndexMap<String, RouteInfo>>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. A name registered twice replaces the earlier entry.
    pub fn register(&self, route: RouteInfo) {
        let mut routes = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        routes.insert(route.name.clone(), route);
    }

    /// Look up a route by name.
    pub fn get(&self, name: &str) -> Option<RouteInfo> {
        let routes = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        routes.get(name).cloned()
    }

    /// Copy of every registered route, in registration order.
    pub fn snapshot(&self) -> Vec<RouteInfo> {
        let routes = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        routes.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_doc_is_not_documentation() {
        assert!(RouteInfo::new("a", "/a").documentation().is_none());
        assert!(RouteInfo::new("a", "/a").with_doc("  \n ").documentation().is_none());
        assert_eq!(RouteInfo::new("a", "/a").with_doc("Hi").documentation(), Some("Hi"));
    }

    #[test]
    fn clones_share_routes() {
        let table = RouteTable::new();
        let other = table.clone();
        table.register(RouteInfo::new("list_users", "/users"));
        assert_eq!(other.len(), 1);
        assert_eq!(other.get("list_users").unwrap().path, "/users");
    }

    #[test]
    fn same_name_replaces_entry() {
        let table = RouteTable::new();
        table.register(RouteInfo::new("index", "/"));
        table.register(RouteInfo::new("other", "/other"));
        table.register(RouteInfo::new("index", "/home"));

        let routes = table.snapshot();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].name, "index");
        assert_eq!(routes[0].path, "/home");
    }
}
