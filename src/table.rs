//! # Table Module
//!
//! Orders resolved routes into the final, immutable route table.
//!
//! [`RouteTableBuilder`] buckets routes by priority. Buckets are emitted in
//! ascending order; inside a bucket, routes keep the order they were pushed
//! in. The resulting [`RouteTable`] is never mutated. A rebuild produces a new
//! table that replaces the old one as a whole (see
//! [`hot_reload`](crate::hot_reload)).
//!
//! ```rust
//! use apirouter::spec::RouteSpec;
//! use apirouter::table::RouteTableBuilder;
//!
//! let mut builder = RouteTableBuilder::new();
//! builder.push(1, RouteSpec::new("/late"));
//! builder.push(0, RouteSpec::new("/early"));
//! let table = builder.build();
//! let paths: Vec<_> = table.iter().map(|r| r.path.as_str()).collect();
//! assert_eq!(paths, ["/early", "/late"]);
//! ```

use crate::resolver::ResolvedRoute;
use crate::spec::RouteSpec;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Collects resolved routes and groups them by priority.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    buckets: BTreeMap<i64, Vec<RouteSpec>>,
}

impl RouteTableBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `spec` to the bucket for `priority`.
    pub fn push(&mut self, priority: i64, spec: RouteSpec) {
        self.buckets.entry(priority).or_default().push(spec);
    }

    /// Append every resolved route, in order.
    pub fn extend(&mut self, routes: impl IntoIterator<Item = ResolvedRoute>) {
        for route in routes {
            self.push(route.priority, route.spec);
        }
    }

    /// Flatten the buckets into a table, lowest priority first.
    #[must_use]
    pub fn build(self) -> RouteTable {
        let routes: Vec<RouteSpec> = self.buckets.into_values().flatten().collect();
        RouteTable {
            routes: routes.into(),
        }
    }
}

/// The ordered route table handed to a dispatcher.
///
/// Cloning is cheap; every clone shares the same routes.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTable {
    routes: Arc<[RouteSpec]>,
}

impl Default for RouteTable {
    fn default() -> Self {
        RouteTable {
            routes: Arc::from(Vec::new()),
        }
    }
}

impl RouteTable {
    /// Build a table directly from a resolution pass.
    #[must_use]
    pub fn from_resolved(routes: impl IntoIterator<Item = ResolvedRoute>) -> Self {
        let mut builder = RouteTableBuilder::new();
        builder.extend(routes);
        builder.build()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RouteSpec> {
        self.routes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes not declared `disable`, in table order.
    pub fn enabled(&self) -> impl Iterator<Item = &RouteSpec> {
        self.routes.iter().filter(|route| !route.disabled)
    }

    /// Hand every enabled route to `registry` in a single batch.
    ///
    /// Returns the number of routes registered.
    pub fn register<R: RouteRegistry + ?Sized>(&self, registry: &mut R) -> usize {
        let routes: Vec<RouteSpec> = self.enabled().cloned().collect();
        let count = routes.len();

        let routes_summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|route| {
                let method = route.method.map_or("ANY", |m| m.as_str());
                format!("{method} {}", route.path)
            })
            .collect();
        info!(
            routes_count = count,
            disabled = self.len() - count,
            routes_summary = ?routes_summary,
            "Registering route table"
        );

        registry.prepend_routes(routes);
        count
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a RouteSpec;
    type IntoIter = std::slice::Iter<'a, RouteSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Dispatcher side of the table hand-off.
///
/// Routes arrive in table order and take precedence over anything the
/// dispatcher already knows.
pub trait RouteRegistry {
    fn prepend_routes(&mut self, routes: Vec<RouteSpec>);
}

impl RouteRegistry for Vec<RouteSpec> {
    fn prepend_routes(&mut self, routes: Vec<RouteSpec>) {
        self.splice(0..0, routes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(path: &str) -> RouteSpec {
        RouteSpec::new(path)
    }

    #[test]
    fn test_priority_order_is_stable() {
        let mut builder = RouteTableBuilder::new();
        builder.push(2, spec("/two"));
        builder.push(0, spec("/zero-a"));
        builder.push(1, spec("/one"));
        builder.push(0, spec("/zero-b"));

        let table = builder.build();
        let paths: Vec<_> = table.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["/zero-a", "/zero-b", "/one", "/two"]);
    }

    #[test]
    fn test_negative_priorities_sort_first() {
        let table = RouteTable::from_resolved([
            ResolvedRoute {
                priority: 0,
                spec: spec("/default"),
            },
            ResolvedRoute {
                priority: -5,
                spec: spec("/first"),
            },
        ]);
        assert_eq!(table.iter().next().map(|r| r.path.as_str()), Some("/first"));
    }

    #[test]
    fn test_empty_table() {
        let table = RouteTableBuilder::new().build();
        assert!(table.is_empty());
        assert_eq!(table, RouteTable::default());
    }

    #[test]
    fn test_register_skips_disabled_and_prepends() {
        let mut hidden = spec("/hidden");
        hidden.disabled = true;
        let mut builder = RouteTableBuilder::new();
        builder.push(0, spec("/a"));
        builder.push(0, hidden);
        builder.push(1, spec("/b"));
        let table = builder.build();

        let mut registry = vec![spec("/existing")];
        let count = table.register(&mut registry);

        assert_eq!(count, 2);
        assert_eq!(table.len(), 3);
        let paths: Vec<_> = registry.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["/a", "/b", "/existing"]);
    }

    #[test]
    fn test_clones_share_routes() {
        let mut builder = RouteTableBuilder::new();
        builder.push(0, spec("/a"));
        let table = builder.build();
        let copy = table.clone();
        assert!(Arc::ptr_eq(&table.routes, &copy.routes));
    }
}
