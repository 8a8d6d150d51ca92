//! The named-route registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{RouteError, RouteResult};
use crate::registry::entry::{ParamBuilder, PathSource, RouteEntry, RouteListing};

/// Name → route map with unique names and registration-order listing.
///
/// Written while routes are declared, read-only afterwards. Shared as
/// `Arc<Registry>`; every method takes `&self`.
#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    entries: Vec<Arc<RouteEntry>>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route under `name`.
    ///
    /// Fails on an empty name or a name already in use; an existing entry
    /// is never replaced. `builder` defaults to the identity.
    pub fn register(
        &self,
        name: impl Into<String>,
        path: impl Into<PathSource>,
        builder: Option<ParamBuilder>,
    ) -> RouteResult<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(RouteError::MissingArgument("name"));
        }

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.index.contains_key(&name) {
            tracing::warn!(route = %name, "Rejected duplicate route name");
            return Err(RouteError::DuplicateName(name));
        }

        let entry = RouteEntry::new(name.clone(), path.into(), builder.unwrap_or_default());
        tracing::debug!(route = %name, source = ?entry.source(), "Registered route");

        let position = inner.entries.len();
        inner.entries.push(Arc::new(entry));
        inner.index.insert(name, position);
        Ok(())
    }

    /// Look up a route by name.
    pub fn lookup(&self, name: &str) -> RouteResult<Arc<RouteEntry>> {
        if name.is_empty() {
            return Err(RouteError::MissingArgument("name"));
        }
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .index
            .get(name)
            .and_then(|&i| inner.entries.get(i).cloned())
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))
    }

    /// Evaluate every route's path, in registration order.
    ///
    /// The first provider that fails aborts the listing with its error.
    pub fn list_all(&self) -> RouteResult<Vec<RouteListing>> {
        self.entries()
            .iter()
            .map(|entry| {
                Ok(RouteListing {
                    name: entry.name().to_string(),
                    path: entry.path()?,
                })
            })
            .collect()
    }

    /// Snapshot of the entries in registration order.
    pub fn entries(&self) -> Vec<Arc<RouteEntry>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries().iter().map(|e| e.name().to_string()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .index
            .contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("routes", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let registry = Registry::new();
        registry.register("home", "", None).unwrap();
        registry.register("user", "users/:id", None).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("user"));
        assert_eq!(registry.lookup("user").unwrap().path().unwrap(), "users/:id");
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let registry = Registry::new();
        registry.register("user", "users/:id", None).unwrap();

        let err = registry.register("user", "people/:id", None).unwrap_err();
        assert_eq!(err, RouteError::DuplicateName("user".into()));
        // first entry untouched
        assert_eq!(registry.lookup("user").unwrap().path().unwrap(), "users/:id");
    }

    #[test]
    fn test_missing_and_unknown_names() {
        let registry = Registry::new();
        assert_eq!(
            registry.register("", "x", None).unwrap_err(),
            RouteError::MissingArgument("name")
        );
        assert_eq!(
            registry.lookup("nope").unwrap_err(),
            RouteError::UnknownRoute("nope".into())
        );
    }

    #[test]
    fn test_list_all_preserves_registration_order() {
        let registry = Registry::new();
        for name in ["c", "a", "b"] {
            registry.register(name, format!("{name}/:id"), None).unwrap();
        }
        let names: Vec<_> = registry.list_all().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_list_all_aborts_on_failing_provider() {
        let registry = Registry::new();
        registry.register("ok", "ok", None).unwrap();
        registry
            .register(
                "broken",
                PathSource::deferred(|| Err(RouteError::UnboundPath { route: "broken".into() })),
                None,
            )
            .unwrap();

        let err = registry.list_all().unwrap_err();
        assert_eq!(err, RouteError::UnboundPath { route: "broken".into() });
    }
}
