//! Route declaration and table finalization.
//!
//! # Responsibilities
//! - Hand out nested `Router` scopes and `Route` handles
//! - Publish named routes into the registry as deferred paths
//! - Freeze a fully bound table into a `Resolver`
//!
//! # Design Decisions
//! - Scopes are explicit values; nothing is patched onto shared types
//! - A route's segment is bound after it is declared, so paths stay
//!   deferred until the whole chain exists
//! - `finalize` turns "unbound path" into a build-time error

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use http::Method;

use crate::config::RouteConfig;
use crate::error::{RouteError, RouteResult};
use crate::registry::{ParamBuilder, PathSource, Registry};
use crate::resolver::{BaseUrl, Resolver};
use crate::routing::tree::{MethodFilter, MountTree, RouteId};

type SharedTree = Arc<RwLock<MountTree>>;

fn read(tree: &SharedTree) -> RwLockReadGuard<'_, MountTree> {
    tree.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(tree: &SharedTree) -> RwLockWriteGuard<'_, MountTree> {
    tree.write().unwrap_or_else(PoisonError::into_inner)
}

/// A mount tree together with the registry its named routes publish to.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    tree: SharedTree,
    registry: Arc<Registry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish named routes into an existing registry.
    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self {
            tree: SharedTree::default(),
            registry,
        }
    }

    /// Build a table from configuration.
    ///
    /// Expects a config that passed `validate_config`. Given an unvalidated
    /// one, routes without a path are declared but left unbound, which
    /// `finalize` then reports.
    pub fn from_config(routes: &[RouteConfig]) -> RouteResult<Self> {
        let table = Self::new();
        let root = table.router();
        for route in routes {
            declare(&root, route)?;
        }
        Ok(table)
    }

    /// The top-level scope.
    pub fn router(&self) -> Router {
        Router {
            tree: self.tree.clone(),
            registry: self.registry.clone(),
            mount: None,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Copy of the current mount tree.
    pub fn snapshot(&self) -> MountTree {
        read(&self.tree).clone()
    }

    /// A resolver over the live, still-deferred paths.
    pub fn resolver(&self, base_url: impl Into<BaseUrl>) -> Resolver {
        Resolver::new(self.registry.clone(), base_url)
    }

    /// Validate the table and compose every named path once.
    ///
    /// Every unbound route is logged; the first one in declaration order is
    /// returned as the error.
    pub fn finalize(&self, base_url: impl Into<BaseUrl>) -> RouteResult<Resolver> {
        let node_count = {
            let tree = read(&self.tree);
            let unbound: Vec<String> = tree.unbound().map(|node| node.label()).collect();
            for route in &unbound {
                tracing::warn!(route = %route, "Route has no path");
            }
            if let Some(route) = unbound.into_iter().next() {
                return Err(RouteError::UnboundPath { route });
            }
            tree.len()
        };

        let frozen = Registry::new();
        for entry in self.registry.entries() {
            frozen.register(entry.name(), entry.path()?, Some(entry.builder().clone()))?;
        }

        tracing::info!(routes = frozen.len(), nodes = node_count, "Route table finalized");
        Ok(Resolver::new(Arc::new(frozen), base_url))
    }
}

fn declare(scope: &Router, config: &RouteConfig) -> RouteResult<()> {
    let route = match &config.name {
        Some(name) => scope.define(name.as_str(), None)?,
        None => scope.route()?,
    };

    if let Some(path) = &config.path {
        let method = match &config.method {
            Some(method) => method.parse()?,
            None if config.is_mount() => MethodFilter::Mount,
            None => MethodFilter::All,
        };
        route.bind(method, path)?;
    }

    let child = route.scope();
    for nested in &config.routes {
        declare(&child, nested)?;
    }
    Ok(())
}

/// A scope routes are declared in: the table root or a mounted route.
#[derive(Debug, Clone)]
pub struct Router {
    tree: SharedTree,
    registry: Arc<Registry>,
    mount: Option<RouteId>,
}

impl Router {
    /// Declare a named route in this scope and register it.
    ///
    /// The route's path is resolved lazily, so its segment (and those of
    /// routes mounted around it) may be bound afterwards.
    pub fn define(
        &self,
        name: impl Into<String>,
        builder: Option<ParamBuilder>,
    ) -> RouteResult<Route> {
        let name = name.into();
        let mut tree = write(&self.tree);
        let id = tree.next_id();

        let provider_tree = self.tree.clone();
        let provider = PathSource::deferred(move || read(&provider_tree).full_path(id));
        self.registry.register(name.clone(), provider, builder)?;

        let added = tree.add(self.mount, Some(name))?;
        debug_assert_eq!(added, id);
        Ok(self.handle(id))
    }

    /// Declare an anonymous route, unreachable by name.
    pub fn route(&self) -> RouteResult<Route> {
        let id = write(&self.tree).add(self.mount, None)?;
        Ok(self.handle(id))
    }

    /// The route this scope is mounted under, if any.
    pub fn mount_point(&self) -> Option<RouteId> {
        self.mount
    }

    fn handle(&self, id: RouteId) -> Route {
        Route {
            tree: self.tree.clone(),
            registry: self.registry.clone(),
            id,
        }
    }
}

/// Handle to a declared route, used to bind its segment.
#[derive(Debug, Clone)]
pub struct Route {
    tree: SharedTree,
    registry: Arc<Registry>,
    id: RouteId,
}

impl Route {
    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn name(&self) -> Option<String> {
        read(&self.tree).get(self.id).and_then(|n| n.name().map(str::to_string))
    }

    /// Bind this route's own segment. Only the first bind succeeds.
    pub fn bind(&self, method: MethodFilter, path: &str) -> RouteResult<&Self> {
        write(&self.tree).bind(self.id, method, path)?;
        Ok(self)
    }

    pub fn get(&self, path: &str) -> RouteResult<&Self> {
        self.bind(MethodFilter::Method(Method::GET), path)
    }

    pub fn post(&self, path: &str) -> RouteResult<&Self> {
        self.bind(MethodFilter::Method(Method::POST), path)
    }

    pub fn put(&self, path: &str) -> RouteResult<&Self> {
        self.bind(MethodFilter::Method(Method::PUT), path)
    }

    pub fn patch(&self, path: &str) -> RouteResult<&Self> {
        self.bind(MethodFilter::Method(Method::PATCH), path)
    }

    pub fn delete(&self, path: &str) -> RouteResult<&Self> {
        self.bind(MethodFilter::Method(Method::DELETE), path)
    }

    pub fn all(&self, path: &str) -> RouteResult<&Self> {
        self.bind(MethodFilter::All, path)
    }

    /// Bind `path` as a mount point and return the scope beneath it.
    pub fn mount(&self, path: &str) -> RouteResult<Router> {
        self.bind(MethodFilter::Mount, path)?;
        Ok(self.scope())
    }

    /// The scope beneath this route, without binding a segment.
    pub fn scope(&self) -> Router {
        Router {
            tree: self.tree.clone(),
            registry: self.registry.clone(),
            mount: Some(self.id),
        }
    }

    pub fn context_path(&self) -> RouteResult<Vec<String>> {
        read(&self.tree).context_path(self.id)
    }

    pub fn full_path(&self) -> RouteResult<String> {
        read(&self.tree).full_path(self.id)
    }
}
