//! Arena-backed mount tree.
//!
//! # Responsibilities
//! - Own every declared route node
//! - Bind each node's own segment exactly once
//! - Walk a node's ancestors to produce its context path
//!
//! # Design Decisions
//! - Parents are indices, never owning references
//! - A parent is always created before its children, so walks terminate
//! - Methods are recorded for introspection only

use std::fmt;
use std::str::FromStr;

use http::Method;

use crate::error::{RouteError, RouteResult};
use crate::routing::normalize::compose;

/// Index of a node in a [`MountTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(usize);

impl RouteId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What the binding call declared the segment for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodFilter {
    /// Every method.
    All,
    /// A sub-router mounted under the segment.
    Mount,
    Method(Method),
}

impl FromStr for MethodFilter {
    type Err = RouteError;

    /// `ALL` / `*` and `USE` map to the pseudo filters; anything else must be
    /// a valid HTTP method token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "ALL" | "*" => Ok(MethodFilter::All),
            "USE" => Ok(MethodFilter::Mount),
            _ => Method::from_bytes(upper.as_bytes())
                .map(MethodFilter::Method)
                .map_err(|_| {
                    RouteError::invalid("method", format!("{:?} is not an HTTP method", s))
                }),
        }
    }
}

impl fmt::Display for MethodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodFilter::All => f.write_str("ALL"),
            MethodFilter::Mount => f.write_str("USE"),
            MethodFilter::Method(method) => f.write_str(method.as_str()),
        }
    }
}

/// A route in the mount tree.
#[derive(Debug, Clone)]
pub struct RouteNode {
    id: RouteId,
    name: Option<String>,
    segment: Option<String>,
    method: Option<MethodFilter>,
    parent: Option<RouteId>,
}

impl RouteNode {
    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn segment(&self) -> Option<&str> {
        self.segment.as_deref()
    }

    pub fn method(&self) -> Option<&MethodFilter> {
        self.method.as_ref()
    }

    pub fn parent(&self) -> Option<RouteId> {
        self.parent
    }

    /// Name used in error messages; anonymous routes show their index.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", self.id.0),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MountTree {
    nodes: Vec<RouteNode>,
}

impl MountTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unbound node under `parent` (or as a root).
    pub fn add(&mut self, parent: Option<RouteId>, name: Option<String>) -> RouteResult<RouteId> {
        if let Some(parent) = parent {
            self.node(parent)?;
        }
        let id = RouteId(self.nodes.len());
        self.nodes.push(RouteNode {
            id,
            name,
            segment: None,
            method: None,
            parent,
        });
        Ok(id)
    }

    /// Id the next [`add`](Self::add) will hand out.
    pub(crate) fn next_id(&self) -> RouteId {
        RouteId(self.nodes.len())
    }

    pub fn get(&self, id: RouteId) -> Option<&RouteNode> {
        self.nodes.get(id.0)
    }

    fn node(&self, id: RouteId) -> RouteResult<&RouteNode> {
        self.get(id)
            .ok_or_else(|| RouteError::UnknownRoute(format!("#{}", id.0)))
    }

    /// Bind the node's own segment. A second bind fails.
    pub fn bind(
        &mut self,
        id: RouteId,
        method: MethodFilter,
        segment: impl Into<String>,
    ) -> RouteResult<()> {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or_else(|| RouteError::UnknownRoute(format!("#{}", id.0)))?;

        if let Some(existing) = &node.segment {
            return Err(RouteError::AlreadyBound {
                route: node.label(),
                existing: existing.clone(),
            });
        }

        node.segment = Some(segment.into());
        node.method = Some(method);
        tracing::debug!(
            route = %node.label(),
            method = ?node.method,
            segment = ?node.segment,
            "Bound route segment"
        );
        Ok(())
    }

    /// Root-first segments of `id` and all its ancestors.
    pub fn context_path(&self, id: RouteId) -> RouteResult<Vec<String>> {
        let node = self.node(id)?;
        let segment = node.segment.clone().ok_or_else(|| RouteError::UnboundPath {
            route: node.label(),
        })?;

        let mut path = match node.parent {
            Some(parent) => self.context_path(parent)?,
            None => Vec::new(),
        };
        path.push(segment);
        Ok(path)
    }

    /// Normalized full path template of `id`.
    pub fn full_path(&self, id: RouteId) -> RouteResult<String> {
        Ok(compose(&self.context_path(id)?))
    }

    /// Nodes still waiting for a segment, in declaration order.
    pub fn unbound(&self) -> impl Iterator<Item = &RouteNode> {
        self.nodes.iter().filter(|n| n.segment.is_none())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (MountTree, RouteId) {
        let mut tree = MountTree::new();
        let root = tree.add(None, None).unwrap();
        tree.bind(root, MethodFilter::Mount, "/api").unwrap();
        let mid = tree.add(Some(root), None).unwrap();
        tree.bind(mid, MethodFilter::Mount, "/v1/").unwrap();
        let leaf = tree.add(Some(mid), Some("leaf".into())).unwrap();
        tree.bind(leaf, MethodFilter::Method(Method::GET), "/users/:id").unwrap();
        (tree, leaf)
    }

    #[test]
    fn test_context_path_is_root_first() {
        let (tree, leaf) = chain();
        assert_eq!(tree.context_path(leaf).unwrap(), vec!["/api", "/v1/", "/users/:id"]);
        assert_eq!(tree.full_path(leaf).unwrap(), "api/v1/users/:id");
    }

    #[test]
    fn test_unbound_ancestor_fails() {
        let mut tree = MountTree::new();
        let root = tree.add(None, Some("admin".into())).unwrap();
        let leaf = tree.add(Some(root), Some("dashboard".into())).unwrap();
        tree.bind(leaf, MethodFilter::All, "/dashboard").unwrap();

        let err = tree.context_path(leaf).unwrap_err();
        assert_eq!(err, RouteError::UnboundPath { route: "admin".into() });
        assert_eq!(tree.unbound().count(), 1);
    }

    #[test]
    fn test_bind_twice_fails() {
        let (mut tree, leaf) = chain();
        let err = tree.bind(leaf, MethodFilter::All, "/other").unwrap_err();
        assert_eq!(
            err,
            RouteError::AlreadyBound {
                route: "leaf".into(),
                existing: "/users/:id".into()
            }
        );
    }

    #[test]
    fn test_records_method() {
        let (tree, leaf) = chain();
        let node = tree.get(leaf).unwrap();
        assert_eq!(node.method(), Some(&MethodFilter::Method(Method::GET)));
        assert_eq!(node.method().unwrap().to_string(), "GET");
    }

    #[test]
    fn test_parse_method_filter() {
        assert_eq!("get".parse::<MethodFilter>().unwrap(), MethodFilter::Method(Method::GET));
        assert_eq!("*".parse::<MethodFilter>().unwrap(), MethodFilter::All);
        assert_eq!("use".parse::<MethodFilter>().unwrap(), MethodFilter::Mount);
        assert!("GE T".parse::<MethodFilter>().is_err());
    }

    #[test]
    fn test_anonymous_label() {
        let mut tree = MountTree::new();
        let id = tree.add(None, None).unwrap();
        assert_eq!(tree.get(id).unwrap().label(), "#0");
    }
}
