//! Registry entry types.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::RouteResult;
use crate::template::Params;

type DeferredFn = dyn Fn() -> RouteResult<String> + Send + Sync;
type BuilderFn = dyn Fn(&Value) -> RouteResult<Value> + Send + Sync;

/// Where a route's full path template comes from.
#[derive(Clone)]
pub enum PathSource {
    /// A template known up front.
    Fixed(String),
    /// A template computed on demand, once the mount chain is complete.
    Deferred(Arc<DeferredFn>),
}

impl PathSource {
    pub fn deferred<F>(provider: F) -> Self
    where
        F: Fn() -> RouteResult<String> + Send + Sync + 'static,
    {
        PathSource::Deferred(Arc::new(provider))
    }

    /// Evaluate the template.
    pub fn path(&self) -> RouteResult<String> {
        match self {
            PathSource::Fixed(path) => Ok(path.clone()),
            PathSource::Deferred(provider) => provider(),
        }
    }
}

impl From<String> for PathSource {
    fn from(path: String) -> Self {
        PathSource::Fixed(path)
    }
}

impl From<&str> for PathSource {
    fn from(path: &str) -> Self {
        PathSource::Fixed(path.to_string())
    }
}

impl fmt::Debug for PathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSource::Fixed(path) => f.debug_tuple("Fixed").field(path).finish(),
            PathSource::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Maps the parameters a caller passes to the ones the template needs.
///
/// Defaults to the identity.
#[derive(Clone)]
pub struct ParamBuilder(Arc<BuilderFn>);

impl ParamBuilder {
    pub fn new<F>(builder: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(move |raw: &Value| -> RouteResult<Value> { Ok(builder(raw)) }))
    }

    /// A builder that can reject its input.
    pub fn try_new<F>(builder: F) -> Self
    where
        F: Fn(&Value) -> RouteResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(builder))
    }

    pub fn identity() -> Self {
        Self::new(Value::clone)
    }

    pub fn apply(&self, raw: &Value) -> RouteResult<Value> {
        (self.0)(raw)
    }
}

impl Default for ParamBuilder {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for ParamBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ParamBuilder(..)")
    }
}

/// A named route as stored in the registry.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    name: String,
    path: PathSource,
    builder: ParamBuilder,
}

impl RouteEntry {
    pub(crate) fn new(name: String, path: PathSource, builder: ParamBuilder) -> Self {
        Self { name, path, builder }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &PathSource {
        &self.path
    }

    pub fn builder(&self) -> &ParamBuilder {
        &self.builder
    }

    /// Full path template of the route.
    pub fn path(&self) -> RouteResult<String> {
        self.path.path()
    }

    /// Run the parameter builder and flatten its output.
    pub fn params(&self, raw: &Value) -> RouteResult<Params> {
        Params::from_value(&self.builder.apply(raw)?)
    }
}

/// One row of the route table dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteListing {
    pub name: String,
    pub path: String,
}
