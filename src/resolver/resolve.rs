//! Reverse resolution pipeline.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::{RouteError, RouteResult};
use crate::registry::{Registry, RouteListing};
use crate::resolver::base::{combine, BaseUrl, RequestContext};
use crate::template::PathTemplate;

/// Turns route names and parameters back into URLs.
///
/// Cheap to clone; safe to share across threads once route declaration is
/// finished.
#[derive(Debug, Clone)]
pub struct Resolver {
    registry: Arc<Registry>,
    base_url: BaseUrl,
}

impl Resolver {
    pub fn new(registry: Arc<Registry>, base_url: impl Into<BaseUrl>) -> Self {
        Self {
            registry,
            base_url: base_url.into(),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Resolve `name` with `raw` parameters into a URL.
    ///
    /// Lookup, parameter builder, path template, substitution, then the
    /// base URL. Any step's error is returned unchanged.
    pub fn resolve(
        &self,
        name: &str,
        raw: &Value,
        ctx: Option<&RequestContext>,
    ) -> RouteResult<String> {
        let entry = self.registry.lookup(name)?;
        let params = entry.params(raw)?;
        let template = entry.path()?;
        let path = PathTemplate::parse_relative(&template)?.build(&params)?;
        let base = self.base_url.evaluate(ctx);
        let url = combine(&base, &path)?;

        tracing::debug!(route = %name, template = %template, url = %url, "Resolved route");
        Ok(url)
    }

    /// Resolve with any serializable parameter object.
    pub fn resolve_with<T>(
        &self,
        name: &str,
        params: &T,
        ctx: Option<&RequestContext>,
    ) -> RouteResult<String>
    where
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_value(params)
            .map_err(|e| RouteError::invalid("<params>", e.to_string()))?;
        self.resolve(name, &raw, ctx)
    }

    /// Every registered route with its full path template.
    pub fn list_all(&self) -> RouteResult<Vec<RouteListing>> {
        self.registry.list_all()
    }

    /// A resolver bound to one request.
    pub fn scoped<'a>(&'a self, ctx: &'a RequestContext) -> ScopedResolver<'a> {
        ScopedResolver { resolver: self, ctx }
    }
}

/// Per-request view of a [`Resolver`], handed to views and redirects.
#[derive(Debug, Clone, Copy)]
pub struct ScopedResolver<'a> {
    resolver: &'a Resolver,
    ctx: &'a RequestContext,
}

impl ScopedResolver<'_> {
    pub fn resolve(&self, name: &str, raw: &Value) -> RouteResult<String> {
        self.resolver.resolve(name, raw, Some(self.ctx))
    }

    pub fn resolve_with<T>(&self, name: &str, params: &T) -> RouteResult<String>
    where
        T: Serialize + ?Sized,
    {
        self.resolver.resolve_with(name, params, Some(self.ctx))
    }

    pub fn context(&self) -> &RequestContext {
        self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ParamBuilder;
    use serde_json::json;

    fn resolver(base: impl Into<BaseUrl>) -> Resolver {
        let registry = Arc::new(Registry::new());
        registry.register("leaf", "api/v1/users/:id", None).unwrap();
        registry
            .register(
                "profile",
                "users/:id",
                Some(ParamBuilder::new(|raw| json!({ "id": raw["userId"] }))),
            )
            .unwrap();
        Resolver::new(registry, base)
    }

    #[test]
    fn test_resolve_against_fixed_base() {
        let r = resolver("http://host/");
        assert_eq!(
            r.resolve("leaf", &json!({ "id": 42 }), None).unwrap(),
            "http://host/api/v1/users/42"
        );
    }

    #[test]
    fn test_default_base_is_root() {
        let r = resolver(BaseUrl::default());
        assert_eq!(r.resolve("leaf", &json!({ "id": 1 }), None).unwrap(), "/api/v1/users/1");
    }

    #[test]
    fn test_builder_runs_before_substitution() {
        let r = resolver("/");
        assert_eq!(r.resolve("profile", &json!({ "userId": 9 }), None).unwrap(), "/users/9");

        let err = r.resolve("profile", &json!({ "id": 9 }), None).unwrap_err();
        assert_eq!(err, RouteError::MissingParameter("id".into()));
    }

    #[test]
    fn test_leading_optional_stays_under_base_path() {
        let registry = Arc::new(Registry::new());
        registry.register("about", ":lang?/about", None).unwrap();
        let r = Resolver::new(registry, "http://host/app/");

        assert_eq!(
            r.resolve("about", &json!({ "lang": "en" }), None).unwrap(),
            "http://host/app/en/about"
        );
        assert_eq!(r.resolve("about", &json!({}), None).unwrap(), "http://host/app/about");
    }

    #[test]
    fn test_unknown_route() {
        let err = resolver("/").resolve("missing", &Value::Null, None).unwrap_err();
        assert_eq!(err, RouteError::UnknownRoute("missing".into()));
    }

    #[test]
    fn test_resolve_with_struct() {
        #[derive(Serialize)]
        struct User {
            id: u32,
        }
        let r = resolver("/");
        assert_eq!(r.resolve_with("leaf", &User { id: 5 }, None).unwrap(), "/api/v1/users/5");
    }

    #[test]
    fn test_scoped_uses_request_host() {
        let r = resolver(BaseUrl::from_request("/"));
        let ctx = RequestContext::new().with_host("a.example");
        let scoped = r.scoped(&ctx);
        assert_eq!(
            scoped.resolve("leaf", &json!({ "id": 3 })).unwrap(),
            "http://a.example/api/v1/users/3"
        );
    }
}
