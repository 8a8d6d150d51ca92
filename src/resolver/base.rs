//! Base URLs and reference resolution.
//!
//! # Responsibilities
//! - Hold the configured base URL (fixed, or derived from the request)
//! - Describe the request a URL is being generated for
//! - Resolve a composed path against the base (RFC 3986, via `url`)
//!
//! # Design Decisions
//! - Dynamic bases are evaluated on every call, never cached
//! - Relative bases ("/", "/app/") are resolved against a placeholder
//!   origin which is stripped again afterwards

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use url::{Position, Url};

use crate::error::{RouteError, RouteResult};

const PLACEHOLDER_ORIGIN: &str = "http://placeholder.invalid/";
const PLACEHOLDER_HOST: &str = "placeholder.invalid";

/// The request a URL is generated for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub scheme: Option<String>,
    pub host: Option<String>,
    /// Free-form values such as a tenant id.
    pub extensions: BTreeMap<String, String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    pub fn extension(&self, key: &str) -> Option<&str> {
        self.extensions.get(key).map(String::as_str)
    }

    /// `scheme://host/` when a host is known; scheme defaults to `http`.
    pub fn origin(&self) -> Option<String> {
        let host = self.host.as_deref()?;
        let scheme = self.scheme.as_deref().unwrap_or("http");
        Some(format!("{}://{}/", scheme, host))
    }
}

type DynamicFn = dyn Fn(Option<&RequestContext>) -> String + Send + Sync;

/// Base every resolved path is combined with.
#[derive(Clone)]
pub enum BaseUrl {
    Fixed(String),
    /// Computed from the request on every resolve.
    Dynamic(Arc<DynamicFn>),
}

impl BaseUrl {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(Option<&RequestContext>) -> String + Send + Sync + 'static,
    {
        BaseUrl::Dynamic(Arc::new(f))
    }

    /// Base derived from the request's origin, falling back to `fallback`.
    pub fn from_request(fallback: impl Into<String>) -> Self {
        let fallback = fallback.into();
        Self::dynamic(move |ctx| {
            ctx.and_then(RequestContext::origin)
                .unwrap_or_else(|| fallback.clone())
        })
    }

    pub fn evaluate(&self, ctx: Option<&RequestContext>) -> String {
        match self {
            BaseUrl::Fixed(base) => base.clone(),
            BaseUrl::Dynamic(f) => f(ctx),
        }
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        BaseUrl::Fixed("/".to_string())
    }
}

impl From<&str> for BaseUrl {
    fn from(base: &str) -> Self {
        BaseUrl::Fixed(base.to_string())
    }
}

impl From<String> for BaseUrl {
    fn from(base: String) -> Self {
        BaseUrl::Fixed(base)
    }
}

impl fmt::Debug for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseUrl::Fixed(base) => f.debug_tuple("Fixed").field(base).finish(),
            BaseUrl::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Resolve `path` as a reference relative to `base`.
pub fn combine(base: &str, path: &str) -> RouteResult<String> {
    if let Ok(absolute) = Url::parse(path) {
        return Ok(absolute.into());
    }

    let invalid = |reason: String| RouteError::InvalidBaseUrl {
        base: base.to_string(),
        reason,
    };

    match Url::parse(base) {
        Ok(base_url) => {
            if base_url.cannot_be_a_base() {
                return Err(invalid("cannot be a base".to_string()));
            }
            base_url
                .join(path)
                .map(String::from)
                .map_err(|e| invalid(e.to_string()))
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let placeholder = Url::parse(PLACEHOLDER_ORIGIN).map_err(|e| invalid(e.to_string()))?;
            let joined = placeholder
                .join(base)
                .and_then(|base_url| base_url.join(path))
                .map_err(|e| invalid(e.to_string()))?;

            // protocol-relative bases keep their authority
            let start = if joined.host_str() == Some(PLACEHOLDER_HOST) {
                Position::BeforePath
            } else {
                Position::AfterScheme
            };
            Ok(joined[start..].to_string())
        }
        Err(e) => Err(invalid(e.to_string())),
    }
}
