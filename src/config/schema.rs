//! Configuration schema definitions.
//!
//! This module defines the configuration structure for a route table.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::resolver::BaseUrl;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReverseConfig {
    /// Base every resolved path is combined with (default "/").
    pub base_url: String,

    /// Derive the base from the request's scheme and host when known,
    /// falling back to `base_url`.
    pub base_from_request: bool,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Top-level mounts and routes.
    pub routes: Vec<RouteConfig>,
}

impl Default for ReverseConfig {
    fn default() -> Self {
        Self {
            base_url: "/".to_string(),
            base_from_request: false,
            observability: ObservabilityConfig::default(),
            routes: Vec::new(),
        }
    }
}

impl ReverseConfig {
    /// The base URL this configuration describes.
    pub fn base(&self) -> BaseUrl {
        if self.base_from_request {
            BaseUrl::from_request(self.base_url.clone())
        } else {
            BaseUrl::Fixed(self.base_url.clone())
        }
    }
}

/// A route declaration. Entries with children mount them under `path`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Name used for reverse resolution; anonymous when absent.
    #[serde(default)]
    pub name: Option<String>,

    /// Own path segment (e.g. "/users/:id").
    #[serde(default)]
    pub path: Option<String>,

    /// HTTP method, "ALL" or "USE". Defaults to "ALL" for leaves and
    /// "USE" for mounts.
    #[serde(default)]
    pub method: Option<String>,

    /// Nested routes.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

impl RouteConfig {
    pub fn is_mount(&self) -> bool {
        !self.routes.is_empty()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
