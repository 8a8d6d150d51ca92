//! Error definitions shared by the registry, the mount tree and the resolver.

use thiserror::Error;

/// Errors raised while declaring routes or resolving them back into URLs.
///
/// Every variant describes a configuration mistake made by the caller, so
/// none of them are worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A required argument was empty.
    #[error("required argument \"{0}\" missing")]
    MissingArgument(&'static str),

    /// A route with this name is already registered.
    #[error("route with name \"{0}\" already defined")]
    DuplicateName(String),

    /// No route is registered under this name.
    #[error("route with name \"{0}\" not defined")]
    UnknownRoute(String),

    /// A route in the mount chain never received a path segment.
    #[error("no path registered with route \"{route}\"")]
    UnboundPath { route: String },

    /// A path segment was bound twice on the same route.
    #[error("already a path registered with route \"{route}\": {existing}")]
    AlreadyBound { route: String, existing: String },

    /// The path template could not be parsed.
    #[error("invalid path template {template:?} at {position}: {reason}")]
    TemplateSyntax {
        template: String,
        position: usize,
        reason: String,
    },

    /// The parameter set lacks a value the template requires.
    #[error("expected parameter \"{0}\" to be defined")]
    MissingParameter(String),

    /// A supplied value does not fit the parameter it was given for.
    #[error("invalid value for parameter \"{name}\": {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The base URL cannot serve as a base for reference resolution.
    #[error("invalid base url {base:?}: {reason}")]
    InvalidBaseUrl { base: String, reason: String },
}

impl RouteError {
    pub(crate) fn syntax(template: &str, position: usize, reason: impl Into<String>) -> Self {
        RouteError::TemplateSyntax {
            template: template.to_string(),
            position,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        RouteError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for route declaration and resolution.
pub type RouteResult<T> = Result<T, RouteError>;
