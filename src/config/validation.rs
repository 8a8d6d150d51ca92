//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Unique, non-empty route names
//! - Valid methods, path templates and base URL
//! - Every route carries a path
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ReverseConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is turned into a route table

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{ReverseConfig, RouteConfig};
use crate::resolver::combine;
use crate::routing::MethodFilter;
use crate::template::compile;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("base_url {base:?} is invalid: {reason}")]
    InvalidBaseUrl { base: String, reason: String },

    #[error("{location}: route name must not be empty")]
    EmptyName { location: String },

    #[error("{location}: route name \"{name}\" is already used")]
    DuplicateName { location: String, name: String },

    #[error("{location}: invalid method {method:?}")]
    InvalidMethod { location: String, method: String },

    #[error("{location}: {reason}")]
    InvalidTemplate { location: String, reason: String },

    #[error("{location}: route has no path")]
    MissingPath { location: String },
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ReverseConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = combine(&config.base_url, "") {
        errors.push(ValidationError::InvalidBaseUrl {
            base: config.base_url.clone(),
            reason: e.to_string(),
        });
    }

    let mut names = HashSet::new();
    for (i, route) in config.routes.iter().enumerate() {
        validate_route(route, format!("routes[{}]", i), &mut names, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(
    route: &RouteConfig,
    location: String,
    names: &mut HashSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    match route.name.as_deref() {
        Some("") => errors.push(ValidationError::EmptyName {
            location: location.clone(),
        }),
        Some(name) if !names.insert(name.to_string()) => {
            errors.push(ValidationError::DuplicateName {
                location: location.clone(),
                name: name.to_string(),
            })
        }
        _ => {}
    }

    if let Some(method) = &route.method {
        if method.parse::<MethodFilter>().is_err() {
            errors.push(ValidationError::InvalidMethod {
                location: location.clone(),
                method: method.clone(),
            });
        }
    }

    match &route.path {
        None => errors.push(ValidationError::MissingPath {
            location: location.clone(),
        }),
        Some(path) => {
            if let Err(e) = compile(path) {
                errors.push(ValidationError::InvalidTemplate {
                    location: location.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    for (i, nested) in route.routes.iter().enumerate() {
        validate_route(nested, format!("{}.routes[{}]", location, i), names, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(name: Option<&str>, path: Option<&str>) -> RouteConfig {
        RouteConfig {
            name: name.map(str::to_string),
            path: path.map(str::to_string),
            ..RouteConfig::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let mut config = ReverseConfig::default();
        config.routes.push(route(Some("home"), Some("/")));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ReverseConfig::default();
        config.base_url = "mailto:x".into();
        let mut api = route(None, Some("/api"));
        api.routes.push(route(Some("item"), Some("/items/:")));
        api.routes.push(route(Some("item"), None));
        api.routes.push(RouteConfig {
            method: Some("NOT A METHOD".into()),
            ..route(Some(""), Some("/x"))
        });
        config.routes.push(api);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6, "{errors:?}");
        assert!(matches!(errors[0], ValidationError::InvalidBaseUrl { .. }));
        assert!(errors.contains(&ValidationError::DuplicateName {
            location: "routes[0].routes[1]".into(),
            name: "item".into(),
        }));
        assert!(errors.contains(&ValidationError::MissingPath {
            location: "routes[0].routes[1]".into(),
        }));
    }
}
