//! Compiled path templates and the builder that fills them in.

use std::fmt;
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

use crate::error::{RouteError, RouteResult};
use crate::template::params::{ParamValue, Params};
use crate::template::parser::{parse, Key, Token};

/// Left unescaped in parameter values, as by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Wildcard values also keep URI delimiters, except `?` and `#`.
const WILDCARD: &AsciiSet = &COMPONENT
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$');

/// A parameter key plus the anchored regex its values are checked against.
#[derive(Debug, Clone)]
pub(crate) struct CompiledKey {
    pub(crate) key: Key,
    validator: Regex,
}

#[derive(Debug, Clone)]
pub(crate) enum Segment {
    Literal(String),
    Param(CompiledKey),
}

/// A parsed path template, ready to build concrete paths.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    source: String,
    pub(crate) segments: Vec<Segment>,
    relative: bool,
}

impl PathTemplate {
    /// Parse a template and compile the per-parameter validators.
    pub fn parse(template: &str) -> RouteResult<Self> {
        let segments = parse(template)?
            .into_iter()
            .map(|token| -> RouteResult<Segment> {
                let key = match token {
                    Token::Literal(text) => return Ok(Segment::Literal(text)),
                    Token::Param(key) => key,
                };
                let validator = Regex::new(&format!("^(?:{})$", key.pattern)).map_err(|e| {
                    RouteError::syntax(
                        template,
                        0,
                        format!("invalid pattern for \"{}\": {}", key.name, e),
                    )
                })?;
                Ok(Segment::Param(CompiledKey { key, validator }))
            })
            .collect::<RouteResult<Vec<_>>>()?;

        Ok(Self {
            source: template.to_string(),
            segments,
            relative: false,
        })
    }

    /// Parse a template whose built paths are relative references.
    ///
    /// The template is parsed rooted at `/` and exactly one leading `/` is
    /// stripped from every built path. An absent optional parameter at the
    /// start therefore never leaves the path absolute.
    pub fn parse_relative(template: &str) -> RouteResult<Self> {
        let rooted = Self::parse(&format!("/{}", template)).map_err(|err| match err {
            RouteError::TemplateSyntax {
                position, reason, ..
            } => RouteError::TemplateSyntax {
                template: template.to_string(),
                position: position.saturating_sub(1),
                reason,
            },
            other => other,
        })?;

        Ok(Self {
            source: template.to_string(),
            segments: rooted.segments,
            relative: true,
        })
    }

    /// The template text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parameters in template order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(compiled) => Some(&compiled.key),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute `params` into the template.
    ///
    /// Values are percent-encoded, then checked against the parameter
    /// pattern. Missing required values are an error, never an empty string.
    pub fn build(&self, params: &Params) -> RouteResult<String> {
        let mut path = String::with_capacity(self.source.len());

        for segment in &self.segments {
            let compiled = match segment {
                Segment::Literal(text) => {
                    path.push_str(text);
                    continue;
                }
                Segment::Param(compiled) => compiled,
            };
            let key = &compiled.key;

            match params.get(&key.name) {
                None if key.is_optional() => {}
                None => return Err(RouteError::MissingParameter(key.name.clone())),
                Some(ParamValue::Single(value)) => {
                    path.push_str(&key.prefix);
                    path.push_str(&compiled.encode(value)?);
                }
                Some(ParamValue::List(_)) if !key.is_repeat() => {
                    return Err(RouteError::invalid(
                        &key.name,
                        "expected a single value, got a list",
                    ));
                }
                Some(ParamValue::List(values)) if values.is_empty() => {
                    if !key.is_optional() {
                        return Err(RouteError::invalid(&key.name, "expected at least one value"));
                    }
                }
                Some(ParamValue::List(values)) => {
                    for (i, value) in values.iter().enumerate() {
                        path.push_str(if i == 0 { &key.prefix } else { &key.delimiter });
                        path.push_str(&compiled.encode(value)?);
                    }
                }
            }
        }

        match path.strip_prefix('/') {
            Some(rest) if self.relative => Ok(rest.to_string()),
            _ => Ok(path),
        }
    }
}

impl CompiledKey {
    fn encode(&self, value: &str) -> RouteResult<String> {
        let set = if self.key.wildcard { WILDCARD } else { COMPONENT };
        let encoded = utf8_percent_encode(value, set).to_string();
        if !self.validator.is_match(&encoded) {
            return Err(RouteError::invalid(
                &self.key.name,
                format!("expected {:?} to match \"{}\"", encoded, self.key.pattern),
            ));
        }
        Ok(encoded)
    }
}

impl FromStr for PathTemplate {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(template: &str, params: Params) -> RouteResult<String> {
        PathTemplate::parse(template)?.build(&params)
    }

    #[test]
    fn test_substitutes_named_parameters() {
        let params = Params::new().with("id", "42").with("tab", "posts");
        assert_eq!(
            build("api/v1/users/:id/:tab", params).unwrap(),
            "api/v1/users/42/posts"
        );
    }

    #[test]
    fn test_missing_parameter() {
        let err = build("users/:id", Params::new()).unwrap_err();
        assert_eq!(err, RouteError::MissingParameter("id".into()));
    }

    #[test]
    fn test_empty_value_is_rejected() {
        let err = build("users/:id", Params::new().with("id", "")).unwrap_err();
        assert!(matches!(err, RouteError::InvalidParameter { .. }));
    }

    #[test]
    fn test_optional_parameter_drops_prefix() {
        assert_eq!(build("users/:id?", Params::new()).unwrap(), "users");
        assert_eq!(
            build("users/:id?", Params::new().with("id", "7")).unwrap(),
            "users/7"
        );
    }

    #[test]
    fn test_repeated_parameter() {
        let params = Params::new().with("path", vec!["a", "b", "c"]);
        assert_eq!(build("files/:path+", params).unwrap(), "files/a/b/c");
        assert_eq!(build("files/:path*", Params::new()).unwrap(), "files");

        let empty = Params::new().with("path", Vec::<String>::new());
        let err = build("files/:path+", empty).unwrap_err();
        assert!(err.to_string().contains("at least one"));

        let err = build("files/:path", Params::new().with("path", vec!["a"])).unwrap_err();
        assert!(err.to_string().contains("single value"));
    }

    #[test]
    fn test_values_are_encoded() {
        let params = Params::new().with("q", "a b/c");
        assert_eq!(build("search/:q", params).unwrap(), "search/a%20b%2Fc");
    }

    #[test]
    fn test_uri_component_characters_stay_unescaped() {
        let params = Params::new().with("slug", "it's(1)!");
        assert_eq!(build("p/:slug", params).unwrap(), "p/it's(1)!");
        assert_eq!(
            build("p/:slug", Params::new().with("slug", "~a*b")).unwrap(),
            "p/~a*b"
        );

        // validated after encoding, so the pattern sees the raw characters
        let params = Params::new().with("slug", "it's!");
        assert_eq!(build("p/:slug([a-z'!]+)", params).unwrap(), "p/it's!");
    }

    #[test]
    fn test_wildcard_keeps_slashes() {
        let params = Params::new().with("0", "docs/a b.txt");
        assert_eq!(build("files/*", params).unwrap(), "files/docs/a%20b.txt");
        assert_eq!(
            build("files/*", Params::new().with("0", "a?b#c")).unwrap(),
            "files/a%3Fb%23c"
        );
    }

    #[test]
    fn test_relative_template_with_leading_optional() {
        let template = PathTemplate::parse_relative(":lang?/about").unwrap();
        assert_eq!(template.build(&Params::new()).unwrap(), "about");
        assert_eq!(
            template.build(&Params::new().with("lang", "en")).unwrap(),
            "en/about"
        );
        assert_eq!(template.as_str(), ":lang?/about");
    }

    #[test]
    fn test_relative_template_with_leading_repeat() {
        let template = PathTemplate::parse_relative(":crumbs*/view").unwrap();
        assert_eq!(template.build(&Params::new()).unwrap(), "view");
        assert_eq!(
            template
                .build(&Params::new().with("crumbs", vec!["a", "b"]))
                .unwrap(),
            "a/b/view"
        );
    }

    #[test]
    fn test_relative_template_keeps_rooted_paths_rooted() {
        let rooted = PathTemplate::parse_relative("/health/").unwrap();
        assert_eq!(rooted.build(&Params::new()).unwrap(), "/health/");
        let empty = PathTemplate::parse_relative("").unwrap();
        assert_eq!(empty.build(&Params::new()).unwrap(), "");

        let err = PathTemplate::parse_relative("a/:").unwrap_err();
        assert_eq!(
            err,
            RouteError::TemplateSyntax {
                template: "a/:".into(),
                position: 2,
                reason: "missing parameter name".into(),
            }
        );
    }

    #[test]
    fn test_pattern_validation() {
        assert_eq!(
            build("users/:id(\\d+)", Params::new().with("id", "12")).unwrap(),
            "users/12"
        );
        let err = build("users/:id(\\d+)", Params::new().with("id", "abc")).unwrap_err();
        assert!(matches!(err, RouteError::InvalidParameter { ref name, .. } if name == "id"));
    }

    #[test]
    fn test_dot_prefix() {
        let params = Params::new().with("name", "report").with("ext", "pdf");
        assert_eq!(build("files/:name.:ext", params).unwrap(), "files/report.pdf");
        assert_eq!(
            build("files/:name.:ext?", Params::new().with("name", "report")).unwrap(),
            "files/report"
        );
    }

    #[test]
    fn test_invalid_pattern_regex() {
        let err = PathTemplate::parse("users/:id([)").unwrap_err();
        assert!(matches!(err, RouteError::TemplateSyntax { .. }));
    }
}
