//! Regex matcher derived from a path template.
//!
//! The reverse direction of [`PathTemplate::build`]: given a concrete path,
//! recover the parameters. Used for route-table diagnostics and to check
//! that resolved URLs round-trip; incoming requests are never dispatched
//! through it.

use regex::Regex;

use crate::error::{RouteError, RouteResult};
use crate::template::params::{ParamValue, Params};
use crate::template::parser::Key;
use crate::template::path::{PathTemplate, Segment};

/// Matching behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    /// When false, a single trailing `/` is tolerated.
    pub strict: bool,
    /// When false, matching ignores case.
    pub sensitive: bool,
}

/// Anchored matcher for one template.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
    keys: Vec<Key>,
}

impl PathTemplate {
    /// Compile the template into a matcher.
    pub fn matcher(&self, options: MatchOptions) -> RouteResult<Matcher> {
        let mut source = String::new();
        if !options.sensitive {
            source.push_str("(?i)");
        }
        source.push('^');

        let mut keys = Vec::new();
        let mut ends_with_delimiter = false;

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    source.push_str(&regex::escape(text));
                    ends_with_delimiter = text.ends_with('/');
                }
                Segment::Param(compiled) => {
                    let key = &compiled.key;
                    let prefix = regex::escape(&key.prefix);
                    let delimiter = regex::escape(&key.delimiter);
                    let group = format!("p{}", keys.len());

                    let mut capture = format!("(?:{})", key.pattern);
                    if key.is_repeat() {
                        capture = format!("{capture}(?:{delimiter}{capture})*");
                    }
                    if key.is_optional() {
                        source.push_str(&format!("(?:{prefix}(?P<{group}>{capture}))?"));
                    } else {
                        source.push_str(&format!("{prefix}(?P<{group}>{capture})"));
                    }

                    keys.push(key.clone());
                    ends_with_delimiter = false;
                }
            }
        }

        if !options.strict {
            if ends_with_delimiter {
                source.pop();
            }
            source.push_str("/?");
        }
        source.push('$');

        let regex = Regex::new(&source)
            .map_err(|e| RouteError::syntax(self.as_str(), 0, e.to_string()))?;
        Ok(Matcher { regex, keys })
    }
}

impl Matcher {
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match `path` and decode the captured parameters.
    pub fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;
        let mut params = Params::new();

        for (i, key) in self.keys.iter().enumerate() {
            let Some(m) = caps.name(&format!("p{i}")) else {
                continue;
            };
            let value = if key.is_repeat() {
                ParamValue::List(m.as_str().split(key.delimiter.as_str()).map(decode).collect())
            } else {
                ParamValue::Single(decode(m.as_str()))
            };
            params.insert(key.name.clone(), value);
        }
        Some(params)
    }

    /// The generated regex source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
