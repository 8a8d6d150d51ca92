//! Parameter sets substituted into path templates.
//!
//! # Responsibilities
//! - Hold the flat name → value map a template is built from
//! - Convert JSON objects (and anything `Serialize`) into that map
//!
//! # Design Decisions
//! - Ordered map so diagnostics print deterministically
//! - `null` means absent, never the empty string
//! - Nested objects are rejected instead of being stringified

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{RouteError, RouteResult};

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// One value, substituted once.
    Single(String),
    /// Several values for a repeatable (`*` / `+`) parameter.
    List(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Template parameters keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a value, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten a JSON value into template parameters.
    ///
    /// `null` yields an empty set; any other non-object is rejected.
    pub fn from_value(value: &Value) -> RouteResult<Self> {
        let object = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(object) => object,
            other => {
                return Err(RouteError::invalid(
                    "<params>",
                    format!("expected an object, got {}", kind(other)),
                ))
            }
        };

        let mut params = Self::new();
        for (name, value) in object {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    let list = items
                        .iter()
                        .map(|item| scalar(name, item))
                        .collect::<RouteResult<Vec<_>>>()?;
                    params.insert(name.clone(), ParamValue::List(list));
                }
                other => params.insert(name.clone(), ParamValue::Single(scalar(name, other)?)),
            }
        }
        Ok(params)
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

fn scalar(name: &str, value: &Value) -> RouteResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        // integral floats print without ".0"
        Value::Number(n) => Ok(match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        }),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(RouteError::invalid(
            name,
            format!("expected a string, number or boolean, got {}", kind(other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
