//! Template tokenizer.
//!
//! Splits a template such as `/users/:id(\d+)/files/:path*` into literal
//! runs and parameter keys. Positions in syntax errors are byte offsets.

use std::collections::HashSet;

use crate::error::{RouteError, RouteResult};

/// Repetition modifier following a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// `?`
    Optional,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
}

/// Description of one template parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// Parameter name, or its ordinal for unnamed `(...)` groups.
    pub name: String,
    /// `/` or `.` directly preceding the parameter, or empty.
    pub prefix: String,
    /// Separator between repeated values.
    pub delimiter: String,
    pub modifier: Option<Modifier>,
    /// Regex every (encoded) value must match.
    pub pattern: String,
    /// Bare `*` wildcard; its values keep `/` and other URI delimiters.
    pub wildcard: bool,
}

impl Key {
    /// True when the parameter may be left out.
    pub fn is_optional(&self) -> bool {
        matches!(self.modifier, Some(Modifier::Optional | Modifier::ZeroOrMore))
    }

    /// True when the parameter accepts a list of values.
    pub fn is_repeat(&self) -> bool {
        matches!(self.modifier, Some(Modifier::ZeroOrMore | Modifier::OneOrMore))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Param(Key),
}

/// Tokenize a path template.
pub fn parse(template: &str) -> RouteResult<Vec<Token>> {
    let chars: Vec<(usize, char)> = template.char_indices().collect();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut names = HashSet::new();
    let mut unnamed = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        match c {
            '\\' => match chars.get(i + 1) {
                Some(&(_, escaped)) => {
                    literal.push(escaped);
                    i += 2;
                }
                None => return Err(RouteError::syntax(template, pos, "dangling escape")),
            },
            ':' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && is_name_char(chars[end].1) {
                    end += 1;
                }
                if end == start {
                    return Err(RouteError::syntax(template, pos, "missing parameter name"));
                }
                let name: String = chars[start..end].iter().map(|&(_, c)| c).collect();
                i = end;

                let pattern = if chars.get(i).map(|&(_, c)| c) == Some('(') {
                    let (pattern, next) = read_pattern(template, &chars, i)?;
                    i = next;
                    Some(pattern)
                } else {
                    None
                };

                claim(template, pos, &mut names, &name)?;
                let (modifier, next) = read_modifier(&chars, i);
                i = next;
                push_param(&mut tokens, &mut literal, name, pattern, modifier, false);
            }
            '(' => {
                let (pattern, next) = read_pattern(template, &chars, i)?;
                let name = unnamed.to_string();
                unnamed += 1;
                claim(template, pos, &mut names, &name)?;
                let (modifier, next) = read_modifier(&chars, next);
                i = next;
                push_param(&mut tokens, &mut literal, name, Some(pattern), modifier, false);
            }
            '*' => {
                let name = unnamed.to_string();
                unnamed += 1;
                claim(template, pos, &mut names, &name)?;
                i += 1;
                push_param(&mut tokens, &mut literal, name, Some(".*".to_string()), None, true);
            }
            ')' => return Err(RouteError::syntax(template, pos, "unbalanced pattern")),
            _ => {
                literal.push(c);
                i += 1;
            }
        }
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

/// Record a parameter name, rejecting one already used in the template.
fn claim(template: &str, pos: usize, names: &mut HashSet<String>, name: &str) -> RouteResult<()> {
    if !names.insert(name.to_string()) {
        return Err(RouteError::syntax(
            template,
            pos,
            format!("duplicate parameter name \"{}\"", name),
        ));
    }
    Ok(())
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Read a `(...)` group starting at `open`; returns the inner pattern and
/// the index just past the closing parenthesis.
fn read_pattern(
    template: &str,
    chars: &[(usize, char)],
    open: usize,
) -> RouteResult<(String, usize)> {
    let open_pos = chars[open].0;
    let mut depth = 1usize;
    let mut pattern = String::new();
    let mut j = open + 1;

    while j < chars.len() {
        let (pos, c) = chars[j];
        match c {
            '\\' => {
                pattern.push(c);
                match chars.get(j + 1) {
                    Some(&(_, escaped)) => pattern.push(escaped),
                    None => return Err(RouteError::syntax(template, pos, "dangling escape")),
                }
                j += 2;
                continue;
            }
            '(' => {
                if chars.get(j + 1).map(|&(_, c)| c) != Some('?') {
                    return Err(RouteError::syntax(
                        template,
                        pos,
                        "capturing groups are not allowed inside a pattern",
                    ));
                }
                depth += 1;
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    if pattern.is_empty() {
                        return Err(RouteError::syntax(template, open_pos, "missing pattern"));
                    }
                    return Ok((pattern, j + 1));
                }
            }
            _ => {}
        }
        pattern.push(c);
        j += 1;
    }

    Err(RouteError::syntax(template, open_pos, "unbalanced pattern"))
}

/// Read an optional `?`, `*` or `+` at `i`; returns it and the index after it.
fn read_modifier(chars: &[(usize, char)], i: usize) -> (Option<Modifier>, usize) {
    let modifier = match chars.get(i).map(|&(_, c)| c) {
        Some('?') => Some(Modifier::Optional),
        Some('*') => Some(Modifier::ZeroOrMore),
        Some('+') => Some(Modifier::OneOrMore),
        _ => None,
    };
    (modifier, if modifier.is_some() { i + 1 } else { i })
}

/// Flush pending literal text, attach the prefix, and push the parameter.
fn push_param(
    tokens: &mut Vec<Token>,
    literal: &mut String,
    name: String,
    pattern: Option<String>,
    modifier: Option<Modifier>,
    wildcard: bool,
) {
    let prefix = match literal.chars().last() {
        Some(c @ ('/' | '.')) => {
            literal.pop();
            c.to_string()
        }
        _ => String::new(),
    };
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }

    let delimiter = if prefix.is_empty() { "/".to_string() } else { prefix.clone() };
    let pattern = pattern.unwrap_or_else(|| format!("[^{}]+?", regex::escape(&delimiter)));

    tokens.push(Token::Param(Key {
        name,
        prefix,
        delimiter,
        modifier,
        pattern,
        wildcard,
    }));
}
