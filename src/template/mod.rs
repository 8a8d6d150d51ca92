//! Path template subsystem.
//!
//! # Data Flow
//! ```text
//! template string ("api/v1/users/:id(\\d+)")
//!     → parser.rs (literal runs + parameter keys)
//!     → path.rs (PathTemplate: per-key validators)
//!         → build(Params)  → "api/v1/users/42"
//!         → matcher.rs      → anchored Regex for diagnostics
//! ```
//!
//! # Syntax
//! ```text
//!  :name          named parameter, matches up to the next delimiter
//!  :name(\d+)     named parameter with a custom pattern
//!  (\d+)          unnamed parameter, keyed "0", "1", ...
//!  *              unnamed wildcard (".*"); values keep "/"
//!  :name?         optional
//!  :name*         zero or more, joined by the delimiter
//!  :name+         one or more
//!  \: \*          literal colon, literal asterisk
//! ```
//!
//! # Design Decisions
//! - A `/` or `.` right before a parameter belongs to it (dropped when an
//!   optional parameter is absent)
//! - Values are percent-encoded like `encodeURIComponent`, then validated
//!   against the pattern
//! - Composed route paths are parsed with `PathTemplate::parse_relative`,
//!   so they stay relative to the base URL
//! - No compile cache: templates are recompiled on each resolve

pub mod matcher;
pub mod params;
pub mod parser;
pub mod path;

pub use matcher::{MatchOptions, Matcher};
pub use params::{ParamValue, Params};
pub use parser::{Key, Modifier};
pub use path::PathTemplate;

use crate::error::RouteResult;

/// Compile a template into a builder.
pub fn compile(template: &str) -> RouteResult<PathTemplate> {
    PathTemplate::parse(template)
}
