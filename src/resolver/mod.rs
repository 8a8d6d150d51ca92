//! Reverse URL resolution.
//!
//! # Data Flow
//! ```text
//! resolve(name, params, request?)
//!     → registry lookup(name)              UnknownRoute
//!     → entry parameter builder(params)
//!     → entry path provider()              UnboundPath
//!     → template compile + build           TemplateSyntax / MissingParameter
//!     → base.rs BaseUrl::evaluate(request)
//!     → base.rs combine(base, path)        InvalidBaseUrl
//! ```
//!
//! # Design Decisions
//! - Pure pipeline: no retries, no caching, same input → same URL
//! - Reference resolution, not string concatenation, for the base URL

pub mod base;
pub mod resolve;

pub use base::{combine, BaseUrl, RequestContext};
pub use resolve::{Resolver, ScopedResolver};
