//! Named-route registry.
//!
//! # Data Flow
//! ```text
//! Route declaration (startup):
//!     Router::define(name, builder)
//!     → store.rs register(name, PathSource::Deferred, builder)
//!
//! Resolution (per request):
//!     store.rs lookup(name) → RouteEntry
//!     → entry.rs params(raw) / path()
//! ```
//!
//! # Design Decisions
//! - Names are unique for the registry's lifetime; duplicates are errors
//! - Listing order is registration order
//! - Injectable instance, not a process global

pub mod entry;
pub mod store;

pub use entry::{ParamBuilder, PathSource, RouteEntry, RouteListing};
pub use store::Registry;
