//! Routing subsystem: the mount tree and route declaration.
//!
//! # Data Flow
//! ```text
//! Route Declaration (at startup):
//!     RouteTable::router()
//!     → router.rs Router::define(name) → Route handle
//!     → Route::get/mount(segment)      → tree.rs bind (once)
//!     → named routes publish a deferred path into the registry
//!
//! Path Composition (on demand):
//!     tree.rs context_path(route)   → ["/api", "/v1/", "/users/:id"]
//!     → normalize.rs compose         → "api/v1/users/:id"
//!
//! Finalization:
//!     RouteTable::finalize → validate all bound → compose once
//!     → Resolver over fixed paths
//! ```
//!
//! # Design Decisions
//! - Arena of nodes with parent indices, no owning back-references
//! - Segments are bound once; rebinding is an error
//! - Composed paths carry no leading slash

pub mod normalize;
pub mod router;
pub mod tree;

pub use router::{Route, RouteTable, Router};
pub use tree::{MethodFilter, MountTree, RouteId, RouteNode};
