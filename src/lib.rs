//! Named-route registry and reverse URL resolver.
//!
//! Routes are declared in nested scopes, given a name and a path template,
//! and later resolved from `name + params` back into a URL without knowing
//! where in the mount tree they live.
//!
//! ```
//! use route_reverse::routing::RouteTable;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), route_reverse::RouteError> {
//! let table = RouteTable::new();
//! let api = table.router().route()?.mount("/api")?;
//! let v1 = api.route()?.mount("/v1/")?;
//! v1.define("user", None)?.get("/users/:id")?;
//!
//! let resolver = table.finalize("http://host/")?;
//! assert_eq!(
//!     resolver.resolve("user", &json!({ "id": 42 }), None)?,
//!     "http://host/api/v1/users/42"
//! );
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod registry;
pub mod resolver;
pub mod routing;
pub mod template;

pub use config::ReverseConfig;
pub use error::{RouteError, RouteResult};
pub use registry::{ParamBuilder, Registry};
pub use resolver::{BaseUrl, RequestContext, Resolver};
pub use routing::RouteTable;
