//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! registry / tree / resolver produce:
//!     → tracing events (route, segment, url fields)
//!     → logging.rs subscriber (pretty or JSON on stderr)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; binaries install the subscriber
//! - Structured fields rather than formatted messages

pub mod logging;

pub use logging::init_logging;
