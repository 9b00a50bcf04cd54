//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (normalized path)
//!     → router.rs (prefix table lookup)
//!     → matcher.rs (evaluate prefix)
//!     → forward or 404
//! ```
//!
//! # Design Decisions
//! - Route table compiled per config load, immutable until the next reload
//! - Prefix matching only, on the path after dot segments are resolved
//! - First match wins (config order)

pub mod matcher;
pub mod router;

pub use matcher::PathPrefixMatcher;
pub use router::PathRouter;
