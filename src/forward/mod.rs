//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request
//!     → target.rs (normalize path, resolve origin, origin + path + query)
//!     → headers.rs (clone headers, re-apply Cookie)
//!     → handler.rs (attach streamed body unless GET, execute)
//!     → client.rs (reqwest, redirects followed)
//!     → handler.rs (relay status, headers, body stream)
//! ```
//!
//! # Design Decisions
//! - Stateless per request; the only shared values are the client and env
//! - The path is normalized once, before routing, so the prefix check sees
//!   the path the upstream receives
//! - Bodies are never buffered in either direction
//! - Errors propagate to the server, which renders a generic response

pub mod client;
pub mod env;
pub mod error;
pub mod handler;
pub mod headers;
pub mod target;

pub use client::{build_client, same_client_settings};
pub use env::ForwardEnv;
pub use error::ForwardError;
pub use handler::{build_upstream_request, forward, relay_response};
pub use headers::forwarded_headers;
pub use target::{
    build_target_url, normalize_uri, resolve_upstream_origin, DEFAULT_UPSTREAM_ORIGIN,
};
