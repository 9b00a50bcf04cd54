//! Edge forwarding service.
//!
//! Relays every request under the configured path prefixes to a single
//! upstream origin and streams the upstream response back unchanged.

pub mod config;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ForwarderConfig;
pub use forward::{ForwardEnv, ForwardError};
pub use http::ForwardServer;
pub use lifecycle::Shutdown;
