//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, TraceLayer)
//!     → request.rs (request ID for the log span)
//!     → routing (prefix match, else 404)
//!     → forward (relay to upstream)
//!     → Send upstream response to client
//! ```

pub mod request;
pub mod server;

pub use request::{RequestId, X_REQUEST_ID};
pub use server::{AppState, ForwardServer, Upstream};
