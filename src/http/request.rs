//! Request identification for log correlation.
//!
//! The ID only tags log spans. It is never added to the forwarded request or
//! to the relayed response, which stay exactly as received.

use std::fmt;

use axum::http::HeaderMap;
use uuid::Uuid;

/// Header consulted for a caller-supplied request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Identifier attached to every forwarding span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Reuse the caller's `x-request-id` if it is printable, else mint a UUID v4.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| Self(v.to_string()))
            .unwrap_or_else(Self::generate)
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
