//! Forwarding errors and their rendering by the hosting server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures while forwarding a request.
///
/// The handler never recovers from these; the server turns them into a
/// generic error response.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid upstream target {url:?}: {source}")]
    InvalidTarget {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ForwardError {
    /// Status code of the generic error response.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ForwardError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ForwardError::InvalidTarget { .. } | ForwardError::Client(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ForwardError::InvalidTarget { .. } => "invalid_target",
            ForwardError::Upstream(e) if e.is_connect() => "connect",
            ForwardError::Upstream(e) if e.is_timeout() => "timeout",
            ForwardError::Upstream(e) if e.is_redirect() => "redirect",
            ForwardError::Upstream(_) => "upstream",
            ForwardError::Client(_) => "client",
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let reason = status.canonical_reason().unwrap_or("Error");
        (status, reason).into_response()
    }
}
