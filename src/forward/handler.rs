//! The forwarding handler.
//!
//! One call per incoming request. The request is rewritten to the upstream
//! origin, executed, and the upstream response is handed back untouched.
//! Neither body is buffered.

use axum::body::{Body, HttpBody};
use axum::http::{Method, Request, Response};
use hyper::ext::ReasonPhrase;

use crate::forward::env::ForwardEnv;
use crate::forward::error::ForwardError;
use crate::forward::headers::{forwarded_headers, strip_body_headers};
use crate::forward::target::{build_target_url, resolve_upstream_origin};

/// Translate an incoming request into the upstream request.
///
/// `GET` is sent without a body. Any other method streams the incoming body
/// through unless it is known to be empty.
pub fn build_upstream_request(
    env: &ForwardEnv,
    request: Request<Body>,
) -> Result<reqwest::Request, ForwardError> {
    let (parts, body) = request.into_parts();

    let target = build_target_url(resolve_upstream_origin(env), &parts.uri);
    let url = reqwest::Url::parse(&target).map_err(|source| ForwardError::InvalidTarget {
        url: target.clone(),
        source,
    })?;

    let mut headers = forwarded_headers(&parts.headers);
    strip_body_headers(&parts.method, &mut headers);

    let send_body = parts.method != Method::GET && body.size_hint().exact() != Some(0);

    let mut outgoing = reqwest::Request::new(parts.method, url);
    *outgoing.headers_mut() = headers;
    if send_body {
        *outgoing.body_mut() = Some(reqwest::Body::wrap_stream(body.into_data_stream()));
    }

    Ok(outgoing)
}

/// Turn the upstream response into the caller's response.
///
/// Status, reason phrase, headers and body stream are relayed as received.
/// The HTTP version is per-hop and left to the serving connection.
pub fn relay_response(upstream: reqwest::Response) -> Response<Body> {
    let status = upstream.status();
    let headers = upstream.headers().clone();
    let reason = upstream.extensions().get::<ReasonPhrase>().cloned();

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    if let Some(reason) = reason {
        response.extensions_mut().insert(reason);
    }
    response
}

/// Forward `request` to the upstream selected by `env`.
///
/// Upstream failures are returned as-is; there is no retry.
pub async fn forward(
    client: &reqwest::Client,
    env: &ForwardEnv,
    request: Request<Body>,
) -> Result<Response<Body>, ForwardError> {
    let outgoing = build_upstream_request(env, request)?;

    tracing::info!(
        method = %outgoing.method(),
        target_url = %outgoing.url(),
        "Forwarding request"
    );

    let upstream = client
        .execute(outgoing)
        .await
        .map_err(ForwardError::Upstream)?;

    tracing::debug!(
        status = %upstream.status(),
        final_url = %upstream.url(),
        "Upstream responded"
    );

    Ok(relay_response(upstream))
}
