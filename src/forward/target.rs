//! Upstream target resolution and URL construction.

use axum::http::Uri;
use url::Url;

use crate::forward::env::ForwardEnv;

/// Origin used when no override is configured.
pub const DEFAULT_UPSTREAM_ORIGIN: &str = "http://127.0.0.1:3000";

/// Placeholder origin for path normalization; never contacted.
const NORMALIZE_BASE: &str = "http://edge-forwarder.invalid";

/// Pick the upstream origin: a non-blank override, else the default.
pub fn resolve_upstream_origin(env: &ForwardEnv) -> &str {
    match env.target_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url,
        _ => DEFAULT_UPSTREAM_ORIGIN,
    }
}

/// `origin + path + ("?" + query)`, concatenated verbatim.
///
/// A bare trailing `?` carries no query and is dropped.
pub fn build_target_url(origin: &str, uri: &Uri) -> String {
    let path = uri.path();
    match uri.query().filter(|q| !q.is_empty()) {
        Some(query) => format!("{origin}{path}?{query}"),
        None => format!("{origin}{path}"),
    }
}

/// `uri` reduced to origin form, with the path serialized as the upstream
/// client will send it.
///
/// Dot segments (`.`, `..`, `%2e%2e`) are resolved and bytes outside the URL
/// path set are percent-encoded. The query is kept as received. Returns `None`
/// when the path cannot be part of a URL.
pub fn normalize_uri(uri: &Uri) -> Option<Uri> {
    let parsed = Url::parse(&format!("{NORMALIZE_BASE}{}", uri.path())).ok()?;
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{query}", parsed.path()),
        None => parsed.path().to_string(),
    };
    Uri::try_from(path_and_query).ok()
}
