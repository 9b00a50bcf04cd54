//! Outgoing header construction.
//!
//! Everything end-to-end is cloned as-is. Headers owned by the connection
//! (framing, host, upgrades) are left for the HTTP client to produce, as an
//! edge runtime's `fetch` would.

use axum::http::{header, HeaderMap, HeaderName, Method};

/// Headers the upstream client generates itself.
pub static TRANSPORT_HEADERS: [HeaderName; 6] = [
    header::HOST,
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
];

/// Non-standard hop-by-hop headers, matched by name.
const LEGACY_TRANSPORT_HEADERS: &[&str] = &["keep-alive", "proxy-connection"];

fn is_transport_header(name: &HeaderName) -> bool {
    TRANSPORT_HEADERS.contains(name) || LEGACY_TRANSPORT_HEADERS.contains(&name.as_str())
}

/// Clone `incoming` for the upstream request.
///
/// Every `Cookie` value from `incoming` is set again on the result, in order.
pub fn forwarded_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(incoming.len());
    for (name, value) in incoming.iter() {
        if !is_transport_header(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    let cookies: Vec<_> = incoming.get_all(header::COOKIE).iter().cloned().collect();
    if !cookies.is_empty() {
        headers.remove(header::COOKIE);
        for cookie in cookies {
            headers.append(header::COOKIE, cookie);
        }
    }

    headers
}

/// Drop body framing headers for methods that are sent without a body.
pub fn strip_body_headers(method: &Method, headers: &mut HeaderMap) {
    if method == Method::GET {
        headers.remove(header::CONTENT_LENGTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_is_preserved() {
        let mut incoming = HeaderMap::new();
        incoming.insert(header::COOKIE, HeaderValue::from_static("session=abc123"));

        let out = forwarded_headers(&incoming);
        assert_eq!(out.get(header::COOKIE).unwrap(), "session=abc123");
    }

    #[test]
    fn multiple_cookie_headers_keep_order() {
        let mut incoming = HeaderMap::new();
        incoming.append(header::COOKIE, HeaderValue::from_static("session=abc123"));
        incoming.append(header::COOKIE, HeaderValue::from_static("lang=en"));

        let out = forwarded_headers(&incoming);
        let values: Vec<_> = out.get_all(header::COOKIE).iter().collect();
        assert_eq!(values, vec!["session=abc123", "lang=en"]);
    }

    #[test]
    fn end_to_end_headers_are_cloned() {
        let mut incoming = HeaderMap::new();
        incoming.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t0k"));
        incoming.insert("new-api-user", HeaderValue::from_static("42"));
        incoming.append(header::ACCEPT, HeaderValue::from_static("application/json"));
        incoming.append(header::ACCEPT, HeaderValue::from_static("text/plain"));
        incoming.insert(header::CONTENT_LENGTH, HeaderValue::from_static("17"));

        let out = forwarded_headers(&incoming);
        assert_eq!(out.get(header::AUTHORIZATION).unwrap(), "Bearer t0k");
        assert_eq!(out.get("new-api-user").unwrap(), "42");
        assert_eq!(out.get_all(header::ACCEPT).iter().count(), 2);
        assert_eq!(out.get(header::CONTENT_LENGTH).unwrap(), "17");
    }

    #[test]
    fn transport_headers_are_dropped() {
        let mut incoming = HeaderMap::new();
        incoming.insert(header::HOST, HeaderValue::from_static("console.local:8788"));
        incoming.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        incoming.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        incoming.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        incoming.insert(header::USER_AGENT, HeaderValue::from_static("curl/8"));

        let out = forwarded_headers(&incoming);
        assert_eq!(out.len(), 1);
        assert_eq!(out.get(header::USER_AGENT).unwrap(), "curl/8");
    }

    #[test]
    fn get_loses_content_length_only() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("5"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let mut post = headers.clone();
        strip_body_headers(&Method::POST, &mut post);
        assert!(post.contains_key(header::CONTENT_LENGTH));

        strip_body_headers(&Method::GET, &mut headers);
        assert!(!headers.contains_key(header::CONTENT_LENGTH));
        assert!(headers.contains_key(header::CONTENT_TYPE));
    }
}
