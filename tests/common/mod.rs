//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use edge_forwarder::{ForwardEnv, ForwardServer, ForwarderConfig, Shutdown};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Env var name no test environment sets, so the file value is used.
pub const UNSET_TARGET_ENV: &str = "EDGE_FORWARDER_TEST_TARGET_URL_UNSET";

/// Mock upstream.
///
/// - `/api/unavailable` → 503 with a body
/// - `/api/old` → 302 to `/api/new`
/// - `/api/new` → 200 `landed`
/// - `/api/raw` → echoes the request body bytes verbatim
/// - anything else → JSON description of the request it received
async fn upstream_handler(request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap();

    match parts.uri.path() {
        "/api/unavailable" => {
            (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance").into_response()
        }
        "/api/old" => (StatusCode::FOUND, [(header::LOCATION, "/api/new")]).into_response(),
        "/api/new" => "landed".into_response(),
        "/api/raw" => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            body,
        )
            .into_response(),
        _ => {
            let get = |name: header::HeaderName| {
                parts
                    .headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            let description = json!({
                "method": parts.method.as_str(),
                "uri": parts.uri.to_string(),
                "host": get(header::HOST),
                "cookie": get(header::COOKIE),
                "authorization": get(header::AUTHORIZATION),
                "content_length": get(header::CONTENT_LENGTH),
                "body": String::from_utf8_lossy(&body),
            });
            (
                [
                    ("x-upstream", "echo"),
                    ("set-cookie", "session=rotated; Path=/"),
                ],
                Json(description),
            )
                .into_response()
        }
    }
}

/// Start the mock upstream on an ephemeral port.
pub async fn start_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(upstream_handler);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// An upstream that accepts every connection and closes it at once.
///
/// Returns its address and the number of connections accepted so far.
pub async fn start_dropping_upstream() -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));

    let counter = accepted.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });

    (addr, accepted)
}

/// An address nothing listens on.
pub fn closed_addr() -> SocketAddr {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
}

/// Config forwarding `/api` and `/v1` to `target`.
pub fn config_for(target: &str) -> ForwarderConfig {
    let mut config = ForwarderConfig::default();
    config.upstream.target_url = target.to_string();
    config.upstream.target_url_env = UNSET_TARGET_ENV.to_string();
    config.route.path_prefixes = vec!["/api".into(), "/v1".into()];
    config
}

pub struct RunningForwarder {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<ForwarderConfig>,
}

impl RunningForwarder {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningForwarder {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the forwarder on an ephemeral port.
pub async fn start_forwarder(config: ForwarderConfig) -> RunningForwarder {
    let env = ForwardEnv::from_config(&config);
    let server = ForwardServer::with_env(&config, env).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    RunningForwarder {
        addr,
        shutdown,
        config_updates,
    }
}

/// Test client: no proxies, no redirect following of its own.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Parse a response body as JSON.
pub async fn json(res: reqwest::Response) -> serde_json::Value {
    serde_json::from_slice(&res.bytes().await.unwrap()).unwrap()
}

/// Send `request_line` and a minimal header block over a raw socket.
///
/// Used where a client library would rewrite the request target. Returns the
/// whole response as text.
pub async fn raw_request(addr: SocketAddr, request_line: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("{request_line}\r\nHost: console.local\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut raw))
        .await
        .expect("response not closed in time")
        .unwrap();
    String::from_utf8_lossy(&raw).into_owned()
}
