//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router sending every path to the forward handler
//! - Wire up middleware (tracing)
//! - Route on the normalized path; answer unmatched paths with 404
//! - Render forwarding errors as generic responses
//! - Apply configuration updates without restarting, rebuilding the client
//!   when its settings change

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::config::{ForwarderConfig, UpstreamConfig};
use crate::forward::{
    build_client, forward, normalize_uri, same_client_settings, ForwardEnv, ForwardError,
};
use crate::http::request::RequestId;
use crate::observability::metrics;
use crate::routing::PathRouter;

/// Client and env for one configuration generation, swapped as a unit.
pub struct Upstream {
    pub client: reqwest::Client,
    pub env: ForwardEnv,
    settings: UpstreamConfig,
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<ArcSwap<Upstream>>,
    pub routes: Arc<ArcSwap<PathRouter>>,
}

impl AppState {
    /// Swap in the upstream and routes derived from `config`.
    ///
    /// The client is rebuilt only when its settings change. If rebuilding
    /// fails, nothing is swapped.
    pub fn apply_config(&self, config: &ForwarderConfig) {
        let current = self.upstream.load_full();
        let client = if same_client_settings(&current.settings, &config.upstream) {
            current.client.clone()
        } else {
            match build_client(&config.upstream) {
                Ok(client) => {
                    tracing::info!(
                        max_redirects = config.upstream.max_redirects,
                        use_system_proxy = config.upstream.use_system_proxy,
                        "Upstream client rebuilt"
                    );
                    client
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Failed to rebuild upstream client, keeping current configuration"
                    );
                    return;
                }
            }
        };

        let env = ForwardEnv::from_config(config);
        tracing::info!(
            target_url = env.target_url.as_deref().unwrap_or("<default>"),
            path_prefixes = ?config.route.path_prefixes,
            "Configuration applied"
        );
        self.upstream.store(Arc::new(Upstream {
            client,
            env,
            settings: config.upstream.clone(),
        }));
        self.routes
            .store(Arc::new(PathRouter::from_prefixes(&config.route.path_prefixes)));
    }
}

/// HTTP server for the edge forwarder.
pub struct ForwardServer {
    router: Router,
    state: AppState,
}

impl ForwardServer {
    /// Create a server, reading the upstream override from the process env.
    pub fn new(config: &ForwarderConfig) -> Result<Self, ForwardError> {
        Self::with_env(config, ForwardEnv::from_config(config))
    }

    /// Create a server with an explicit forwarding environment.
    pub fn with_env(config: &ForwarderConfig, env: ForwardEnv) -> Result<Self, ForwardError> {
        let upstream = Upstream {
            client: build_client(&config.upstream)?,
            env,
            settings: config.upstream.clone(),
        };
        let state = AppState {
            upstream: Arc::new(ArcSwap::from_pointee(upstream)),
            routes: Arc::new(ArcSwap::from_pointee(PathRouter::from_prefixes(
                &config.route.path_prefixes,
            ))),
        };

        let router = Self::build_router(state.clone());
        Ok(Self { router, state })
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The axum router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// Configs received on `config_updates` replace the upstream and route
    /// table for subsequent requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ForwarderConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                state.apply_config(&config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Forward a request if its normalized path is routed, else 404.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = RequestId::from_headers(request.headers());
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let span = tracing::info_span!(
        "forward",
        request_id = %request_id,
        method = %method,
        path = %path
    );

    async move {
        let routed = normalize_uri(request.uri())
            .filter(|uri| state.routes.load().matches(uri.path()));
        let Some(uri) = routed else {
            tracing::debug!("No forwarding prefix matched");
            metrics::record_request(&method, 404, start_time);
            return (StatusCode::NOT_FOUND, "Not Found").into_response();
        };

        let mut request = request;
        *request.uri_mut() = uri;

        let upstream = state.upstream.load_full();
        let response = match forward(&upstream.client, &upstream.env, request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Forwarding failed");
                metrics::record_upstream_error(e.kind());
                e.into_response()
            }
        };

        metrics::record_request(&method, response.status().as_u16(), start_time);
        response
    }
    .instrument(span)
    .await
}
