//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the echo route
//! - Wire up middleware (tracing, metrics, timeout, decompression, body limit)
//! - Serve on a bound listener until shutdown

use std::time::Duration;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, FromRef},
    http::{HeaderMap, Method, Request},
    middleware,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    decompression::RequestDecompressionLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use tracing::Span;
use uuid::Uuid;

use crate::config::EchoConfig;
use crate::http::request::{BodyOptions, JsonBody, RequestView};
use crate::http::response::EchoResponse;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;

/// The single route served.
pub const ECHO_PATH: &str = "/api";

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub body: BodyOptions,
}

impl FromRef<AppState> for BodyOptions {
    fn from_ref(state: &AppState) -> Self {
        state.body
    }
}

/// HTTP server for the echo API.
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: EchoConfig) -> Self {
        let state = AppState {
            body: BodyOptions {
                strict: config.limits.strict_json,
            },
        };

        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &EchoConfig, state: AppState) -> Router {
        Router::new()
            .route(ECHO_PATH, any(echo_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .layer(RequestDecompressionLayer::new())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.limits.request_timeout_secs,
            )))
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
    }

    /// The router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "Server running on http://localhost:{}{}",
            addr.port(),
            ECHO_PATH
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Echo handler: describes the request back to the caller.
async fn echo_handler(method: Method, headers: HeaderMap, JsonBody(body): JsonBody) -> EchoResponse {
    let view = RequestView::new(&method, &headers, body);

    tracing::debug!(
        method = %view.method,
        headers = view.headers.len(),
        "Echoing request"
    );

    EchoResponse::from(&view)
}

/// Per-request span. The id lives only in the span so it is never echoed back.
fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        uri = %request.uri(),
    )
}
