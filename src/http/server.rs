//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a single catch-all entry point
//! - Wire up middleware (request ID, tracing)
//! - Buffer each request and hand it to the [`GatewayHandler`]
//! - Serve until the shutdown signal, then drain

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Instrument;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::GatewayHandler;
use crate::http::request::{request_id, InboundRequest, MakeGatewayRequestId};
use crate::http::response::GatewayResponse;
use crate::lifecycle::StartupError;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<GatewayHandler>,
    pub max_body_bytes: usize,
}

/// HTTP front end of the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &GatewayConfig) -> Result<Self, StartupError> {
        let handler = Arc::new(GatewayHandler::from_config(config)?);
        Ok(Self::with_handler(handler, config.listener.max_body_bytes))
    }

    pub fn with_handler(handler: Arc<GatewayHandler>, max_body_bytes: usize) -> Self {
        let state = AppState {
            handler,
            max_body_bytes,
        };
        Self {
            router: Self::build_router(state),
        }
    }

    /// Every method and path goes to the gateway entry; the route table
    /// decides what exists.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(gateway_entry)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeGatewayRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: buffer, run the pipeline, record metrics.
async fn gateway_entry(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let span = tracing::info_span!(
        "request",
        request_id = %request_id(request.headers()),
        method = %method,
        path = %request.uri().path(),
    );

    let response = match run_pipeline(state, request).instrument(span.clone()).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            span.in_scope(|| tracing::debug!(status = %e.status(), error = %e, "Request rejected"));
            e.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}

async fn run_pipeline(
    state: AppState,
    request: Request<Body>,
) -> Result<GatewayResponse, GatewayError> {
    let inbound = InboundRequest::from_request(request, state.max_body_bytes).await?;
    tracing::debug!(request = ?inbound, "Request received");

    // Detached so a caller hang-up does not cancel backend calls already in flight.
    let handler = state.handler.clone();
    let task = tokio::spawn(async move { handler.handle(inbound).await }.in_current_span());

    task.await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Request task failed");
        Err(GatewayError::Aborted)
    })
}
