//! Backend dispatch.
//!
//! # Responsibilities
//! - Send one outbound request to a backend base address
//! - Buffer the backend response for relay
//! - Classify backend failures for the caller
//!
//! # Design Decisions
//! - One attempt per request: no retries, no failover
//! - Only the connect phase has a timeout
//! - Header dumps in logs go through the masking wrapper

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use url::Url;

use crate::forward::{ForwardError, TransportError};
use crate::http::response::GatewayResponse;
use crate::http::rewrite::OutboundRequest;
use crate::observability::redact::SafeHeaders;

/// HTTP client shared by every backend call.
pub type HttpClient = Client<HttpConnector, Body>;

/// Dispatches outbound requests to backends.
#[derive(Clone)]
pub struct Forwarder {
    client: HttpClient,
    max_response_bytes: usize,
}

impl Forwarder {
    pub fn new(connect_timeout: Duration, max_response_bytes: usize) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));

        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self {
            client,
            max_response_bytes,
        }
    }

    /// Send `outbound` to `target` and return whatever the backend answered,
    /// whatever its status.
    pub async fn dispatch(
        &self,
        outbound: &OutboundRequest,
        target: &Url,
    ) -> Result<GatewayResponse, TransportError> {
        let uri = outbound.uri(target)?;
        let body = match outbound.body() {
            Some(bytes) => Body::from(bytes.clone()),
            None => Body::empty(),
        };

        tracing::debug!(
            method = %outbound.method(),
            uri = %uri,
            headers = %SafeHeaders(outbound.headers()),
            body_len = outbound.body().map(|b| b.len()).unwrap_or(0),
            "Dispatching upstream request"
        );

        let mut request = Request::builder()
            .method(outbound.method().clone())
            .uri(uri)
            .body(body)?;
        *request.headers_mut() = outbound.headers().clone();

        let response: hyper::Response<hyper::body::Incoming> = self.client.request(request).await?;
        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(Body::new(body), self.max_response_bytes).await?;

        Ok(GatewayResponse::new(parts.status, &parts.headers, bytes))
    }

    /// Forward `outbound` to `target`, relaying 2xx-4xx responses and
    /// classifying 401, 5xx and transport failures.
    pub async fn forward(
        &self,
        outbound: &OutboundRequest,
        target: &Url,
    ) -> Result<GatewayResponse, ForwardError> {
        let path = outbound.path().to_string();

        let response = match self.dispatch(outbound, target).await {
            Ok(response) => response,
            Err(source) => {
                tracing::error!(
                    path = %path,
                    error = %source,
                    "Unexpected error while forwarding request"
                );
                return Err(ForwardError::Unexpected { path, source });
            }
        };

        let status = response.status;
        tracing::info!(path = %path, status = %status, "Request forwarded");

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(path = %path, "Backend rejected forwarded request as unauthorized");
            return Err(ForwardError::Unauthorized { path });
        }
        if status.is_server_error() {
            tracing::error!(
                path = %path,
                status = %status,
                body_len = response.body.len(),
                "Backend failed forwarded request"
            );
            return Err(ForwardError::Failed { status, path });
        }

        Ok(response)
    }
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("max_response_bytes", &self.max_response_bytes)
            .finish_non_exhaustive()
    }
}
