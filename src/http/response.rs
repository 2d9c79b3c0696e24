//! Caller-facing responses.
//!
//! # Responsibilities
//! - Hold a backend response (status, headers, body) for relay
//! - Convert into an axum response
//!
//! # Design Decisions
//! - Bodies are fully buffered; relayed byte-for-byte
//! - Hop-by-hop headers stripped on construction
//! - No headers are added on relay, not even a default content type

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::headers::response_headers;

/// A response ready to be returned to the caller.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl GatewayResponse {
    pub fn new(status: StatusCode, headers: &HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers: response_headers(headers),
            body,
        }
    }
}

impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
