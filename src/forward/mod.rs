//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! OutboundRequest + backend base address
//!     → forwarder.rs (build hyper request, send, buffer response)
//!     → 2xx-4xx (except 401): GatewayResponse relayed verbatim
//!     → 401: ForwardError::Unauthorized(path)
//!     → 5xx: ForwardError::Failed(status, path)
//!     → transport failure: ForwardError::Unexpected
//! ```

pub mod forwarder;

use axum::http::{uri::InvalidUri, StatusCode};
use thiserror::Error;

pub use forwarder::{Forwarder, HttpClient};

/// Failure below HTTP semantics: the backend never produced a usable response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid upstream uri: {0}")]
    Uri(#[from] InvalidUri),
    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),
    #[error("upstream request failed: {0}")]
    Client(#[from] hyper_util::client::legacy::Error),
    #[error("failed to read upstream response body: {0}")]
    Body(#[from] axum::Error),
}

/// Classified failure of a forwarded request.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("Unauthorized request when forwarding to {path}")]
    Unauthorized { path: String },
    #[error("Request forwarding to {path} failed with status {status}")]
    Failed { status: StatusCode, path: String },
    #[error("Unexpected error while forwarding to {path}")]
    Unexpected {
        path: String,
        #[source]
        source: TransportError,
    },
}
