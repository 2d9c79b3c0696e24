//! Request-level errors and their HTTP rendering.
//!
//! Every failure in the request pipeline ends up as a [`GatewayError`]. The
//! status and the caller-facing message are fixed per kind; internal details
//! (transport errors, backend 5xx bodies) stay in the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::auth::{AuthError, CredentialError};
use crate::forward::ForwardError;
use crate::routing::{PreconditionError, RouteMiss};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Forward(#[from] ForwardError),

    #[error("No matching route found")]
    RouteNotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// The pipeline task ended without producing a response.
    #[error("Request pipeline aborted")]
    Aborted,
}

impl From<RouteMiss> for GatewayError {
    fn from(miss: RouteMiss) -> Self {
        match miss {
            RouteMiss::NotFound => GatewayError::RouteNotFound,
            RouteMiss::MethodNotAllowed => GatewayError::MethodNotAllowed,
        }
    }
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Auth(e) => match e {
                AuthError::MissingCredential
                | AuthError::InvalidToken
                | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                // 1xx/3xx from the auth backend have no meaning for the caller.
                AuthError::AuthBackend(status)
                    if status.is_client_error() || status.is_server_error() =>
                {
                    *status
                }
                AuthError::AuthBackend(_) => StatusCode::BAD_GATEWAY,
                AuthError::MissingIdentity => StatusCode::BAD_GATEWAY,
                AuthError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            GatewayError::Forward(e) => match e {
                ForwardError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
                ForwardError::Failed { status, .. } => *status,
                ForwardError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            GatewayError::RouteNotFound => StatusCode::NOT_FOUND,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::Precondition(_)
            | GatewayError::Credential(_)
            | GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Aborted => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the caller.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Auth(e) => match e {
                AuthError::MissingCredential
                | AuthError::InvalidToken
                | AuthError::InvalidCredentials => e.to_string(),
                AuthError::AuthBackend(_) => "Error during authentication".to_string(),
                AuthError::MissingIdentity => {
                    "Authentication service returned no identity".to_string()
                }
                AuthError::Unavailable(_) => "Unexpected error during authentication".to_string(),
            },
            GatewayError::Forward(e) => match e {
                ForwardError::Unauthorized { .. } => e.to_string(),
                ForwardError::Failed { path, .. } => {
                    format!("Request forwarding to {} failed", path)
                }
                ForwardError::Unexpected { .. } => {
                    "Unexpected error during request forwarding".to_string()
                }
            },
            GatewayError::PayloadTooLarge { .. } => "Request body too large".to_string(),
            GatewayError::Aborted => "Unexpected error during request forwarding".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}
