//! Credential validation against the login service.
//!
//! # Responsibilities
//! - Validate bearer tokens and resolve the caller's customer id
//! - Exchange username/password for a session
//! - Map auth backend answers to [`AuthError`] kinds
//!
//! # Design Decisions
//! - Exactly one backend call per authentication, nothing cached
//! - Empty or absent credentials are rejected before any network call
//! - Transport failures never surface as 401

use axum::body::Bytes;
use axum::http::{
    header::{self, InvalidHeaderName},
    HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
};
use thiserror::Error;
use url::Url;

use crate::auth::credential::Credential;
use crate::auth::identity::{Identity, CUSTOMER_ID};
use crate::config::AuthConfig;
use crate::forward::{Forwarder, TransportError};
use crate::http::response::GatewayResponse;
use crate::http::rewrite::OutboundRequest;

/// Why a caller could not be authenticated.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication details missing")]
    MissingCredential,
    #[error("Invalid JWT")]
    InvalidToken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Authentication backend returned {0}")]
    AuthBackend(StatusCode),
    #[error("Authentication backend returned no identity")]
    MissingIdentity,
    #[error("Authentication backend unreachable: {0}")]
    Unavailable(#[source] TransportError),
}

impl AuthError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::InvalidToken => "invalid_token",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::AuthBackend(_) => "backend_error",
            AuthError::MissingIdentity => "missing_identity",
            AuthError::Unavailable(_) => "unavailable",
        }
    }
}

/// Result of a username/password exchange.
#[derive(Debug, Clone)]
pub struct Session {
    /// Customer id, when the login service reports one.
    pub identity: Option<Identity>,
    /// The login service's response, relayed to the caller.
    pub response: GatewayResponse,
}

/// A successfully authenticated caller.
#[derive(Debug, Clone)]
pub enum Authenticated {
    /// Bearer token accepted.
    Token(Identity),
    /// Credentials exchanged for a session.
    Session(Session),
}

/// Validates credentials against the login service.
#[derive(Debug, Clone)]
pub struct AuthGate {
    forwarder: Forwarder,
    base: Url,
    validate_path: String,
    login_path: String,
    identity_header: HeaderName,
}

impl AuthGate {
    pub fn new(
        forwarder: Forwarder,
        base: Url,
        config: &AuthConfig,
    ) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            forwarder,
            base,
            validate_path: config.validate_path.clone(),
            login_path: config.login_path.clone(),
            identity_header: HeaderName::try_from(config.identity_header.as_str())?,
        })
    }

    /// Authenticate the caller with whatever credential they presented.
    pub async fn authenticate(
        &self,
        credential: Option<Credential>,
    ) -> Result<Authenticated, AuthError> {
        match credential {
            None => {
                tracing::warn!("Credential missing from request");
                Err(AuthError::MissingCredential)
            }
            Some(Credential::BearerToken(token)) => {
                self.validate_token(&token).await.map(Authenticated::Token)
            }
            Some(Credential::UsernamePassword { username, password }) => {
                self.login(&username, &password).await.map(Authenticated::Session)
            }
        }
    }

    async fn validate_token(&self, token: &str) -> Result<Identity, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingCredential);
        }
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AuthError::InvalidToken)?;

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, bearer);
        let request =
            OutboundRequest::new(Method::POST, self.validate_path.as_str(), "", headers, None);

        let response = self.call(&request).await?;
        match response.status {
            StatusCode::UNAUTHORIZED => {
                tracing::warn!("Bearer token rejected by auth backend");
                Err(AuthError::InvalidToken)
            }
            status if !status.is_success() => {
                tracing::error!(status = %status, "Error during token validation");
                Err(AuthError::AuthBackend(status))
            }
            _ => self.identity_from(&response).ok_or_else(|| {
                tracing::error!(
                    header = %self.identity_header,
                    "Token accepted but no customer id returned"
                );
                AuthError::MissingIdentity
            }),
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username.is_empty() || password.is_empty() {
            tracing::warn!("Authentication details missing in login request");
            return Err(AuthError::MissingCredential);
        }
        tracing::info!(username = %username, "Login attempt");

        let body = serde_json::json!({ "username": username, "password": password }).to_string();
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let request = OutboundRequest::new(
            Method::POST,
            self.login_path.as_str(),
            "",
            headers,
            Some(Bytes::from(body)),
        );

        let response = self.call(&request).await?;
        tracing::info!(status = %response.status, "Login service responded");
        match response.status {
            StatusCode::UNAUTHORIZED => Err(AuthError::InvalidCredentials),
            status if !status.is_success() => Err(AuthError::AuthBackend(status)),
            _ => Ok(Session {
                identity: self.identity_from(&response),
                response,
            }),
        }
    }

    async fn call(&self, request: &OutboundRequest) -> Result<GatewayResponse, AuthError> {
        self.forwarder.dispatch(request, &self.base).await.map_err(|e| {
            tracing::error!(path = %request.path(), error = %e, "Auth backend unreachable");
            AuthError::Unavailable(e)
        })
    }

    /// Customer id from the configured response header, falling back to a
    /// `customerId` field in a JSON body.
    fn identity_from(&self, response: &GatewayResponse) -> Option<Identity> {
        if let Some(value) = response.headers.get(&self.identity_header) {
            return value.to_str().ok().and_then(Identity::new);
        }

        let body: serde_json::Value = serde_json::from_slice(&response.body).ok()?;
        match body.get(CUSTOMER_ID)? {
            serde_json::Value::String(id) => Identity::new(id.as_str()),
            serde_json::Value::Number(id) => Identity::new(id.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn gate() -> AuthGate {
        let forwarder = Forwarder::new(Duration::from_secs(1), 1024);
        // Nothing listens here; tests below must not reach the network.
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        AuthGate::new(forwarder, base, &AuthConfig::default()).unwrap()
    }

    fn response(headers: HeaderMap, body: &'static str) -> GatewayResponse {
        GatewayResponse::new(StatusCode::OK, &headers, Bytes::from_static(body.as_bytes()))
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let err = gate().authenticate(None).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredential));
    }

    #[tokio::test]
    async fn test_empty_login_fields_rejected_locally() {
        let err = gate()
            .authenticate(Some(Credential::UsernamePassword {
                username: "a".into(),
                password: String::new(),
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingCredential));
    }

    #[test]
    fn test_identity_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert("customerid", HeaderValue::from_static("C1"));
        let identity = gate().identity_from(&response(headers, "")).unwrap();
        assert_eq!(identity.customer_id(), "C1");
    }

    #[test]
    fn test_identity_from_body() {
        let gate = gate();
        let identity = gate
            .identity_from(&response(HeaderMap::new(), r#"{"customerId":"C7"}"#))
            .unwrap();
        assert_eq!(identity.customer_id(), "C7");

        let numeric = gate
            .identity_from(&response(HeaderMap::new(), r#"{"customerId":42}"#))
            .unwrap();
        assert_eq!(numeric.customer_id(), "42");

        assert!(gate.identity_from(&response(HeaderMap::new(), "token-only")).is_none());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(AuthError::InvalidToken.kind(), "invalid_token");
        assert_eq!(AuthError::AuthBackend(StatusCode::BAD_GATEWAY).kind(), "backend_error");
    }
}
