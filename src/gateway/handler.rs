//! Per-request pipeline.
//!
//! # Responsibilities
//! - Match the route and check its preconditions
//! - Authenticate the caller when the route requires it
//! - Rewrite the request for the target service and forward it
//!
//! # Design Decisions
//! - At most two backend calls per request, auth then target, never concurrent
//! - Login routes answer with the login service's response directly
//! - All state is immutable after construction; the handler is shared via `Arc`

use std::time::Duration;

use axum::http::StatusCode;

use crate::auth::{AuthError, AuthGate, Authenticated, Credential, Identity};
use crate::config::{AuthMode, GatewayConfig, ServiceName};
use crate::error::GatewayError;
use crate::forward::{ForwardError, Forwarder};
use crate::http::request::InboundRequest;
use crate::http::response::GatewayResponse;
use crate::http::rewrite::RequestRewriter;
use crate::lifecycle::StartupError;
use crate::observability::metrics;
use crate::routing::{Route, RouteTable, Router};

/// Outcome of the authentication step.
enum AuthOutcome {
    Proceed(Option<Identity>),
    Respond(GatewayResponse),
}

/// Drives one request from routing to the backend response.
#[derive(Debug)]
pub struct GatewayHandler {
    router: Router,
    table: RouteTable,
    auth: AuthGate,
    forwarder: Forwarder,
}

impl GatewayHandler {
    pub fn new(router: Router, table: RouteTable, auth: AuthGate, forwarder: Forwarder) -> Self {
        Self {
            router,
            table,
            auth,
            forwarder,
        }
    }

    /// Compile routes, service addresses and the auth gate from configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, StartupError> {
        let router = Router::from_config(&config.routes)?;
        let table = RouteTable::from_config(&config.services)?;
        let forwarder = Forwarder::new(
            Duration::from_secs(config.timeouts.connect_secs),
            config.listener.max_response_bytes,
        );
        let auth = AuthGate::new(
            forwarder.clone(),
            table.base_address(ServiceName::Login).clone(),
            &config.auth,
        )?;

        tracing::info!(routes = router.routes().count(), "Gateway handler ready");
        Ok(Self::new(router, table, auth, forwarder))
    }

    pub async fn handle(&self, request: InboundRequest) -> Result<GatewayResponse, GatewayError> {
        let route = self.router.match_request(&request).map_err(|miss| {
            tracing::warn!(method = %request.method(), path = %request.path(), "No route matched");
            GatewayError::from(miss)
        })?;

        route.check_preconditions(&request).map_err(|e| {
            tracing::warn!(
                route = %route.name,
                error = %e,
                "Request rejected before authentication"
            );
            GatewayError::from(e)
        })?;

        let identity = match self.authenticate(route, &request).await? {
            AuthOutcome::Proceed(identity) => identity,
            AuthOutcome::Respond(response) => return Ok(response),
        };

        let outbound = RequestRewriter::new(route).rewrite(&request, identity.as_ref());
        let target = self.table.base_address(route.service);
        tracing::debug!(route = %route.name, service = %route.service, "Forwarding request");

        match self.forwarder.forward(&outbound, target).await {
            Ok(response) => {
                metrics::record_upstream(route.service, Some(response.status.as_u16()));
                Ok(response)
            }
            Err(e) => {
                let status = match &e {
                    ForwardError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED.as_u16()),
                    ForwardError::Failed { status, .. } => Some(status.as_u16()),
                    ForwardError::Unexpected { .. } => None,
                };
                metrics::record_upstream(route.service, status);
                Err(e.into())
            }
        }
    }

    async fn authenticate(
        &self,
        route: &Route,
        request: &InboundRequest,
    ) -> Result<AuthOutcome, GatewayError> {
        let credential = match route.auth {
            AuthMode::Public => return Ok(AuthOutcome::Proceed(None)),
            AuthMode::Bearer => Credential::from_headers(request.headers()),
            AuthMode::Login => {
                Credential::from_login_body(request.body().map(|b| b.as_ref()))?
            }
        };

        let authenticated = self.auth.authenticate(credential).await.map_err(|e| {
            metrics::record_auth_failure(e.kind());
            self.log_auth_failure(route, &e);
            GatewayError::from(e)
        })?;

        Ok(match authenticated {
            Authenticated::Token(identity) => {
                tracing::debug!(
                    route = %route.name,
                    customer_id = %identity.customer_id(),
                    "Caller authenticated"
                );
                AuthOutcome::Proceed(Some(identity))
            }
            Authenticated::Session(session) => {
                let status = session.response.status.as_u16();
                metrics::record_upstream(ServiceName::Login, Some(status));
                AuthOutcome::Respond(session.response)
            }
        })
    }

    fn log_auth_failure(&self, route: &Route, error: &AuthError) {
        match error {
            AuthError::Unavailable(_) | AuthError::AuthBackend(_) | AuthError::MissingIdentity => {
                tracing::error!(route = %route.name, error = %error, "Authentication failed")
            }
            _ => tracing::warn!(route = %route.name, error = %error, "Authentication rejected"),
        }
    }
}
