//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check service addresses are usable base URLs
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Detect conflicting routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::{HeaderName, Method};
use thiserror::Error;
use url::Url;

use crate::config::schema::{
    AuthMode, BodyPolicy, GatewayConfig, IdentityPropagation, RouteConfig, ServiceName,
};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),
    #[error("listener.max_body_bytes and listener.max_response_bytes must be greater than zero")]
    ZeroBodyLimit,
    #[error("timeouts.connect_secs must be greater than zero")]
    ZeroConnectTimeout,
    #[error("services.{service} `{address}` is not an absolute http URL")]
    ServiceAddress { service: ServiceName, address: String },
    #[error("auth.{field} `{value}` must start with '/'")]
    AuthPath { field: &'static str, value: String },
    #[error("auth.identity_header `{0}` is not a valid header name")]
    IdentityHeader(String),
    #[error("no routes configured")]
    NoRoutes,
    #[error("route `{0}` is defined more than once")]
    DuplicateName(String),
    #[error("route `{route}` has invalid method `{method}`")]
    Method { route: String, method: String },
    #[error("route `{route}` path `{path}` must start with '/'")]
    Path { route: String, path: String },
    #[error("routes `{first}` and `{second}` both match {method} {path}")]
    Conflict {
        first: String,
        second: String,
        method: String,
        path: String,
    },
    #[error("route `{0}` propagates identity but is not a bearer route")]
    IdentityWithoutBearer(String),
    #[error("route `{0}` uses login auth but does not target the login service")]
    LoginService(String),
    #[error("route `{0}` declares a body schema without requiring a body")]
    SchemaWithoutBody(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.listener.max_body_bytes == 0 || config.listener.max_response_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }

    for service in [
        ServiceName::Login,
        ServiceName::Customer,
        ServiceName::Mortgage,
        ServiceName::Product,
        ServiceName::DebitInstruction,
    ] {
        let address = config.services.address(service);
        if !is_base_url(address) {
            errors.push(ValidationError::ServiceAddress {
                service,
                address: address.to_string(),
            });
        }
    }

    for (field, value) in [
        ("validate_path", &config.auth.validate_path),
        ("login_path", &config.auth.login_path),
    ] {
        if !value.starts_with('/') {
            errors.push(ValidationError::AuthPath {
                field,
                value: value.clone(),
            });
        }
    }
    if HeaderName::try_from(config.auth.identity_header.as_str()).is_err() {
        errors.push(ValidationError::IdentityHeader(config.auth.identity_header.clone()));
    }

    validate_routes(&config.routes, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(routes: &[RouteConfig], errors: &mut Vec<ValidationError>) {
    if routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
        return;
    }

    let mut names = HashSet::new();
    let mut endpoints: Vec<(String, &str, &str)> = Vec::new();

    for route in routes {
        if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateName(route.name.clone()));
        }

        let method = match Method::from_bytes(route.method.as_bytes()) {
            Ok(m) => Some(m.as_str().to_string()),
            Err(_) => {
                errors.push(ValidationError::Method {
                    route: route.name.clone(),
                    method: route.method.clone(),
                });
                None
            }
        };

        for path in std::iter::once(&route.path).chain(route.upstream_path.as_ref()) {
            if !path.starts_with('/') {
                errors.push(ValidationError::Path {
                    route: route.name.clone(),
                    path: path.clone(),
                });
            }
        }

        if let Some(method) = method {
            if let Some((_, first, _)) = endpoints
                .iter()
                .find(|(m, _, p)| *m == method && *p == route.path)
            {
                errors.push(ValidationError::Conflict {
                    first: first.to_string(),
                    second: route.name.clone(),
                    method: method.clone(),
                    path: route.path.clone(),
                });
            }
            endpoints.push((method, &route.name, &route.path));
        }

        if route.identity != IdentityPropagation::None && route.auth != AuthMode::Bearer {
            errors.push(ValidationError::IdentityWithoutBearer(route.name.clone()));
        }
        if route.auth == AuthMode::Login && route.service != ServiceName::Login {
            errors.push(ValidationError::LoginService(route.name.clone()));
        }
        if route.body_schema.is_some() && route.body != BodyPolicy::Required {
            errors.push(ValidationError::SchemaWithoutBody(route.name.clone()));
        }
    }
}

/// Backends are reached over plain HTTP; the connector has no TLS.
fn is_base_url(address: &str) -> bool {
    match Url::parse(address) {
        Ok(url) => url.scheme() == "http" && url.has_host(),
        Err(_) => false,
    }
}
