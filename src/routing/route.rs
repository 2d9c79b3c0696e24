//! Compiled route definitions.
//!
//! A [`Route`] is the runtime form of a `RouteConfig`: the method is parsed,
//! the upstream path resolved, and per-endpoint preconditions (required query
//! parameters, required or typed bodies) are checked here before any backend
//! is contacted.

use axum::http::Method;
use serde::Deserialize;
use thiserror::Error;

use crate::config::{
    AuthMode, BodyPolicy, BodySchema, IdentityPropagation, RouteConfig, ServiceName,
};
use crate::http::request::InboundRequest;

/// Route configuration that could not be compiled.
#[derive(Debug, Error)]
#[error("route `{route}` has invalid method `{method}`")]
pub struct RouteError {
    pub route: String,
    pub method: String,
}

/// Request rejected before authentication because the route's
/// preconditions are not met.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("Required query parameter `{0}` is missing")]
    MissingQuery(String),
    #[error("Request body is required")]
    MissingBody,
    #[error("Request body is not a valid {0}")]
    InvalidBody(&'static str),
}

/// Body of `PUT /debitinstruction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitInstructionDay {
    pub deb_instruct_selected_day: i32,
}

impl BodySchema {
    fn name(&self) -> &'static str {
        match self {
            BodySchema::DebitInstructionDay => "debit instruction day",
        }
    }

    /// Check that `body` parses as this schema. The bytes themselves are
    /// forwarded untouched.
    fn check(&self, body: &[u8]) -> Result<(), PreconditionError> {
        let parsed = match self {
            BodySchema::DebitInstructionDay => {
                serde_json::from_slice::<DebitInstructionDay>(body).map(|_| ())
            }
        };
        parsed.map_err(|_| PreconditionError::InvalidBody(self.name()))
    }
}

/// A route ready for matching and forwarding.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: String,
    pub method: Method,
    pub path: String,
    /// Canonical path sent to the backend.
    pub upstream_path: String,
    pub service: ServiceName,
    pub auth: AuthMode,
    pub identity: IdentityPropagation,
    pub required_query: Vec<String>,
    pub body: BodyPolicy,
    pub body_schema: Option<BodySchema>,
}

impl Route {
    pub fn from_config(config: &RouteConfig) -> Result<Self, RouteError> {
        let method = Method::from_bytes(config.method.as_bytes()).map_err(|_| RouteError {
            route: config.name.clone(),
            method: config.method.clone(),
        })?;

        Ok(Self {
            name: config.name.clone(),
            method,
            path: config.path.clone(),
            upstream_path: config.upstream_path.clone().unwrap_or_else(|| config.path.clone()),
            service: config.service,
            auth: config.auth,
            identity: config.identity,
            required_query: config.required_query.clone(),
            body: config.body,
            body_schema: config.body_schema,
        })
    }

    /// Whether the caller must be authenticated before forwarding.
    pub fn requires_auth(&self) -> bool {
        self.auth != AuthMode::Public
    }

    /// Validate query and body requirements.
    pub fn check_preconditions(&self, req: &InboundRequest) -> Result<(), PreconditionError> {
        if let Some(missing) = self
            .required_query
            .iter()
            .find(|key| req.query_value(key).is_none())
        {
            return Err(PreconditionError::MissingQuery(missing.clone()));
        }

        // Login bodies are credentials; an absent one is an auth failure, not a bad request.
        if self.auth == AuthMode::Login {
            return Ok(());
        }

        match (self.body, req.body()) {
            (BodyPolicy::Required, None) => Err(PreconditionError::MissingBody),
            (_, Some(body)) => match self.body_schema {
                Some(schema) => schema.check(body),
                None => Ok(()),
            },
            (BodyPolicy::Optional, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::default_routes;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, Uri};

    fn route(name: &str) -> Route {
        let config = default_routes().into_iter().find(|r| r.name == name).unwrap();
        Route::from_config(&config).unwrap()
    }

    fn inbound(method: Method, uri: &str, body: Option<&'static str>) -> InboundRequest {
        let uri: Uri = uri.parse().unwrap();
        let body = body.map(|b| Bytes::from_static(b.as_bytes()));
        InboundRequest::new(method, &uri, HeaderMap::new(), body)
    }

    #[test]
    fn test_upstream_path_defaults_to_path() {
        let r = route("customer");
        assert_eq!(r.method, Method::GET);
        assert_eq!(r.upstream_path, "/customer");
        assert!(r.requires_auth());
    }

    #[test]
    fn test_invalid_method() {
        let mut config = default_routes().remove(1);
        config.method = "GE T".into();
        assert!(Route::from_config(&config).is_err());
    }

    #[test]
    fn test_required_query() {
        let r = route("product");
        assert_eq!(
            r.check_preconditions(&inbound(Method::GET, "/product", None)),
            Err(PreconditionError::MissingQuery("mortgageId".into()))
        );
        assert_eq!(
            r.check_preconditions(&inbound(Method::GET, "/product?mortgageId=M1", None)),
            Ok(())
        );
    }

    #[test]
    fn test_typed_body() {
        let r = route("debit_instruction_put");
        let uri = "/debitinstruction?mortgageId=M1";

        assert_eq!(
            r.check_preconditions(&inbound(Method::PUT, uri, None)),
            Err(PreconditionError::MissingBody)
        );
        let bad_day = inbound(Method::PUT, uri, Some(r#"{"debInstructSelectedDay":"soon"}"#));
        assert_eq!(
            r.check_preconditions(&bad_day),
            Err(PreconditionError::InvalidBody("debit instruction day"))
        );
        let good_day = inbound(Method::PUT, uri, Some(r#"{"debInstructSelectedDay":15}"#));
        assert_eq!(r.check_preconditions(&good_day), Ok(()));
    }

    #[test]
    fn test_login_body_left_to_auth() {
        let r = route("login");
        assert_eq!(r.check_preconditions(&inbound(Method::POST, "/login", None)), Ok(()));
    }
}
