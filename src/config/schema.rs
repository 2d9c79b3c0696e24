//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limits).
    pub listener: ListenerConfig,

    /// Base addresses of the backend services.
    pub services: ServicesConfig,

    /// Authentication backend endpoints.
    pub auth: AuthConfig,

    /// Route definitions mapping endpoints to backend services.
    pub routes: Vec<RouteConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            services: ServicesConfig::default(),
            auth: AuthConfig::default(),
            routes: default_routes(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,

    /// Maximum backend response body size relayed to callers, in bytes.
    pub max_response_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2MB
            max_response_bytes: 16 * 1024 * 1024, // 16MB
        }
    }
}

/// Logical backend services the gateway forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceName {
    Login,
    Customer,
    Mortgage,
    Product,
    DebitInstruction,
}

impl ServiceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::Login => "login",
            ServiceName::Customer => "customer",
            ServiceName::Mortgage => "mortgage",
            ServiceName::Product => "product",
            ServiceName::DebitInstruction => "debit_instruction",
        }
    }
}

impl std::fmt::Display for ServiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base address of every backend service (e.g., "http://127.0.0.1:8083").
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub login: String,
    pub customer: String,
    pub mortgage: String,
    pub product: String,
    pub debit_instruction: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            login: "http://127.0.0.1:8081".to_string(),
            customer: "http://127.0.0.1:8083".to_string(),
            mortgage: "http://127.0.0.1:8084".to_string(),
            product: "http://127.0.0.1:8085".to_string(),
            debit_instruction: "http://127.0.0.1:8086".to_string(),
        }
    }
}

impl ServicesConfig {
    /// Configured address for a service.
    pub fn address(&self, service: ServiceName) -> &str {
        match service {
            ServiceName::Login => &self.login,
            ServiceName::Customer => &self.customer,
            ServiceName::Mortgage => &self.mortgage,
            ServiceName::Product => &self.product,
            ServiceName::DebitInstruction => &self.debit_instruction,
        }
    }
}

/// Endpoints on the login service used for authentication.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Path that validates a bearer token.
    pub validate_path: String,

    /// Path that exchanges username/password for a session.
    pub login_path: String,

    /// Response header carrying the resolved customer id.
    pub identity_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            validate_path: "/auth".to_string(),
            login_path: "/login".to_string(),
            identity_header: "customerId".to_string(),
        }
    }
}

/// How a route establishes the caller's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// No authentication; forwarded as-is.
    Public,
    /// `Authorization: Bearer <token>` validated against the auth backend.
    Bearer,
    /// Username/password in the body exchanged for a session.
    Login,
}

/// Where the resolved `customerId` is attached on the outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityPropagation {
    #[default]
    None,
    Header,
    Query,
}

/// Whether a route needs a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPolicy {
    #[default]
    Optional,
    Required,
}

/// Typed payloads the gateway checks before forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySchema {
    /// `{"debInstructSelectedDay": <int>}`
    DebitInstructionDay,
}

/// Route configuration mapping an endpoint to a backend service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// HTTP method to match (e.g., "GET").
    pub method: String,

    /// Exact request path to match.
    pub path: String,

    /// Path used on the backend; defaults to `path`.
    #[serde(default)]
    pub upstream_path: Option<String>,

    /// Backend service to forward to.
    pub service: ServiceName,

    /// Authentication requirement.
    pub auth: AuthMode,

    /// Identity propagation to the backend.
    #[serde(default)]
    pub identity: IdentityPropagation,

    /// Query parameters the caller must supply.
    #[serde(default)]
    pub required_query: Vec<String>,

    #[serde(default)]
    pub body: BodyPolicy,

    #[serde(default)]
    pub body_schema: Option<BodySchema>,
}

/// The gateway's standard endpoint set.
pub fn default_routes() -> Vec<RouteConfig> {
    let route = |name: &str, method: &str, path: &str, service, auth, identity| RouteConfig {
        name: name.to_string(),
        method: method.to_string(),
        path: path.to_string(),
        upstream_path: None,
        service,
        auth,
        identity,
        required_query: Vec::new(),
        body: BodyPolicy::Optional,
        body_schema: None,
    };

    let login = RouteConfig {
        body: BodyPolicy::Required,
        ..route(
            "login",
            "POST",
            "/login",
            ServiceName::Login,
            AuthMode::Login,
            IdentityPropagation::None,
        )
    };
    let customer = route(
        "customer",
        "GET",
        "/customer",
        ServiceName::Customer,
        AuthMode::Bearer,
        IdentityPropagation::Header,
    );
    let mortgages = route(
        "mortgages",
        "GET",
        "/mortgages",
        ServiceName::Mortgage,
        AuthMode::Bearer,
        IdentityPropagation::Header,
    );
    let product = RouteConfig {
        required_query: vec!["mortgageId".to_string()],
        ..route(
            "product",
            "GET",
            "/product",
            ServiceName::Product,
            AuthMode::Bearer,
            IdentityPropagation::None,
        )
    };
    let get_debit = RouteConfig {
        required_query: vec!["mortgageId".to_string()],
        ..route(
            "debit_instruction_get",
            "GET",
            "/debitinstruction",
            ServiceName::DebitInstruction,
            AuthMode::Bearer,
            IdentityPropagation::Query,
        )
    };
    let put_debit = RouteConfig {
        required_query: vec!["mortgageId".to_string()],
        body: BodyPolicy::Required,
        body_schema: Some(BodySchema::DebitInstructionDay),
        ..route(
            "debit_instruction_put",
            "PUT",
            "/debitinstruction",
            ServiceName::DebitInstruction,
            AuthMode::Bearer,
            IdentityPropagation::Query,
        )
    };

    vec![login, customer, mortgages, product, get_debit, put_debit]
}

/// Timeout configuration for backend calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { connect_secs: 5 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
