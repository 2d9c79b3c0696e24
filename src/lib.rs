//! Authenticating request-forwarding gateway.
//!
//! Callers talk to one HTTP endpoint; each request is matched against a
//! static route table, authenticated against the login service when the
//! route requires it, rewritten for its backend service (customer,
//! mortgage, product, debit-instruction) and forwarded. Backend answers are
//! relayed verbatim except for 401 and 5xx, which the gateway reports itself.

// Request pipeline
pub mod auth;
pub mod error;
pub mod forward;
pub mod gateway;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use gateway::GatewayHandler;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
