//! Request pipeline.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → Router (404 / 405)
//!     → Route preconditions (400)
//!     → AuthGate (401 / 5xx, or the login response itself)
//!     → RequestRewriter
//!     → Forwarder
//!     → GatewayResponse or GatewayError
//! ```

pub mod handler;

pub use handler::GatewayHandler;
