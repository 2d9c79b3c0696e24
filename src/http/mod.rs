//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → request.rs (buffer body under the size limit → InboundRequest)
//!     → [gateway handler: route, authenticate]
//!     → rewrite.rs (InboundRequest → OutboundRequest for the target service)
//!     → headers.rs (hop-by-hop filtering both ways)
//!     → response.rs (GatewayResponse → client)
//! ```

pub mod headers;
pub mod request;
pub mod response;
pub mod rewrite;
pub mod server;

pub use request::{InboundRequest, MakeGatewayRequestId, X_REQUEST_ID};
pub use response::GatewayResponse;
pub use rewrite::{OutboundRequest, RequestRewriter};
pub use server::HttpServer;
