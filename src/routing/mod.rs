//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (route lookup)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: matched Route or RouteMiss
//!
//! Matched Route
//!     → route.rs (preconditions, auth mode, identity propagation)
//!     → table.rs (service → base address)
//!
//! Route Compilation (at startup):
//!     RouteConfig[] → Route[] → immutable Router
//!     ServicesConfig → immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (configuration order)

pub mod matcher;
pub mod route;
pub mod router;
pub mod table;

pub use route::{PreconditionError, Route, RouteError};
pub use router::{RouteMiss, Router};
pub use table::{RouteTable, RouteTableError};
