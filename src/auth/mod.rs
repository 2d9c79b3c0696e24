//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → credential.rs (bearer header or login body)
//!     → gate.rs (one call to the login service)
//!     → Identity (token) or Session (login), else AuthError
//!     → identity.rs (customerId ready for propagation)
//! ```

pub mod credential;
pub mod gate;
pub mod identity;

pub use credential::{Credential, CredentialError};
pub use gate::{AuthError, AuthGate, Authenticated, Session};
pub use identity::{Identity, CUSTOMER_ID};
