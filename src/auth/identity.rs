//! Resolved caller identity.

use axum::http::HeaderValue;

/// Name of the identity field on outbound requests (query parameter and
/// header) and in auth backend JSON responses.
pub const CUSTOMER_ID: &str = "customerId";

/// The caller's customer id, as resolved by the auth backend.
///
/// Lives for one request only and is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    customer_id: String,
    header_value: HeaderValue,
}

impl Identity {
    /// Returns `None` for ids that are empty or cannot travel in a header.
    pub fn new(customer_id: impl Into<String>) -> Option<Self> {
        let customer_id = customer_id.into();
        if customer_id.trim().is_empty() {
            return None;
        }
        let header_value = HeaderValue::from_str(&customer_id).ok()?;
        Some(Self {
            customer_id,
            header_value,
        })
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.header_value
    }
}
