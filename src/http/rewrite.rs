//! Outbound request construction.
//!
//! # Responsibilities
//! - Build the backend request for a matched route from the inbound request
//! - Propagate the resolved identity (header or query) per route
//! - Keep the caller's credential away from non-auth backends
//!
//! # Design Decisions
//! - Method and path come from the route, not the caller's raw path
//! - The inbound query string is copied verbatim; identity is appended
//! - No inbound body means no outbound body
//! - The result is a new value; the inbound request is never mutated

use axum::body::Bytes;
use axum::http::{header, uri::InvalidUri, HeaderMap, HeaderName, Method, Uri};
use url::{form_urlencoded, Url};

use crate::auth::identity::{Identity, CUSTOMER_ID};
use crate::config::{IdentityPropagation, ServiceName};
use crate::http::headers::request_headers;
use crate::http::request::InboundRequest;
use crate::observability::redact::SafeHeaders;
use crate::routing::Route;

/// A request ready to be dispatched to a backend.
#[derive(Clone)]
pub struct OutboundRequest {
    method: Method,
    path: String,
    /// Already percent-encoded, without the leading `?`.
    query: String,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl OutboundRequest {
    pub fn new(
        method: Method,
        path: impl Into<String>,
        query: impl Into<String>,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            query: query.into(),
            headers,
            body,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Path plus the query string, if any.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        format!("{}?{}", self.path, self.query)
    }

    /// Fully-qualified URI against a backend base address.
    pub fn uri(&self, base: &Url) -> Result<Uri, InvalidUri> {
        let base = base.as_str().trim_end_matches('/');
        format!("{}{}", base, self.path_and_query()).parse()
    }
}

impl std::fmt::Debug for OutboundRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutboundRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("headers", &SafeHeaders(&self.headers))
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .finish()
    }
}

/// Rewrites inbound requests for one route.
#[derive(Debug, Clone, Copy)]
pub struct RequestRewriter<'a> {
    route: &'a Route,
}

impl<'a> RequestRewriter<'a> {
    pub fn new(route: &'a Route) -> Self {
        Self { route }
    }

    pub fn rewrite(
        &self,
        inbound: &InboundRequest,
        identity: Option<&Identity>,
    ) -> OutboundRequest {
        let mut query = inbound.raw_query().unwrap_or_default().to_string();
        let mut headers = request_headers(inbound.headers());

        // The token has been checked locally; only the auth service sees it again.
        if self.route.service != ServiceName::Login {
            headers.remove(header::AUTHORIZATION);
        }

        if let Some(identity) = identity {
            match self.route.identity {
                IdentityPropagation::None => {}
                IdentityPropagation::Header => {
                    // Header names are case-insensitive; `customerId` travels as `customerid`.
                    headers.insert(
                        HeaderName::from_static("customerid"),
                        identity.header_value().clone(),
                    );
                }
                IdentityPropagation::Query => append_identity(&mut query, identity),
            }
        }

        OutboundRequest::new(
            self.route.method.clone(),
            self.route.upstream_path.clone(),
            query,
            headers,
            inbound.body().cloned(),
        )
    }
}

/// Append `customerId=<id>` to an encoded query, leaving existing pairs untouched.
fn append_identity(query: &mut String, identity: &Identity) {
    if !query.is_empty() && !query.ends_with('&') {
        query.push('&');
    }
    let pair = form_urlencoded::Serializer::new(String::new())
        .append_pair(CUSTOMER_ID, identity.customer_id())
        .finish();
    query.push_str(&pair);
}
