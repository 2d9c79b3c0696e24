//! Route matching logic.
//!
//! # Responsibilities
//! - Match the request path (exact, case-sensitive)
//! - Match the request method
//!
//! # Design Decisions
//! - Path and method are matched separately so the router can tell
//!   "unknown path" (404) from "known path, wrong method" (405)
//! - No regex, no prefix matching: every gateway endpoint is explicit

use axum::http::Method;

use crate::http::request::InboundRequest;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &InboundRequest) -> bool;
}

/// Matches the request path exactly.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    path: String,
}

impl PathMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Matcher for PathMatcher {
    fn matches(&self, req: &InboundRequest) -> bool {
        req.path() == self.path
    }
}

/// Matches the request method.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    method: Method,
}

impl MethodMatcher {
    pub fn new(method: Method) -> Self {
        Self { method }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, req: &InboundRequest) -> bool {
        *req.method() == self.method
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, Uri};

    fn req(method: Method, uri: &str) -> InboundRequest {
        let uri: Uri = uri.parse().unwrap();
        InboundRequest::new(method, &uri, HeaderMap::new(), None)
    }

    #[test]
    fn test_path_matcher() {
        let matcher = PathMatcher::new("/product");

        assert!(matcher.matches(&req(Method::GET, "/product?mortgageId=M1")));
        assert!(!matcher.matches(&req(Method::GET, "/products")));
        assert!(!matcher.matches(&req(Method::GET, "/Product"))); // Case sensitive
    }

    #[test]
    fn test_method_matcher() {
        let matcher = MethodMatcher::new(Method::PUT);

        assert!(matcher.matches(&req(Method::PUT, "/debitinstruction")));
        assert!(!matcher.matches(&req(Method::GET, "/debitinstruction")));
    }
}
