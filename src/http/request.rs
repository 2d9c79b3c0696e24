//! Inbound request capture.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for tracing
//! - Enforce the body size limit while buffering
//! - Freeze method, path, ordered query and headers into an immutable value
//!
//! # Design Decisions
//! - An empty body is the same as no body
//! - Query parameters keep their original order and repeated keys
//! - The raw query string is kept as received for forwarding
//! - `Debug` output never contains the `Authorization` value

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, Method, Request, Uri};
use http_body_util::LengthLimitError;
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;
use uuid::Uuid;

use crate::error::GatewayError;
use crate::observability::redact::SafeHeaders;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a UUID v4 request ID for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeGatewayRequestId;

impl MakeRequestId for MakeGatewayRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID from headers, if present.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// A fully buffered request as received from the caller.
#[derive(Clone)]
pub struct InboundRequest {
    method: Method,
    path: String,
    raw_query: Option<String>,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl InboundRequest {
    pub fn new(method: Method, uri: &Uri, headers: HeaderMap, body: Option<Bytes>) -> Self {
        let query = uri
            .query()
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Self {
            method,
            path: uri.path().to_string(),
            raw_query: uri.query().map(str::to_string),
            query,
            headers,
            body: body.filter(|b| !b.is_empty()),
        }
    }

    /// Buffer an axum request, rejecting bodies above `limit` bytes.
    pub async fn from_request(request: Request<Body>, limit: usize) -> Result<Self, GatewayError> {
        let (parts, body) = request.into_parts();

        let declared_len = parts
            .headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if declared_len.is_some_and(|len| len > limit) {
            return Err(GatewayError::PayloadTooLarge { limit });
        }

        // Chunked bodies carry no length up front; the limit trips mid-stream.
        let bytes = axum::body::to_bytes(body, limit).await.map_err(|e| {
            if exceeds_limit(&e) {
                return GatewayError::PayloadTooLarge { limit };
            }
            tracing::debug!(error = %e, "Failed to buffer request body");
            GatewayError::BadRequest("Failed to read request body".to_string())
        })?;

        Ok(Self::new(parts.method, &parts.uri, parts.headers, Some(bytes)))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query string exactly as the caller sent it, without the `?`.
    pub fn raw_query(&self) -> Option<&str> {
        self.raw_query.as_deref()
    }

    /// Decoded query parameters in their original order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// First value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}

fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

impl std::fmt::Debug for InboundRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.raw_query)
            .field("headers", &SafeHeaders(&self.headers))
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_order_and_repeats() {
        let uri: Uri = "/product?b=2&a=1&b=3&note=hello%20world".parse().unwrap();
        let req = InboundRequest::new(Method::GET, &uri, HeaderMap::new(), None);

        assert_eq!(req.path(), "/product");
        assert_eq!(
            req.query(),
            &[
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "3".to_string()),
                ("note".to_string(), "hello world".to_string()),
            ]
        );
        assert_eq!(req.query_value("b"), Some("2"));
        assert_eq!(req.query_value("missing"), None);
        assert_eq!(req.raw_query(), Some("b=2&a=1&b=3&note=hello%20world"));
    }

    #[test]
    fn test_empty_body_is_absent() {
        let uri: Uri = "/customer".parse().unwrap();
        let req = InboundRequest::new(Method::GET, &uri, HeaderMap::new(), Some(Bytes::new()));
        assert!(req.body().is_none());
    }

    #[tokio::test]
    async fn test_from_request_buffers_body() {
        let request = Request::builder()
            .method(Method::PUT)
            .uri("/debitinstruction?mortgageId=M1")
            .body(Body::from(r#"{"debInstructSelectedDay":15}"#))
            .unwrap();

        let req = InboundRequest::from_request(request, 1024).await.unwrap();
        assert_eq!(req.method(), Method::PUT);
        assert_eq!(req.body().unwrap().as_ref(), br#"{"debInstructSelectedDay":15}"#);
    }

    #[tokio::test]
    async fn test_from_request_enforces_limit() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_LENGTH, "4096")
            .body(Body::from(vec![b'x'; 4096]))
            .unwrap();

        let err = InboundRequest::from_request(request, 1024).await.unwrap_err();
        assert!(matches!(err, GatewayError::PayloadTooLarge { limit: 1024 }));
    }

    #[tokio::test]
    async fn test_from_request_limit_without_content_length() {
        let request = Request::builder()
            .method(Method::PUT)
            .uri("/debitinstruction?mortgageId=M1")
            .body(Body::from(vec![b'x'; 4096]))
            .unwrap();
        assert!(request.headers().get(header::CONTENT_LENGTH).is_none());

        let err = InboundRequest::from_request(request, 1024).await.unwrap_err();
        assert!(matches!(err, GatewayError::PayloadTooLarge { limit: 1024 }));
    }

    #[test]
    fn test_debug_masks_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer s3cr3t"));
        let uri: Uri = "/customer".parse().unwrap();
        let req = InboundRequest::new(Method::GET, &uri, headers, None);

        let rendered = format!("{:?}", req);
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("authorization"));
    }
}
