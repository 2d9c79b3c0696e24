//! Header filtering between hops.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers from relayed requests and responses
//! - Drop `host` so the client sets it for the backend
//!
//! # Design Decisions
//! - Every other header passes through by name, multi-valued headers intact

use axum::http::{header, HeaderMap, HeaderName};

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// Copy of `headers` suitable for the next hop of a request.
pub fn request_headers(headers: &HeaderMap) -> HeaderMap {
    filtered(headers, |name| !is_hop_by_hop(name) && name != header::HOST)
}

/// Copy of `headers` suitable for relaying a response to the caller.
pub fn response_headers(headers: &HeaderMap) -> HeaderMap {
    filtered(headers, |name| !is_hop_by_hop(name))
}

fn filtered(headers: &HeaderMap, keep: impl Fn(&HeaderName) -> bool) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if keep(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}
