//! Header masking for diagnostics.
//!
//! Every header dump that reaches a log line goes through [`SafeHeaders`],
//! which replaces credential-bearing values with a fixed marker.

use std::fmt;

use axum::http::{header, HeaderMap, HeaderName};

const MASK: &str = "<masked>";

fn is_sensitive(name: &HeaderName) -> bool {
    name == header::AUTHORIZATION || name == header::PROXY_AUTHORIZATION
}

/// Display/Debug wrapper that renders headers with credentials masked.
pub struct SafeHeaders<'a>(pub &'a HeaderMap);

impl fmt::Display for SafeHeaders<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if is_sensitive(name) {
                write!(f, "{}: {}", name, MASK)?;
            } else {
                write!(f, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()))?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SafeHeaders<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(name, value)| {
                let shown = if is_sensitive(name) {
                    MASK.to_string()
                } else {
                    String::from_utf8_lossy(value.as_bytes()).into_owned()
                };
                (name.as_str(), shown)
            }))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok-123"));
        headers.append("x-trace", HeaderValue::from_static("a"));
        headers.append("x-trace", HeaderValue::from_static("b"));
        headers
    }

    #[test]
    fn test_display_masks_authorization() {
        let rendered = SafeHeaders(&headers()).to_string();
        assert!(!rendered.contains("tok-123"));
        assert!(rendered.contains("authorization: <masked>"));
        assert!(rendered.contains("x-trace: a"));
        assert!(rendered.contains("x-trace: b"));
    }

    #[test]
    fn test_debug_masks_authorization() {
        let rendered = format!("{:?}", SafeHeaders(&headers()));
        assert!(!rendered.contains("tok-123"));
        assert!(rendered.contains("<masked>"));
    }
}
