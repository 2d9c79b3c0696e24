//! Caller credentials.
//!
//! A request carries at most one credential: a bearer token in the
//! `Authorization` header, or a username/password pair in a login body.
//! Neither value is ever rendered by `Debug`.

use std::fmt;

use axum::http::{header, HeaderMap};
use serde::Deserialize;
use thiserror::Error;

/// Credential supplied by the caller.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    BearerToken(String),
    UsernamePassword { username: String, password: String },
}

/// Login body that is present but unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Login request body is not valid JSON")]
pub struct CredentialError;

#[derive(Deserialize)]
struct LoginBody {
    username: Option<String>,
    password: Option<String>,
}

impl Credential {
    /// Bearer token from the `Authorization` header.
    ///
    /// Anything other than `Bearer <token>` counts as no credential.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let (scheme, token) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        Some(Credential::BearerToken(token.to_string()))
    }

    /// Username/password from a `{"username", "password"}` body.
    ///
    /// A missing body or a missing field yields `Ok(None)`; empty strings
    /// are kept and rejected later by the auth gate.
    pub fn from_login_body(body: Option<&[u8]>) -> Result<Option<Self>, CredentialError> {
        let Some(body) = body else {
            return Ok(None);
        };
        let parsed: LoginBody = serde_json::from_slice(body).map_err(|_| CredentialError)?;

        Ok(match (parsed.username, parsed.password) {
            (Some(username), Some(password)) => {
                Some(Credential::UsernamePassword { username, password })
            }
            _ => None,
        })
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::BearerToken(_) => f.write_str("BearerToken(<masked>)"),
            Credential::UsernamePassword { username, .. } => f
                .debug_struct("UsernamePassword")
                .field("username", username)
                .field("password", &"<masked>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn auth_headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(
            Credential::from_headers(&auth_headers("Bearer abc.def")),
            Some(Credential::BearerToken("abc.def".into()))
        );
        assert_eq!(
            Credential::from_headers(&auth_headers("bearer abc")),
            Some(Credential::BearerToken("abc".into()))
        );
    }

    #[test]
    fn test_missing_or_malformed_bearer() {
        assert_eq!(Credential::from_headers(&HeaderMap::new()), None);
        assert_eq!(Credential::from_headers(&auth_headers("Basic dXNlcjpwdw==")), None);
        assert_eq!(Credential::from_headers(&auth_headers("Bearer ")), None);
        assert_eq!(Credential::from_headers(&auth_headers("abc")), None);
    }

    #[test]
    fn test_login_body() {
        assert_eq!(
            Credential::from_login_body(Some(&br#"{"username":"a","password":""}"#[..])),
            Ok(Some(Credential::UsernamePassword {
                username: "a".into(),
                password: String::new(),
            }))
        );
        assert_eq!(Credential::from_login_body(Some(&br#"{"username":"a"}"#[..])), Ok(None));
        assert_eq!(Credential::from_login_body(None), Ok(None));
        assert_eq!(Credential::from_login_body(Some(&b"not json"[..])), Err(CredentialError));
    }

    #[test]
    fn test_debug_masks_secrets() {
        let token = format!("{:?}", Credential::BearerToken("tok-xyz".into()));
        assert!(!token.contains("tok-xyz"));

        let login = format!(
            "{:?}",
            Credential::UsernamePassword {
                username: "alice".into(),
                password: "hunter2".into(),
            }
        );
        assert!(login.contains("alice"));
        assert!(!login.contains("hunter2"));
    }
}
