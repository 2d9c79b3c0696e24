//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    let config: GatewayConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{AuthMode, IdentityPropagation, ServiceName};

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.routes.len(), 6);
        assert_eq!(config.auth.validate_path, "/auth");
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config(
            r#"
            [services]
            customer = "http://customer.internal:9000"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.services.customer, "http://customer.internal:9000");
        // Untouched services keep their defaults.
        assert_eq!(config.services.login, "http://127.0.0.1:8081");
    }

    #[test]
    fn test_custom_routes_replace_defaults() {
        let config = parse_config(
            r#"
            [[routes]]
            name = "accounts"
            method = "GET"
            path = "/accounts"
            upstream_path = "/v2/accounts"
            service = "customer"
            auth = "bearer"
            identity = "query"
            "#,
        )
        .unwrap();

        assert_eq!(config.routes.len(), 1);
        let route = &config.routes[0];
        assert_eq!(route.service, ServiceName::Customer);
        assert_eq!(route.auth, AuthMode::Bearer);
        assert_eq!(route.identity, IdentityPropagation::Query);
        assert_eq!(route.upstream_path.as_deref(), Some("/v2/accounts"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = parse_config("[listener\nbind_address = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_errors_surface() {
        let err = parse_config(
            r#"
            [services]
            product = "not a url"
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }
}
