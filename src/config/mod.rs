//! Configuration module for quota-audit
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`OS_*` for the cloud, `QUOTA_AUDIT_*` for the rest)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use quota_audit::config::AuditConfig;
//!
//! let toml = r#"
//! [allocations]
//! url = "https://allocations.example.org"
//! "#;
//! let config: AuditConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.allocations.url, "https://allocations.example.org");
//! assert_eq!(config.identity.interface, "public");
//! ```

pub mod error;
pub mod logging;
pub mod services;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use services::{AllocationsConfig, HttpConfig, IdentityConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Example configuration written by `quota-audit config init`.
pub const EXAMPLE_CONFIG: &str = include_str!("../../quota-audit.example.toml");

/// Unified configuration for a reporting run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    /// Keystone credentials, also used to reach the compute service
    pub identity: IdentityConfig,
    /// Allocations registry endpoint
    pub allocations: AllocationsConfig,
    /// HTTP client settings
    pub http: HttpConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AuditConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Io {
                    path: p.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: p.to_path_buf(),
                    message: e.to_string(),
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (previous values are kept).
    pub fn with_env_overrides(mut self) -> Self {
        let identity = &mut self.identity;
        override_string("OS_AUTH_URL", &mut identity.auth_url);
        override_string("OS_USERNAME", &mut identity.username);
        override_string("OS_PASSWORD", &mut identity.password);
        override_string("OS_TENANT_NAME", &mut identity.project_name);
        override_string("OS_PROJECT_NAME", &mut identity.project_name);
        override_string("OS_USER_DOMAIN_NAME", &mut identity.user_domain);
        override_string("OS_PROJECT_DOMAIN_NAME", &mut identity.project_domain);
        override_string("OS_INTERFACE", &mut identity.interface);
        if let Ok(region) = std::env::var("OS_REGION_NAME") {
            if !region.is_empty() {
                identity.region = Some(region);
            }
        }

        let allocations = &mut self.allocations;
        override_string("QUOTA_AUDIT_ALLOCATIONS_URL", &mut allocations.url);
        override_string("QUOTA_AUDIT_ALLOCATIONS_USERNAME", &mut allocations.username);
        override_string("QUOTA_AUDIT_ALLOCATIONS_PASSWORD", &mut allocations.password);

        if let Ok(timeout) = std::env::var("QUOTA_AUDIT_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.http.timeout_seconds = t;
            }
        }

        override_string("QUOTA_AUDIT_LOG_LEVEL", &mut self.logging.level);
        if let Ok(format) = std::env::var("QUOTA_AUDIT_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate values that are wrong regardless of which command runs.
    ///
    /// Missing credentials are checked per command, see
    /// [`IdentityConfig::require`] and [`AllocationsConfig::require`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, url) in [
            ("identity.auth_url", &self.identity.auth_url),
            ("allocations.url", &self.allocations.url),
        ] {
            if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: format!("'{}' is not an http(s) URL", url),
                });
            }
        }

        if !["public", "internal", "admin"].contains(&self.identity.interface.as_str()) {
            return Err(ConfigError::Validation {
                field: "identity.interface".to_string(),
                message: "must be one of public, internal, admin".to_string(),
            });
        }

        Ok(())
    }
}

fn override_string(var: &str, target: &mut String) {
    if let Ok(value) = std::env::var(var) {
        if !value.is_empty() {
            *target = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_config_defaults() {
        let config = AuditConfig::default();
        assert!(config.identity.auth_url.is_empty());
        assert_eq!(config.identity.project_domain, "Default");
        assert_eq!(config.http.timeout_seconds, 0);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_parse_example() {
        let config: AuditConfig = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert!(config.identity.auth_url.starts_with("https://"));
        assert!(!config.allocations.url.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_partial_toml() {
        let toml = r#"
        [identity]
        auth_url = "http://keystone:5000/v3"
        region = "Melbourne"
        "#;

        let config: AuditConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.identity.region.as_deref(), Some("Melbourne"));
        assert_eq!(config.identity.user_domain, "Default");
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[http]\ntimeout_seconds = 30").unwrap();

        let config = AuditConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.http.timeout_seconds, 30);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[http\n").unwrap();

        let result = AuditConfig::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = AuditConfig::load(Some(Path::new("/nonexistent/quota-audit.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = AuditConfig::load(None).unwrap();
        assert_eq!(config.identity.interface, "public");
    }

    #[test]
    fn test_config_env_override_auth_url() {
        std::env::set_var("OS_AUTH_URL", "http://keystone.test:5000/v3");
        let config = AuditConfig::default().with_env_overrides();
        std::env::remove_var("OS_AUTH_URL");

        assert_eq!(config.identity.auth_url, "http://keystone.test:5000/v3");
    }

    #[test]
    fn test_config_env_override_allocations() {
        std::env::set_var("QUOTA_AUDIT_ALLOCATIONS_USERNAME", "reporter");
        let config = AuditConfig::default().with_env_overrides();
        std::env::remove_var("QUOTA_AUDIT_ALLOCATIONS_USERNAME");

        assert_eq!(config.allocations.username, "reporter");
    }

    #[test]
    fn test_config_env_override_region() {
        std::env::set_var("OS_REGION_NAME", "Sydney");
        let config = AuditConfig::default().with_env_overrides();
        std::env::remove_var("OS_REGION_NAME");

        assert_eq!(config.identity.region.as_deref(), Some("Sydney"));
    }

    #[test]
    fn test_config_env_invalid_timeout_ignored() {
        std::env::set_var("QUOTA_AUDIT_TIMEOUT", "soon");
        let config = AuditConfig::default().with_env_overrides();
        std::env::remove_var("QUOTA_AUDIT_TIMEOUT");

        assert_eq!(config.http.timeout_seconds, 0);
    }

    #[test]
    fn test_config_env_override_log_format() {
        std::env::set_var("QUOTA_AUDIT_LOG_FORMAT", "json");
        let config = AuditConfig::default().with_env_overrides();
        std::env::remove_var("QUOTA_AUDIT_LOG_FORMAT");

        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = AuditConfig::default();
        config.allocations.url = "allocations.example.org".to_string();

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "allocations.url"
        ));
    }

    #[test]
    fn test_config_validation_bad_interface() {
        let mut config = AuditConfig::default();
        config.identity.interface = "private".to_string();

        assert!(config.validate().is_err());
    }
}
