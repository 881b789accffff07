//! External service connection settings

use super::ConfigError;
use serde::{Deserialize, Serialize};

/// Identity service (Keystone v3) credentials and catalog selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Versioned identity endpoint, e.g. `https://keystone:5000/v3`
    pub auth_url: String,
    pub username: String,
    pub password: String,
    pub project_name: String,
    pub user_domain: String,
    pub project_domain: String,
    /// Endpoint interface picked from the service catalog
    pub interface: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Role id identifying tenant managers
    pub tenant_manager_role: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            auth_url: String::new(),
            username: String::new(),
            password: String::new(),
            project_name: String::new(),
            user_domain: "Default".to_string(),
            project_domain: "Default".to_string(),
            interface: "public".to_string(),
            region: None,
            tenant_manager_role: "14".to_string(),
        }
    }
}

impl IdentityConfig {
    /// Check that everything needed to authenticate is present.
    pub fn require(&self) -> Result<(), ConfigError> {
        const SECTION: &str = "identity";
        require(SECTION, "auth_url", &self.auth_url, "OS_AUTH_URL")?;
        require(SECTION, "username", &self.username, "OS_USERNAME")?;
        require(SECTION, "password", &self.password, "OS_PASSWORD")?;
        require(SECTION, "project_name", &self.project_name, "OS_PROJECT_NAME")?;
        Ok(())
    }
}

/// Allocations registry REST API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationsConfig {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl AllocationsConfig {
    pub fn require(&self) -> Result<(), ConfigError> {
        const SECTION: &str = "allocations";
        require(SECTION, "url", &self.url, "QUOTA_AUDIT_ALLOCATIONS_URL")?;
        require(SECTION, "username", &self.username, "QUOTA_AUDIT_ALLOCATIONS_USERNAME")?;
        require(SECTION, "password", &self.password, "QUOTA_AUDIT_ALLOCATIONS_PASSWORD")?;
        Ok(())
    }
}

/// Shared HTTP client settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout; 0 waits forever
    pub timeout_seconds: u64,
}

fn require(
    section: &'static str,
    key: &'static str,
    value: &str,
    env: &'static str,
) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField { section, key, env });
    }
    Ok(())
}
