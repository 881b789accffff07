//! Configuration loading and service connection shared by the handlers.

use crate::clients::{build_http_client, AllocationsApi, KeystoneClient, NovaClient, Session};
use crate::config::AuditConfig;
use std::path::Path;
use std::sync::Arc;

/// Load configuration: file (when present), then environment, then CLI.
pub fn load_config(
    path: &Path,
    log_level: Option<&str>,
) -> Result<AuditConfig, Box<dyn std::error::Error>> {
    let mut config = if path.exists() {
        AuditConfig::load(Some(path))?
    } else {
        AuditConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(level) = log_level {
        config.logging.level = level.to_string();
    }

    config.validate()?;
    Ok(config)
}

/// Authenticate against the identity service.
pub async fn authenticate(config: &AuditConfig) -> Result<Arc<Session>, Box<dyn std::error::Error>> {
    config.identity.require()?;
    let client = build_http_client(&config.http)?;
    let session = Session::authenticate(client, &config.identity).await?;
    tracing::info!(auth_url = %config.identity.auth_url, "Authenticated with identity service");
    Ok(Arc::new(session))
}

/// Identity and compute clients sharing one token.
pub struct Cloud {
    pub identity: KeystoneClient,
    pub compute: NovaClient,
}

pub async fn connect_cloud(config: &AuditConfig) -> Result<Cloud, Box<dyn std::error::Error>> {
    let session = authenticate(config).await?;
    let compute = NovaClient::from_session(Arc::clone(&session))?;
    Ok(Cloud {
        identity: KeystoneClient::new(session),
        compute,
    })
}

pub async fn connect_identity(
    config: &AuditConfig,
) -> Result<KeystoneClient, Box<dyn std::error::Error>> {
    Ok(KeystoneClient::new(authenticate(config).await?))
}

pub async fn connect_compute(config: &AuditConfig) -> Result<NovaClient, Box<dyn std::error::Error>> {
    Ok(NovaClient::from_session(authenticate(config).await?)?)
}

/// Registry client. Checks credentials before anything else connects so a
/// misconfigured run fails without touching the cloud.
pub fn connect_registry(config: &AuditConfig) -> Result<AllocationsApi, Box<dyn std::error::Error>> {
    config.allocations.require()?;
    let client = build_http_client(&config.http)?;
    Ok(AllocationsApi::new(client, &config.allocations))
}
