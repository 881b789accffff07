//! Keystone v3 password authentication and service catalog lookup.

use super::{join_url, map_send_error, read_json, ClientError};
use crate::config::IdentityConfig;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// An authenticated, project-scoped token plus the catalog it came with.
#[derive(Debug, Clone)]
pub struct Session {
    client: Arc<Client>,
    token: String,
    auth_url: String,
    interface: String,
    region: Option<String>,
    catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Debug, Clone, Deserialize)]
struct TokenBody {
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogEntry {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogEndpoint {
    interface: String,
    #[serde(default)]
    region: Option<String>,
    url: String,
}

impl Session {
    /// Authenticate with username/password scoped to the configured project.
    pub async fn authenticate(
        client: Arc<Client>,
        config: &IdentityConfig,
    ) -> Result<Self, ClientError> {
        let url = join_url(&config.auth_url, &["auth", "tokens"])?;
        let body = json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": config.username,
                            "domain": { "name": config.user_domain },
                            "password": config.password,
                        }
                    }
                },
                "scope": {
                    "project": {
                        "name": config.project_name,
                        "domain": { "name": config.project_domain },
                    }
                }
            }
        });

        tracing::debug!(auth_url = %config.auth_url, user = %config.username, "Requesting token");
        let response = client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let token = response
            .headers()
            .get("x-subject-token")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let parsed: TokenResponse = read_json(response, "token request").await?;
        let token = token.ok_or_else(|| {
            ClientError::InvalidResponse("token response carried no X-Subject-Token".to_string())
        })?;

        tracing::debug!(services = parsed.token.catalog.len(), "Authenticated");
        Ok(Self {
            client,
            token,
            auth_url: config.auth_url.clone(),
            interface: config.interface.clone(),
            region: config.region.clone(),
            catalog: parsed.token.catalog,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Endpoint URL of a service type for the configured interface and region.
    pub fn endpoint(&self, service_type: &str) -> Result<String, ClientError> {
        let entry = self
            .catalog
            .iter()
            .find(|e| e.service_type == service_type)
            .ok_or_else(|| {
                ClientError::Configuration(format!(
                    "service catalog has no '{}' service",
                    service_type
                ))
            })?;

        entry
            .endpoints
            .iter()
            .filter(|ep| ep.interface == self.interface)
            .find(|ep| match &self.region {
                Some(region) => ep.region.as_deref() == Some(region.as_str()),
                None => true,
            })
            .map(|ep| ep.url.clone())
            .ok_or_else(|| {
                ClientError::Configuration(format!(
                    "no {} endpoint for '{}'{}",
                    self.interface,
                    service_type,
                    self.region
                        .as_ref()
                        .map(|r| format!(" in region {}", r))
                        .unwrap_or_default()
                ))
            })
    }
}
