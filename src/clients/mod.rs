//! Service client abstraction layer.
//!
//! The reconciliation workflows only see the [`IdentityService`],
//! [`ComputeService`] and [`AllocationRegistry`] traits. The concrete
//! implementations speak Keystone v3, Nova v2.1 and the allocations REST API
//! over a shared `reqwest` client.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

pub mod allocations;
pub mod compute;
pub mod error;
pub mod identity;
pub mod session;

pub use allocations::AllocationsApi;
pub use compute::NovaClient;
pub use error::ClientError;
pub use identity::KeystoneClient;
pub use session::Session;

use crate::config::HttpConfig;
use crate::model::{
    Aggregate, AllocationRecord, Flavor, Instance, Project, QuotaRecord, QuotaRow,
    RoleAssignment, Tenant, TenantUsage, User,
};

/// Identity service operations used by the reports.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Resolve a tenant by id, falling back to a lookup by name.
    ///
    /// Returns `ClientError::NotFound` when neither matches.
    async fn resolve_tenant(&self, name_or_id: &str) -> Result<Tenant, ClientError>;

    async fn list_projects(&self) -> Result<Vec<Project>, ClientError>;

    async fn list_users(&self) -> Result<Vec<User>, ClientError>;

    /// Project-scoped user assignments of one role.
    async fn list_role_assignments(
        &self,
        role_id: &str,
    ) -> Result<Vec<RoleAssignment>, ClientError>;
}

/// Compute service operations used by the reports.
#[async_trait]
pub trait ComputeService: Send + Sync {
    /// List flavors from the public or the private catalog.
    async fn list_flavors(&self, public: bool) -> Result<Vec<Flavor>, ClientError>;

    /// Every server owned by the tenant, queried across all tenants.
    async fn list_instances(&self, tenant_id: &str) -> Result<Vec<Instance>, ClientError>;

    /// Live quota limits; fails for tenants the service does not know.
    async fn get_quota(&self, tenant_id: &str) -> Result<QuotaRecord, ClientError>;

    /// Accumulated usage of every tenant over a window.
    async fn list_usage(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<TenantUsage>, ClientError>;

    async fn list_aggregates(&self) -> Result<Vec<Aggregate>, ClientError>;
}

/// Allocations registry operations. No server-side filtering is available.
#[async_trait]
pub trait AllocationRegistry: Send + Sync {
    async fn list_allocations(&self) -> Result<Vec<AllocationRecord>, ClientError>;

    async fn list_quotas(&self) -> Result<Vec<QuotaRow>, ClientError>;
}

/// Build the HTTP client shared by every service client of a run.
pub fn build_http_client(config: &HttpConfig) -> Result<Arc<Client>, ClientError> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if config.timeout_seconds > 0 {
        builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
    }
    builder
        .build()
        .map(Arc::new)
        .map_err(|e| ClientError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

/// Append path segments to a base URL, percent-encoding each one.
pub(crate) fn join_url(base: &str, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = Url::parse(base)
        .map_err(|e| ClientError::Configuration(format!("Invalid URL '{}': {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| ClientError::Configuration(format!("URL cannot be a base: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub(crate) fn map_send_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout(e.to_string())
    } else {
        ClientError::Network(e.to_string())
    }
}

/// Map the response status to a `ClientError` and decode a JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T, ClientError> {
    let status = response.status();
    match status {
        StatusCode::NOT_FOUND => return Err(ClientError::NotFound(what.to_string())),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            return Err(ClientError::Authentication(format!(
                "{} returned {}",
                what, status
            )))
        }
        _ => {}
    }

    let body = response.text().await.map_err(|e| {
        ClientError::InvalidResponse(format!("Failed to read response body: {}", e))
    })?;

    if !status.is_success() {
        return Err(ClientError::Upstream {
            status: status.as_u16(),
            message: format!("{}: {}", what, body.trim()),
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
}
