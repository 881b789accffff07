//! Nova v2.1 compute client.

use super::{join_url, map_send_error, read_json, ClientError, ComputeService, Session};
use crate::model::{Aggregate, Flavor, Instance, QuotaRecord, TenantUsage};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;

/// Timestamp layout accepted by `os-simple-tenant-usage`.
const USAGE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Compute client bound to the catalog's `compute` endpoint.
pub struct NovaClient {
    session: Arc<Session>,
    base_url: String,
}

impl NovaClient {
    /// Resolve the compute endpoint from the session catalog.
    pub fn from_session(session: Arc<Session>) -> Result<Self, ClientError> {
        let base_url = session.endpoint("compute")?;
        Ok(Self::new(session, base_url))
    }

    pub fn new(session: Arc<Session>, base_url: String) -> Self {
        Self { session, base_url }
    }

    async fn get_url<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T, ClientError> {
        tracing::debug!(url = %url, "GET compute");
        let response = self
            .session
            .client()
            .get(url)
            .query(query)
            .header("x-auth-token", self.session.token())
            .send()
            .await
            .map_err(map_send_error)?;
        read_json(response, what).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T, ClientError> {
        let url = join_url(&self.base_url, segments)?;
        self.get_url(url, query, what).await
    }
}

#[derive(Deserialize)]
struct FlavorsResponse {
    flavors: Vec<Flavor>,
}

#[derive(Deserialize)]
struct ServersResponse {
    servers: Vec<RawServer>,
    #[serde(default)]
    servers_links: Vec<Link>,
}

#[derive(Deserialize)]
struct RawServer {
    id: String,
    flavor: FlavorRef,
}

#[derive(Deserialize)]
struct FlavorRef {
    id: String,
}

#[derive(Deserialize)]
struct Link {
    rel: String,
    href: String,
}

#[derive(Deserialize)]
struct QuotaSetResponse {
    quota_set: QuotaSet,
}

#[derive(Deserialize)]
struct QuotaSet {
    instances: i64,
    cores: i64,
    ram: i64,
}

#[derive(Deserialize)]
struct UsageResponse {
    #[serde(default)]
    tenant_usages: Vec<TenantUsage>,
}

#[derive(Deserialize)]
struct AggregatesResponse {
    aggregates: Vec<Aggregate>,
}

#[async_trait]
impl ComputeService for NovaClient {
    async fn list_flavors(&self, public: bool) -> Result<Vec<Flavor>, ClientError> {
        let is_public = if public { "true" } else { "false" };
        let response: FlavorsResponse = self
            .get(&["flavors", "detail"], &[("is_public", is_public)], "flavor list")
            .await?;
        Ok(response.flavors)
    }

    async fn list_instances(&self, tenant_id: &str) -> Result<Vec<Instance>, ClientError> {
        let mut instances = Vec::new();
        let mut page: ServersResponse = self
            .get(
                &["servers", "detail"],
                &[
                    ("all_tenants", "1"),
                    ("project_id", tenant_id),
                    ("tenant_id", tenant_id),
                ],
                "server list",
            )
            .await?;

        loop {
            instances.extend(page.servers.into_iter().map(|s| Instance {
                id: s.id,
                flavor_id: s.flavor.id,
            }));

            let Some(next) = page.servers_links.into_iter().find(|l| l.rel == "next") else {
                break;
            };
            let url = Url::parse(&next.href).map_err(|e| {
                ClientError::InvalidResponse(format!("bad servers_links href: {}", e))
            })?;
            page = self.get_url(url, &[], "server list").await?;
        }

        Ok(instances)
    }

    async fn get_quota(&self, tenant_id: &str) -> Result<QuotaRecord, ClientError> {
        let response: QuotaSetResponse = self
            .get(&["os-quota-sets", tenant_id], &[], "quota set")
            .await?;
        Ok(QuotaRecord {
            instances: response.quota_set.instances,
            cores: response.quota_set.cores,
            ram_mib: response.quota_set.ram,
        })
    }

    async fn list_usage(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<TenantUsage>, ClientError> {
        let start = start.format(USAGE_TIME_FORMAT).to_string();
        let end = end.format(USAGE_TIME_FORMAT).to_string();
        let response: UsageResponse = self
            .get(
                &["os-simple-tenant-usage"],
                &[("start", start.as_str()), ("end", end.as_str()), ("detailed", "1")],
                "tenant usage",
            )
            .await?;
        Ok(response.tenant_usages)
    }

    async fn list_aggregates(&self) -> Result<Vec<Aggregate>, ClientError> {
        let response: AggregatesResponse =
            self.get(&["os-aggregates"], &[], "aggregate list").await?;
        Ok(response.aggregates)
    }
}
