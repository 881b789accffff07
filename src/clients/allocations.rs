//! Allocations registry REST client.

use super::{join_url, map_send_error, read_json, AllocationRegistry, ClientError};
use crate::config::AllocationsConfig;
use crate::model::{AllocationRecord, QuotaRow};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Basic-auth session against the allocations API.
pub struct AllocationsApi {
    client: Arc<Client>,
    base_url: String,
    username: String,
    password: String,
}

impl AllocationsApi {
    pub fn new(client: Arc<Client>, config: &AllocationsConfig) -> Self {
        Self {
            client,
            base_url: config.url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, resource: &str) -> Result<T, ClientError> {
        let url = join_url(&self.base_url, &["api", resource])?;
        tracing::debug!(url = %url, "GET allocations");
        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(map_send_error)?;
        read_json(response, resource).await
    }
}

#[async_trait]
impl AllocationRegistry for AllocationsApi {
    async fn list_allocations(&self) -> Result<Vec<AllocationRecord>, ClientError> {
        let records: Vec<AllocationRecord> = self.get("allocations").await?;
        tracing::debug!(count = records.len(), "Fetched allocation records");
        Ok(records)
    }

    async fn list_quotas(&self) -> Result<Vec<QuotaRow>, ClientError> {
        self.get("quotas").await
    }
}
