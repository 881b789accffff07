//! Shared test utilities for quota-audit integration tests.
//!
//! In-memory implementations of the service traits plus record builders,
//! so reconciliation workflows can run without any HTTP.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use quota_audit::clients::{AllocationRegistry, ClientError, ComputeService, IdentityService};
use quota_audit::model::{
    Aggregate, AllocationRecord, AllocationStatus, Flavor, Instance, Project, QuotaRecord,
    QuotaRow, RoleAssignment, Tenant, TenantUsage, User,
};
use std::collections::HashMap;
use std::sync::Mutex;

// =============================================================================
// Record Builders
// =============================================================================

/// An allocation record with the given quota (RAM in GiB).
pub fn make_allocation(
    tenant_id: &str,
    status: &str,
    modified: &str,
    instances: i64,
    cores: i64,
    ram_gib: i64,
) -> AllocationRecord {
    AllocationRecord {
        id: 0,
        tenant_id: Some(tenant_id.to_string()),
        tenant_name: Some(format!("{}-name", tenant_id)),
        project_name: Some(format!("{} project", tenant_id)),
        allocation_home: None,
        status: AllocationStatus::from(status.to_string()),
        modified_time: Some(make_time(modified)),
        instance_quota: instances,
        core_quota: cores,
        ram_quota: ram_gib,
        field_of_research_1: None,
        for_percentage_1: None,
        field_of_research_2: None,
        for_percentage_2: None,
        field_of_research_3: None,
        for_percentage_3: None,
    }
}

/// An approved allocation modified at a fixed time.
pub fn make_approved(tenant_id: &str, instances: i64, cores: i64, ram_gib: i64) -> AllocationRecord {
    make_allocation(tenant_id, "A", "2016-01-01T00:00:00Z", instances, cores, ram_gib)
}

pub fn make_time(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn make_flavor(id: &str, vcpus: i64, ram_mib: i64) -> Flavor {
    Flavor {
        id: id.to_string(),
        name: format!("flavor-{}", id),
        vcpus,
        ram: ram_mib,
    }
}

pub fn make_quota(instances: i64, cores: i64, ram_mib: i64) -> QuotaRecord {
    QuotaRecord {
        instances,
        cores,
        ram_mib,
    }
}

// =============================================================================
// Fake Compute + Identity
// =============================================================================

/// An in-memory cloud. Tenants without a quota entry are unknown to the
/// compute service.
#[derive(Default)]
pub struct FakeCloud {
    pub projects: Vec<Project>,
    pub users: Vec<User>,
    pub assignments: Vec<RoleAssignment>,
    pub public_flavors: Vec<Flavor>,
    pub private_flavors: Vec<Flavor>,
    pub instances: HashMap<String, Vec<Instance>>,
    pub quotas: HashMap<String, QuotaRecord>,
    pub usages: Vec<TenantUsage>,
    pub aggregates: Vec<Aggregate>,
    /// When set, identity lookups fail with a transport error.
    pub identity_down: bool,
    /// Tenant ids whose instances were listed, in call order.
    pub instance_calls: Mutex<Vec<String>>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, id: &str, name: &str) -> Self {
        self.projects.push(Project {
            id: id.to_string(),
            name: name.to_string(),
            allocation_home: None,
        });
        self
    }

    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.public_flavors.push(flavor);
        self
    }

    pub fn with_quota(mut self, tenant_id: &str, quota: QuotaRecord) -> Self {
        self.quotas.insert(tenant_id.to_string(), quota);
        self
    }

    /// Add `count` instances of a flavor to a tenant.
    pub fn with_instances(mut self, tenant_id: &str, flavor_id: &str, count: usize) -> Self {
        let list = self.instances.entry(tenant_id.to_string()).or_default();
        for _ in 0..count {
            let id = format!("{}-vm-{}", tenant_id, list.len());
            list.push(Instance {
                id,
                flavor_id: flavor_id.to_string(),
            });
        }
        self
    }

    pub fn instance_calls(&self) -> Vec<String> {
        self.instance_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityService for FakeCloud {
    async fn resolve_tenant(&self, name_or_id: &str) -> Result<Tenant, ClientError> {
        if self.identity_down {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        self.projects
            .iter()
            .find(|p| p.id == name_or_id)
            .or_else(|| self.projects.iter().find(|p| p.name == name_or_id))
            .cloned()
            .map(Tenant::from)
            .ok_or_else(|| ClientError::NotFound(format!("tenant {}", name_or_id)))
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        Ok(self.projects.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        Ok(self.users.clone())
    }

    async fn list_role_assignments(
        &self,
        _role_id: &str,
    ) -> Result<Vec<RoleAssignment>, ClientError> {
        Ok(self.assignments.clone())
    }
}

#[async_trait]
impl ComputeService for FakeCloud {
    async fn list_flavors(&self, public: bool) -> Result<Vec<Flavor>, ClientError> {
        Ok(if public {
            self.public_flavors.clone()
        } else {
            self.private_flavors.clone()
        })
    }

    async fn list_instances(&self, tenant_id: &str) -> Result<Vec<Instance>, ClientError> {
        self.instance_calls
            .lock()
            .unwrap()
            .push(tenant_id.to_string());
        Ok(self.instances.get(tenant_id).cloned().unwrap_or_default())
    }

    async fn get_quota(&self, tenant_id: &str) -> Result<QuotaRecord, ClientError> {
        self.quotas
            .get(tenant_id)
            .copied()
            .ok_or_else(|| ClientError::NotFound(format!("quota set {}", tenant_id)))
    }

    async fn list_usage(
        &self,
        _start: NaiveDateTime,
        _end: NaiveDateTime,
    ) -> Result<Vec<TenantUsage>, ClientError> {
        Ok(self.usages.clone())
    }

    async fn list_aggregates(&self) -> Result<Vec<Aggregate>, ClientError> {
        Ok(self.aggregates.clone())
    }
}

// =============================================================================
// Fake Registry
// =============================================================================

#[derive(Default)]
pub struct FakeRegistry {
    pub allocations: Vec<AllocationRecord>,
    pub quotas: Vec<QuotaRow>,
    /// When set, every call fails as if the registry were down.
    pub down: bool,
}

impl FakeRegistry {
    pub fn new(allocations: Vec<AllocationRecord>) -> Self {
        Self {
            allocations,
            ..Default::default()
        }
    }
}

#[async_trait]
impl AllocationRegistry for FakeRegistry {
    async fn list_allocations(&self) -> Result<Vec<AllocationRecord>, ClientError> {
        if self.down {
            return Err(ClientError::Upstream {
                status: 503,
                message: "allocations: unavailable".to_string(),
            });
        }
        Ok(self.allocations.clone())
    }

    async fn list_quotas(&self) -> Result<Vec<QuotaRow>, ClientError> {
        Ok(self.quotas.clone())
    }
}
