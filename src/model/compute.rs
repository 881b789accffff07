//! Compute service entities and derived usage figures.

use serde::{Deserialize, Serialize};

/// Resource footprint of an instance type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flavor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub vcpus: i64,
    /// MiB.
    pub ram: i64,
}

/// A live server instance. Only the flavor reference matters here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub flavor_id: String,
}

/// Quota limits in compute-service units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuotaRecord {
    pub instances: i64,
    pub cores: i64,
    pub ram_mib: i64,
}

/// Outcome of a per-tenant quota lookup.
///
/// A failed lookup (tenant not provisioned, transient upstream error) is a
/// classification input rather than a run-aborting error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaLookup {
    Found(QuotaRecord),
    Missing { reason: String },
}

impl QuotaLookup {
    pub fn found(&self) -> Option<&QuotaRecord> {
        match self {
            QuotaLookup::Found(quota) => Some(quota),
            QuotaLookup::Missing { .. } => None,
        }
    }
}

/// Instantaneous resource consumption of one tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub instance_count: i64,
    pub vcpu_total: i64,
    pub ram_total_mib: i64,
}

impl UsageSnapshot {
    /// Add one instance of the given flavor.
    pub fn add(&mut self, flavor: &Flavor) {
        self.instance_count += 1;
        self.vcpu_total += flavor.vcpus;
        self.ram_total_mib += flavor.ram;
    }

    /// True when any dimension is strictly above the quota.
    pub fn exceeds(&self, quota: &QuotaRecord) -> bool {
        self.instance_count > quota.instances
            || self.vcpu_total > quota.cores
            || self.ram_total_mib > quota.ram_mib
    }
}

/// Accumulated usage of a tenant over a reporting window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TenantUsage {
    pub tenant_id: String,
    #[serde(default)]
    pub server_usages: Vec<serde_json::Value>,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub total_vcpus_usage: f64,
    #[serde(default)]
    pub total_memory_mb_usage: f64,
    #[serde(default)]
    pub total_local_gb_usage: f64,
}

/// A host aggregate and its member hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    pub name: String,
    #[serde(default)]
    pub availability_zone: Option<String>,
    #[serde(default)]
    pub hosts: Vec<String>,
}
