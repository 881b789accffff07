//! Single-tenant comparison of allocation, quota and usage.

use super::{select_for_tenant, tenant_usage, FlavorCatalog, ReconcileError, Reconciler};
use crate::model::{AllocationRecord, QuotaRecord, Tenant, UsageSnapshot, MIB_PER_GIB};
use std::fmt;

/// A quota dimension compared independently of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Instances,
    Cores,
    Ram,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Instances, Dimension::Cores, Dimension::Ram];

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Instances => "Instance quota",
            Dimension::Cores => "VCPU quota",
            Dimension::Ram => "RAM quota",
        }
    }

    fn of_quota(self, quota: &QuotaRecord) -> i64 {
        match self {
            Dimension::Instances => quota.instances,
            Dimension::Cores => quota.cores,
            Dimension::Ram => quota.ram_mib,
        }
    }

    fn of_usage(self, usage: &UsageSnapshot) -> i64 {
        match self {
            Dimension::Instances => usage.instance_count,
            Dimension::Cores => usage.vcpu_total,
            Dimension::Ram => usage.ram_total_mib,
        }
    }
}

/// One dimension where the allocation and the live quota disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discrepancy {
    pub dimension: Dimension,
    pub allocated: i64,
    pub live: i64,
    pub used: i64,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mismatch: allocated {}, live {}, used {}",
            self.dimension.label(),
            self.allocated,
            self.live,
            self.used
        )
    }
}

/// Compare each dimension of the allocation against the live quota.
pub fn discrepancies(
    allocated: &QuotaRecord,
    live: &QuotaRecord,
    usage: &UsageSnapshot,
) -> Vec<Discrepancy> {
    Dimension::ALL
        .into_iter()
        .filter(|d| d.of_quota(allocated) != d.of_quota(live))
        .map(|d| Discrepancy {
            dimension: d,
            allocated: d.of_quota(allocated),
            live: d.of_quota(live),
            used: d.of_usage(usage),
        })
        .collect()
}

/// Everything known about one tenant.
#[derive(Debug, Clone)]
pub struct CompareOutcome {
    pub tenant: Tenant,
    pub quota: QuotaRecord,
    pub usage: UsageSnapshot,
    /// None when the tenant has no approved or extended allocation.
    pub allocation: Option<AllocationRecord>,
    pub discrepancies: Vec<Discrepancy>,
}

impl CompareOutcome {
    /// Human-readable lines, in print order. The summary lines show RAM in
    /// whole GiB; mismatch lines keep MiB, the unit being compared.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "live quota: instances {}, cores {}, ram {} GiB",
                self.quota.instances,
                self.quota.cores,
                self.quota.ram_mib / MIB_PER_GIB
            ),
            format!(
                "live usage: instances {}, cores {}, ram {} GiB",
                self.usage.instance_count,
                self.usage.vcpu_total,
                self.usage.ram_total_mib / MIB_PER_GIB
            ),
        ];
        match &self.allocation {
            None => lines.push(format!(
                "No approved allocation records for tenant {} / {}",
                self.tenant.id, self.tenant.name
            )),
            Some(_) => lines.extend(self.discrepancies.iter().map(ToString::to_string)),
        }
        lines
    }
}

impl Reconciler<'_> {
    /// Compare allocation, live quota and live usage of one tenant.
    pub async fn compare_tenant(&self, name_or_id: &str) -> Result<CompareOutcome, ReconcileError> {
        let tenant = self
            .identity
            .resolve_tenant(name_or_id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ReconcileError::TenantNotFound(name_or_id.to_string())
                } else {
                    ReconcileError::Client(e)
                }
            })?;
        tracing::debug!(id = %tenant.id, name = %tenant.name, "Resolved tenant");

        let quota = self.compute.get_quota(&tenant.id).await?;
        let catalog = FlavorCatalog::load(self.compute).await?;
        let usage = tenant_usage(self.compute, &catalog, &tenant.id).await?;

        let records = self.registry.list_allocations().await?;
        let allocation = select_for_tenant(&records, &tenant.id);
        let found = allocation
            .as_ref()
            .map(|a| discrepancies(&a.quota(), &quota, &usage))
            .unwrap_or_default();

        Ok(CompareOutcome {
            tenant,
            quota,
            usage,
            allocation,
            discrepancies: found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quota(instances: i64, cores: i64, ram_mib: i64) -> QuotaRecord {
        QuotaRecord {
            instances,
            cores,
            ram_mib,
        }
    }

    fn usage() -> UsageSnapshot {
        UsageSnapshot {
            instance_count: 3,
            vcpu_total: 6,
            ram_total_mib: 12288,
        }
    }

    #[test]
    fn test_no_discrepancies_when_equal() {
        let q = quota(4, 8, 32768);
        assert!(discrepancies(&q, &q, &usage()).is_empty());
    }

    #[test]
    fn test_each_dimension_reported_independently() {
        let found = discrepancies(&quota(4, 8, 32768), &quota(4, 12, 49152), &usage());
        assert_eq!(found.len(), 2);
        assert_eq!(
            found[0].to_string(),
            "VCPU quota mismatch: allocated 8, live 12, used 6"
        );
        assert_eq!(
            found[1].to_string(),
            "RAM quota mismatch: allocated 32768, live 49152, used 12288"
        );
    }

    #[test]
    fn test_instance_line() {
        let found = discrepancies(&quota(4, 8, 32768), &quota(10, 8, 32768), &usage());
        assert_eq!(
            found[0].to_string(),
            "Instance quota mismatch: allocated 4, live 10, used 3"
        );
    }

    #[test]
    fn test_lines_without_allocation() {
        let outcome = CompareOutcome {
            tenant: Tenant {
                id: "t1".to_string(),
                name: "alpha".to_string(),
            },
            quota: quota(1, 1, 1024),
            usage: UsageSnapshot::default(),
            allocation: None,
            discrepancies: vec![],
        };
        let lines = outcome.lines();
        assert_eq!(
            lines.last().unwrap(),
            "No approved allocation records for tenant t1 / alpha"
        );
    }
}
