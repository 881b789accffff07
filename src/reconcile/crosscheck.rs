//! Fleet-wide cross-checks of allocations against live usage and quota.

use super::{tenant_usage, FlavorCatalog, ReconcileError, Reconciler};
use crate::model::{AllocationRecord, QuotaLookup, QuotaRecord, UsageSnapshot};
use crate::report::Report;

/// A tenant whose live usage is above its allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageMismatch {
    pub allocation: AllocationRecord,
    pub usage: UsageSnapshot,
}

/// Result of the usage-vs-allocation cross-check.
#[derive(Debug, Clone, Default)]
pub struct UsageCrosscheck {
    pub considered: usize,
    /// Usage lookups abort the run instead of failing per tenant, so this
    /// stays empty; kept so both cross-checks summarise the same way.
    pub missing: Vec<AllocationRecord>,
    pub mismatches: Vec<UsageMismatch>,
}

impl UsageCrosscheck {
    pub fn summary(&self) -> String {
        format!(
            "{} allocations, {} missing tenants, {} usage mismatches",
            self.considered,
            self.missing.len(),
            self.mismatches.len()
        )
    }

    pub fn report(&self) -> Report {
        let mut report = Report::new([
            "Tenant ID",
            "Tenant Name",
            "Modified time",
            "Instances",
            "Live instances",
            "vCPU quota",
            "Live vCPU usage",
            "RAM quota",
            "Live RAM usage",
        ]);
        for m in &self.mismatches {
            let a = &m.allocation;
            report.push_row(vec![
                a.tenant().unwrap_or_default().to_string(),
                a.display_name().to_string(),
                a.modified_display(),
                a.instance_quota.to_string(),
                m.usage.instance_count.to_string(),
                a.core_quota.to_string(),
                m.usage.vcpu_total.to_string(),
                a.ram_quota_mib().to_string(),
                m.usage.ram_total_mib.to_string(),
            ]);
        }
        report
    }
}

/// A tenant whose live quota differs from its allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaMismatch {
    pub allocation: AllocationRecord,
    pub quota: QuotaRecord,
}

/// Result of the quota-vs-allocation cross-check.
#[derive(Debug, Clone, Default)]
pub struct QuotaCrosscheck {
    pub considered: usize,
    /// Tenants whose quota lookup failed.
    pub missing: Vec<AllocationRecord>,
    pub mismatches: Vec<QuotaMismatch>,
}

impl QuotaCrosscheck {
    pub fn summary(&self) -> String {
        format!(
            "{} allocations, {} missing tenants, {} quota mismatches",
            self.considered,
            self.missing.len(),
            self.mismatches.len()
        )
    }

    pub fn report(&self) -> Report {
        let mut report = Report::new([
            "Tenant ID",
            "Tenant Name",
            "Modified time",
            "Instances",
            "Live instances",
            "vCPU quota",
            "Live vCPU quota",
            "RAM quota",
            "Live RAM quota",
        ]);
        for m in &self.mismatches {
            let a = &m.allocation;
            report.push_row(vec![
                a.tenant().unwrap_or_default().to_string(),
                a.display_name().to_string(),
                a.modified_display(),
                a.instance_quota.to_string(),
                m.quota.instances.to_string(),
                a.core_quota.to_string(),
                m.quota.cores.to_string(),
                a.ram_quota_mib().to_string(),
                m.quota.ram_mib.to_string(),
            ]);
        }
        report
    }
}

impl Reconciler<'_> {
    /// Flag tenants whose live usage exceeds their allocation in any
    /// dimension.
    pub async fn crosscheck_usage(&self) -> Result<UsageCrosscheck, ReconcileError> {
        let allocations = self.current_allocations().await?;
        let catalog = FlavorCatalog::load(self.compute).await?;

        let mut outcome = UsageCrosscheck {
            considered: allocations.len(),
            ..Default::default()
        };
        for (tenant_id, allocation) in allocations {
            let usage = tenant_usage(self.compute, &catalog, &tenant_id).await?;
            if usage.exceeds(&allocation.quota()) {
                tracing::debug!(%tenant_id, ?usage, "Usage above allocation");
                outcome.mismatches.push(UsageMismatch { allocation, usage });
            }
        }

        tracing::info!("{}", outcome.summary());
        Ok(outcome)
    }

    /// Flag tenants whose live quota differs from their allocation.
    /// Tenants without a readable quota go to the missing bucket.
    pub async fn crosscheck_quotas(&self) -> Result<QuotaCrosscheck, ReconcileError> {
        let allocations = self.current_allocations().await?;

        let mut outcome = QuotaCrosscheck {
            considered: allocations.len(),
            ..Default::default()
        };
        for (tenant_id, allocation) in allocations {
            match self.lookup_quota(&tenant_id).await {
                QuotaLookup::Missing { .. } => outcome.missing.push(allocation),
                QuotaLookup::Found(quota) => {
                    if quota != allocation.quota() {
                        tracing::debug!(%tenant_id, ?quota, "Quota differs from allocation");
                        outcome.mismatches.push(QuotaMismatch { allocation, quota });
                    }
                }
            }
        }

        tracing::info!("{}", outcome.summary());
        Ok(outcome)
    }
}
