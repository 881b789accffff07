//! Quota reversion audit.
//!
//! After a temporary bulk quota increase, decide per tenant whether the live
//! quota can safely go back to the allocation. The rules below are evaluated
//! in order and the first match decides; later rules rely on earlier ones
//! having failed.
//!
//! 1. Ledger supplied, tenant not in it: skipped.
//! 2. Live quota unreadable: skipped.
//! 3. Live quota already equals the allocation: `no - quotas match`.
//! 4. Live usage above the allocation: `no - over-quota usage`.
//! 5. Ledger entry present, live quota does not match allocation + delta:
//!    `no - deltas wrong`. RAM matches when it is either the allocated RAM
//!    or the allocated RAM plus the delta's RAM.
//! 6. Otherwise: `yes`.

use super::{tenant_usage, FlavorCatalog, ReconcileError, Reconciler};
use crate::ledger::{Delta, DeltaLedger};
use crate::model::{AllocationRecord, QuotaLookup, QuotaRecord, UsageSnapshot, MIB_PER_GIB};
use crate::report::{cell, Report};
use std::fmt;

/// Classification of one tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertVerdict {
    QuotasMatch,
    OverQuotaUsage,
    DeltasWrong,
    Revert,
}

impl RevertVerdict {
    pub fn as_str(self) -> &'static str {
        match self {
            RevertVerdict::QuotasMatch => "no - quotas match",
            RevertVerdict::OverQuotaUsage => "no - over-quota usage",
            RevertVerdict::DeltasWrong => "no - deltas wrong",
            RevertVerdict::Revert => "yes",
        }
    }
}

impl fmt::Display for RevertVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quota the ledger predicts: allocation plus delta, with RAM following
/// cores.
pub fn expected_quota(allocated: &QuotaRecord, delta: &Delta) -> QuotaRecord {
    QuotaRecord {
        instances: allocated.instances + delta.instances,
        cores: allocated.cores + delta.cores,
        ram_mib: allocated.ram_mib + delta.ram_gib() * MIB_PER_GIB,
    }
}

/// True when the live quota is what the ledger entry predicts.
///
/// Instances and cores must equal allocation + delta. Bulk increases were
/// not always applied to RAM, so live RAM may be either the allocated RAM or
/// the allocated RAM plus the delta's share.
pub fn delta_matches(allocated: &QuotaRecord, live: &QuotaRecord, delta: &Delta) -> bool {
    let expected = expected_quota(allocated, delta);
    live.instances == expected.instances
        && live.cores == expected.cores
        && (live.ram_mib == expected.ram_mib || live.ram_mib == allocated.ram_mib)
}

/// Rules 3 to 6 for a tenant whose live quota is known.
pub fn classify(
    allocated: &QuotaRecord,
    live: &QuotaRecord,
    usage: &UsageSnapshot,
    delta: Option<&Delta>,
) -> RevertVerdict {
    if live == allocated {
        return RevertVerdict::QuotasMatch;
    }
    if usage.exceeds(allocated) {
        return RevertVerdict::OverQuotaUsage;
    }
    if let Some(delta) = delta {
        if !delta_matches(allocated, live, delta) {
            return RevertVerdict::DeltasWrong;
        }
    }
    RevertVerdict::Revert
}

/// One classified tenant.
#[derive(Debug, Clone, PartialEq)]
pub struct RevertRow {
    pub allocation: AllocationRecord,
    pub live: QuotaRecord,
    /// Not computed when the quotas already match.
    pub usage: Option<UsageSnapshot>,
    pub delta: Option<Delta>,
    pub verdict: RevertVerdict,
}

/// Result of the reversion audit.
#[derive(Debug, Clone, Default)]
pub struct ReversionOutcome {
    pub considered: usize,
    /// Tenants skipped because the supplied ledger has no entry for them.
    pub not_in_ledger: usize,
    /// Tenants skipped because their quota could not be read.
    pub missing: Vec<String>,
    pub rows: Vec<RevertRow>,
}

impl ReversionOutcome {
    pub fn count(&self, verdict: RevertVerdict) -> usize {
        self.rows.iter().filter(|r| r.verdict == verdict).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} allocations, {} not in ledger, {} missing tenants, {} revertable",
            self.considered,
            self.not_in_ledger,
            self.missing.len(),
            self.count(RevertVerdict::Revert)
        )
    }

    pub fn report(&self) -> Report {
        let mut report = Report::new([
            "Tenant ID",
            "Tenant Name",
            "Allocated instances",
            "Allocated vCPUs",
            "Allocated RAM",
            "Live instances",
            "Live vCPUs",
            "Live RAM",
            "Used instances",
            "Used vCPUs",
            "Used RAM",
            "Instance delta",
            "vCPU delta",
            "Revert",
        ])
        .with_status_column(13);

        for row in &self.rows {
            let a = &row.allocation;
            report.push_row(vec![
                a.tenant().unwrap_or_default().to_string(),
                a.display_name().to_string(),
                a.instance_quota.to_string(),
                a.core_quota.to_string(),
                a.ram_quota_mib().to_string(),
                row.live.instances.to_string(),
                row.live.cores.to_string(),
                row.live.ram_mib.to_string(),
                cell(row.usage.map(|u| u.instance_count)),
                cell(row.usage.map(|u| u.vcpu_total)),
                cell(row.usage.map(|u| u.ram_total_mib)),
                cell(row.delta.map(|d| d.instances)),
                cell(row.delta.map(|d| d.cores)),
                row.verdict.to_string(),
            ]);
        }
        report
    }
}

impl Reconciler<'_> {
    /// Classify every tenant with a current allocation for reversion.
    ///
    /// With no ledger, or an empty one, nothing is skipped for lack of a
    /// ledger entry and rule 5 never applies.
    pub async fn revert_quotas(
        &self,
        ledger: Option<&DeltaLedger>,
    ) -> Result<ReversionOutcome, ReconcileError> {
        let ledger = ledger.filter(|l| !l.is_empty());
        if ledger.is_none() {
            tracing::info!("No ledger entries, running in observe-only mode");
        }

        let allocations = self.current_allocations().await?;
        let catalog = FlavorCatalog::load(self.compute).await?;
        let mut outcome = ReversionOutcome {
            considered: allocations.len(),
            ..Default::default()
        };

        for (tenant_id, allocation) in allocations {
            let delta = match ledger {
                Some(ledger) => match ledger.get(&tenant_id) {
                    Some(delta) => Some(*delta),
                    None => {
                        outcome.not_in_ledger += 1;
                        continue;
                    }
                },
                None => None,
            };

            let live = match self.lookup_quota(&tenant_id).await {
                QuotaLookup::Found(quota) => quota,
                QuotaLookup::Missing { .. } => {
                    outcome.missing.push(tenant_id);
                    continue;
                }
            };

            let allocated = allocation.quota();
            let (usage, verdict) = if live == allocated {
                (None, RevertVerdict::QuotasMatch)
            } else {
                let usage = tenant_usage(self.compute, &catalog, &tenant_id).await?;
                let verdict = classify(&allocated, &live, &usage, delta.as_ref());
                (Some(usage), verdict)
            };

            tracing::debug!(%tenant_id, %verdict, "Classified tenant");
            outcome.rows.push(RevertRow {
                allocation,
                live,
                usage,
                delta,
                verdict,
            });
        }

        tracing::info!("{}", outcome.summary());
        Ok(outcome)
    }
}
