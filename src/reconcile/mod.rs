//! Allocation reconciliation.
//!
//! Every workflow starts from the registry's full allocation history,
//! reduces it to one current record per tenant and joins that against live
//! compute data:
//!
//! - [`Reconciler::crosscheck_usage`]: live usage above the allocation
//! - [`Reconciler::crosscheck_quotas`]: live quota differing from the allocation
//! - [`Reconciler::compare_tenant`]: both views for one tenant
//! - [`Reconciler::revert_quotas`]: whether a bulk quota bump can be undone
//!
//! Tenants are processed one at a time, in tenant id order.

pub mod catalog;
pub mod compare;
pub mod crosscheck;
pub mod error;
pub mod reversion;
pub mod selector;
pub mod usage;

pub use catalog::FlavorCatalog;
pub use compare::{CompareOutcome, Dimension, Discrepancy};
pub use crosscheck::{QuotaCrosscheck, QuotaMismatch, UsageCrosscheck, UsageMismatch};
pub use error::ReconcileError;
pub use reversion::{RevertRow, RevertVerdict, ReversionOutcome};
pub use selector::{select_current, select_for_tenant, CurrentAllocations};
pub use usage::tenant_usage;

use crate::clients::{AllocationRegistry, ComputeService, IdentityService};
use crate::model::QuotaLookup;

/// Runs reconciliation workflows against a set of service clients.
pub struct Reconciler<'a> {
    identity: &'a dyn IdentityService,
    compute: &'a dyn ComputeService,
    registry: &'a dyn AllocationRegistry,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        identity: &'a dyn IdentityService,
        compute: &'a dyn ComputeService,
        registry: &'a dyn AllocationRegistry,
    ) -> Self {
        Self {
            identity,
            compute,
            registry,
        }
    }

    /// Fetch the registry history and reduce it to current allocations.
    ///
    /// A registry failure aborts the run.
    pub async fn current_allocations(&self) -> Result<CurrentAllocations, ReconcileError> {
        let records = self.registry.list_allocations().await?;
        let total = records.len();
        let current = select_current(records);
        tracing::info!(
            records = total,
            tenants = current.len(),
            "Selected current allocations"
        );
        Ok(current)
    }

    /// Live quota of a tenant, with any lookup failure folded into
    /// [`QuotaLookup::Missing`].
    pub async fn lookup_quota(&self, tenant_id: &str) -> QuotaLookup {
        match self.compute.get_quota(tenant_id).await {
            Ok(quota) => QuotaLookup::Found(quota),
            Err(e) => {
                tracing::warn!(tenant_id, error = %e, "Quota lookup failed");
                QuotaLookup::Missing {
                    reason: e.to_string(),
                }
            }
        }
    }
}
