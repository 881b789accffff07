//! Typed records exchanged with the identity, compute and allocations
//! services.

pub mod allocation;
pub mod compute;
pub mod identity;
mod serde_helpers;

pub use allocation::{AllocationRecord, AllocationStatus, QuotaRow, MIB_PER_GIB};
pub use compute::{
    Aggregate, Flavor, Instance, QuotaLookup, QuotaRecord, TenantUsage, UsageSnapshot,
};
pub use identity::{Project, RoleAssignment, Tenant, User};
