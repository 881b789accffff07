//! Error types for reconciliation workflows.

use crate::clients::ClientError;
use thiserror::Error;

/// Run-aborting reconciliation failures.
///
/// Per-tenant quota lookup failures never surface here; they become
/// [`QuotaLookup::Missing`](crate::model::QuotaLookup::Missing).
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// A service call outside the per-tenant recoverable set failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A live instance references a flavor missing from both catalogs.
    #[error("instance {instance_id} of tenant {tenant_id} uses unknown flavor {flavor_id}")]
    UnknownFlavor {
        tenant_id: String,
        instance_id: String,
        flavor_id: String,
    },

    /// The identity service has no tenant with this name or id.
    #[error("Tenant {0} not found in the identity service")]
    TenantNotFound(String),
}
