//! Live usage aggregation.

use super::{FlavorCatalog, ReconcileError};
use crate::clients::ComputeService;
use crate::model::UsageSnapshot;

/// Sum the flavor footprint of every live instance owned by a tenant.
///
/// An instance whose flavor is in neither catalog aborts with
/// [`ReconcileError::UnknownFlavor`].
pub async fn tenant_usage(
    compute: &dyn ComputeService,
    catalog: &FlavorCatalog,
    tenant_id: &str,
) -> Result<UsageSnapshot, ReconcileError> {
    let instances = compute.list_instances(tenant_id).await?;
    let mut usage = UsageSnapshot::default();
    for instance in &instances {
        let flavor =
            catalog
                .get(&instance.flavor_id)
                .ok_or_else(|| ReconcileError::UnknownFlavor {
                    tenant_id: tenant_id.to_string(),
                    instance_id: instance.id.clone(),
                    flavor_id: instance.flavor_id.clone(),
                })?;
        usage.add(flavor);
    }
    tracing::trace!(tenant_id, ?usage, "Aggregated usage");
    Ok(usage)
}
