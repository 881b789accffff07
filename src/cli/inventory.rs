//! Inventory listing command handlers

use super::context::{connect_cloud, connect_compute, connect_identity, connect_registry};
use crate::cli::{AggregatesArgs, InstanceUsageArgs, ListingArgs, LocalQuotasArgs};
use crate::config::AuditConfig;
use crate::inventory;
use crate::report::{render, Destination, OutputFormat};

/// Handle `quota-audit allocations`
pub async fn handle_allocations(
    config: &AuditConfig,
    args: &ListingArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = connect_registry(config)?;
    let report = inventory::allocations(&registry).await?;
    render(&report, args.format, &args.destination())?;
    Ok(())
}

/// Handle `quota-audit local-quotas`
pub async fn handle_local_quotas(
    config: &AuditConfig,
    args: &LocalQuotasArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = connect_registry(config)?;
    let report = inventory::local_quotas(&registry, args.zone.as_deref()).await?;
    render(&report, args.listing.format, &args.listing.destination())?;
    Ok(())
}

/// Handle `quota-audit allocation-homes`
pub async fn handle_allocation_homes(
    config: &AuditConfig,
    args: &ListingArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let identity = connect_identity(config).await?;
    let report =
        inventory::allocation_homes(&identity, &config.identity.tenant_manager_role).await?;
    render(&report, args.format, &args.destination())?;
    Ok(())
}

/// Handle `quota-audit allocation-managers`
pub async fn handle_allocation_managers(
    config: &AuditConfig,
    args: &ListingArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let identity = connect_identity(config).await?;
    let report =
        inventory::allocation_managers(&identity, &config.identity.tenant_manager_role).await?;
    render(&report, args.format, &args.destination())?;
    Ok(())
}

/// Handle `quota-audit instance-usage`
pub async fn handle_instance_usage(
    config: &AuditConfig,
    args: &InstanceUsageArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let window = args.window();
    if window.start >= window.end {
        return Err(format!(
            "Usage window is empty: {} is not before {}",
            window.start, window.end
        )
        .into());
    }

    let cloud = connect_cloud(config).await?;
    let report = inventory::instance_usage(&cloud.identity, &cloud.compute, window).await?;
    render(&report, args.listing.format, &args.listing.destination())?;
    Ok(())
}

/// Handle `quota-audit aggregates`
pub async fn handle_aggregates(
    config: &AuditConfig,
    args: &AggregatesArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let compute = connect_compute(config).await?;
    let report = inventory::aggregates(&compute, &args.zone, &args.hosts).await?;
    render(&report, OutputFormat::Table, &Destination::Stdout)?;
    Ok(())
}
