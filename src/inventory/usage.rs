//! Accumulated instance usage per tenant over a time window.

use crate::clients::{ClientError, ComputeService, IdentityService};
use crate::model::{Project, TenantUsage};
use crate::report::{cell, Report};
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Minute precision, no timezone.
pub const WINDOW_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl UsageWindow {
    /// Parse a window bound such as `2016-03-01T00:00`.
    pub fn parse_bound(value: &str) -> Result<NaiveDateTime, String> {
        NaiveDateTime::parse_from_str(value, WINDOW_FORMAT)
            .map_err(|e| format!("expected YYYY-MM-DDTHH:MM, got '{}': {}", value, e))
    }
}

pub fn instance_usage_report(usages: &[TenantUsage], projects: &[Project]) -> Report {
    let names: HashMap<&str, &str> = projects
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str()))
        .collect();

    let mut report = Report::new([
        "Tenant ID",
        "Tenant Name",
        "Instance count",
        "Instance hours",
        "vCPU hours",
        "Memory Hours (MB)",
        "Disk hours (GB)",
    ]);
    for u in usages {
        report.push_row(vec![
            u.tenant_id.clone(),
            cell(names.get(u.tenant_id.as_str())),
            u.server_usages.len().to_string(),
            u.total_hours.to_string(),
            u.total_vcpus_usage.to_string(),
            u.total_memory_mb_usage.to_string(),
            u.total_local_gb_usage.to_string(),
        ]);
    }
    report
}

pub async fn instance_usage(
    identity: &dyn IdentityService,
    compute: &dyn ComputeService,
    window: UsageWindow,
) -> Result<Report, ClientError> {
    let projects = identity.list_projects().await?;
    let usages = compute.list_usage(window.start, window.end).await?;
    tracing::debug!(tenants = usages.len(), "Fetched tenant usage");
    Ok(instance_usage_report(&usages, &projects))
}
