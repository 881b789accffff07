//! Registry listings: raw allocation records and per-zone quota rows.

use crate::clients::{AllocationRegistry, ClientError};
use crate::model::{AllocationRecord, QuotaRow};
use crate::report::{cell, Report};
use std::collections::{BTreeMap, HashMap};

/// Every allocation record, as stored.
pub fn allocations_report(records: &[AllocationRecord]) -> Report {
    let mut report = Report::new([
        "Tenant ID",
        "Tenant Name",
        "Project Name",
        "Allocation Home",
        "Status",
        "Modified time",
        "Instances",
        "vCPU quota",
        "RAM quota",
        "FOR 1",
        "FOR 1 weighting (%)",
        "FOR 2",
        "FOR 2 weighting (%)",
        "FOR 3",
        "FOR 3 weighting (%)",
    ]);
    for r in records {
        report.push_row(vec![
            r.tenant_id.clone().unwrap_or_default(),
            r.tenant_name.clone().unwrap_or_default(),
            r.project_name.clone().unwrap_or_default(),
            r.allocation_home.clone().unwrap_or_default(),
            r.status.to_string(),
            r.modified_display(),
            r.instance_quota.to_string(),
            r.core_quota.to_string(),
            r.ram_quota.to_string(),
            cell(r.field_of_research_1.as_deref()),
            cell(r.for_percentage_1),
            cell(r.field_of_research_2.as_deref()),
            cell(r.for_percentage_2),
            cell(r.field_of_research_3.as_deref()),
            cell(r.for_percentage_3),
        ]);
    }
    report
}

pub async fn allocations(registry: &dyn AllocationRegistry) -> Result<Report, ClientError> {
    let records = registry.list_allocations().await?;
    Ok(allocations_report(&records))
}

/// Per-allocation quota rows pivoted into one column per
/// `<zone>-<resource> (<units>)`.
///
/// Columns appear in first-seen order. An allocation without a value for
/// some column reports `0`. Rows pointing at an unknown allocation id are
/// dropped.
pub fn local_quota_report(
    records: &[AllocationRecord],
    quotas: &[QuotaRow],
    zone: Option<&str>,
) -> Report {
    let by_id: HashMap<i64, &AllocationRecord> = records.iter().map(|r| (r.id, r)).collect();

    let mut labels: Vec<String> = Vec::new();
    let mut values: BTreeMap<i64, HashMap<String, String>> = BTreeMap::new();
    for row in quotas {
        if zone.is_some_and(|z| z != row.zone) {
            continue;
        }
        let label = row.label();
        if !labels.contains(&label) {
            labels.push(label.clone());
        }
        values
            .entry(row.allocation)
            .or_default()
            .insert(label, row.quota.to_string());
    }

    let mut report = Report::new(
        ["Tenant ID", "Tenant Name"]
            .into_iter()
            .map(String::from)
            .chain(labels.iter().cloned()),
    );
    for (allocation_id, quota) in values {
        let Some(record) = by_id.get(&allocation_id) else {
            tracing::warn!(allocation_id, "Quota rows reference an unknown allocation");
            continue;
        };
        let mut row = vec![
            record.tenant_id.clone().unwrap_or_default(),
            record.display_name().to_string(),
        ];
        row.extend(
            labels
                .iter()
                .map(|label| quota.get(label).cloned().unwrap_or_else(|| "0".to_string())),
        );
        report.push_row(row);
    }
    report
}

pub async fn local_quotas(
    registry: &dyn AllocationRegistry,
    zone: Option<&str>,
) -> Result<Report, ClientError> {
    let records = registry.list_allocations().await?;
    let quotas = registry.list_quotas().await?;
    Ok(local_quota_report(&records, &quotas, zone))
}
