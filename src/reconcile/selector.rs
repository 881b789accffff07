//! Reduction of historical allocation records to one current record per
//! tenant.

use crate::model::AllocationRecord;
use std::collections::BTreeMap;

/// Current allocation per tenant id, iterated in tenant id order.
pub type CurrentAllocations = BTreeMap<String, AllocationRecord>;

/// Pick the current allocation of every tenant.
///
/// Only approved or extended records with a tenant id and a modification
/// time are eligible. Among a tenant's eligible records the one with the
/// latest `modified_time` wins; on equal times the record seen first is kept.
pub fn select_current<I>(records: I) -> CurrentAllocations
where
    I: IntoIterator<Item = AllocationRecord>,
{
    let mut current = CurrentAllocations::new();
    for record in records {
        if !record.is_eligible() {
            continue;
        }
        let Some(tenant_id) = record.tenant().map(str::to_string) else {
            continue;
        };
        match current.get(&tenant_id) {
            Some(kept) if record.modified_time <= kept.modified_time => {}
            _ => {
                current.insert(tenant_id, record);
            }
        }
    }
    current
}

/// The current allocation of a single tenant, by the same rule as
/// [`select_current`].
pub fn select_for_tenant<'a, I>(records: I, tenant_id: &str) -> Option<AllocationRecord>
where
    I: IntoIterator<Item = &'a AllocationRecord>,
{
    select_current(
        records
            .into_iter()
            .filter(|r| r.tenant() == Some(tenant_id))
            .cloned(),
    )
    .remove(tenant_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AllocationStatus;
    use chrono::{TimeZone, Utc};

    fn record(tenant: Option<&str>, status: &str, day: u32, cores: i64) -> AllocationRecord {
        AllocationRecord {
            id: i64::from(day),
            tenant_id: tenant.map(str::to_string),
            tenant_name: tenant.map(|t| format!("name-{}", t)),
            project_name: None,
            allocation_home: None,
            status: AllocationStatus::from(status.to_string()),
            modified_time: Some(Utc.with_ymd_and_hms(2016, 1, day, 0, 0, 0).unwrap()),
            instance_quota: 2,
            core_quota: cores,
            ram_quota: 8,
            field_of_research_1: None,
            for_percentage_1: None,
            field_of_research_2: None,
            for_percentage_2: None,
            field_of_research_3: None,
            for_percentage_3: None,
        }
    }

    #[test]
    fn test_latest_record_wins() {
        let current = select_current(vec![
            record(Some("t1"), "A", 1, 2),
            record(Some("t1"), "X", 5, 8),
            record(Some("t1"), "A", 3, 4),
        ]);
        assert_eq!(current.len(), 1);
        assert_eq!(current["t1"].core_quota, 8);
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let current = select_current(vec![
            record(Some("t1"), "A", 2, 2),
            record(Some("t1"), "A", 2, 16),
        ]);
        assert_eq!(current["t1"].core_quota, 2);
    }

    #[test]
    fn test_ineligible_records_dropped() {
        let current = select_current(vec![
            record(Some("t1"), "R", 9, 64),
            record(Some("t1"), "A", 1, 2),
            record(Some("t2"), "N", 1, 2),
            record(Some(""), "A", 1, 2),
            record(None, "X", 1, 2),
        ]);
        assert_eq!(current.keys().collect::<Vec<_>>(), vec!["t1"]);
        assert_eq!(current["t1"].core_quota, 2);
    }

    #[test]
    fn test_undated_record_is_skipped() {
        let mut undated = record(Some("t1"), "A", 9, 64);
        undated.modified_time = None;
        let current = select_current(vec![record(Some("t1"), "A", 1, 2), undated]);
        assert_eq!(current["t1"].core_quota, 2);
    }

    #[test]
    fn test_newer_declined_does_not_shadow_approved() {
        let current = select_current(vec![
            record(Some("t1"), "A", 1, 2),
            record(Some("t1"), "J", 20, 32),
        ]);
        assert_eq!(current["t1"].core_quota, 2);
    }

    #[test]
    fn test_select_for_tenant() {
        let records = vec![
            record(Some("t1"), "A", 1, 2),
            record(Some("t2"), "A", 9, 99),
            record(Some("t1"), "X", 4, 6),
        ];
        let current = select_for_tenant(&records, "t1").unwrap();
        assert_eq!(current.core_quota, 6);
        assert!(select_for_tenant(&records, "t3").is_none());
    }
}
