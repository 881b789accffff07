//! Supplementary inventory reports.
//!
//! Read-only listings of the allocation registry, identity projects and
//! compute inventory. Each report is built by a pure function from already
//! fetched records, with a thin async wrapper doing the fetching.

pub mod aggregates;
pub mod allocations;
pub mod projects;
pub mod usage;

pub use aggregates::{aggregate_report, aggregates};
pub use allocations::{allocations, allocations_report, local_quota_report, local_quotas};
pub use projects::{
    allocation_home_report, allocation_homes, allocation_manager_report, allocation_managers,
    ManagerIndex,
};
pub use usage::{instance_usage, instance_usage_report, UsageWindow};
