//! Allocation, quota and usage reconciliation for an OpenStack cloud.
//!
//! Approved allocations live in an external registry; enforced quotas and
//! running instances live in the compute service. The [`reconcile`]
//! workflows join the three and report where they disagree.

pub mod cli;
pub mod clients;
pub mod config;
pub mod inventory;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod report;
