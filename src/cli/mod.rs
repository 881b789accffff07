//! CLI module for quota-audit
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `crosscheck-usage` - Tenants using more than their allocation
//! - `crosscheck-quotas` - Tenants whose live quota differs from their allocation
//! - `compare-quotas` - Allocation, quota and usage of one tenant
//! - `revert-quotas` - Which tenants can go back to their allocated quota
//! - `allocations`, `local-quotas` - Registry listings
//! - `allocation-homes`, `allocation-managers` - Project ownership listings
//! - `instance-usage` - Usage per tenant over a time window
//! - `aggregates` - Host aggregate membership in a zone
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Usage mismatches as CSV
//! quota-audit crosscheck-usage -o usage.csv
//!
//! # Reversion audit against the ledger of a bulk quota bump
//! quota-audit revert-quotas --ledger bump.csv --format table
//! ```

pub mod completions;
pub mod config;
pub mod context;
pub mod inventory;
pub mod reconcile;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::inventory::UsageWindow;
use crate::report::{Destination, OutputFormat};
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// quota-audit - allocation, quota and usage reconciliation
#[derive(Parser, Debug)]
#[command(
    name = "quota-audit",
    version,
    about = "Reconcile approved allocations against live quotas and usage"
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "quota-audit.toml")]
    pub config: PathBuf,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report tenants whose live usage exceeds their allocation
    CrosscheckUsage(ReportArgs),
    /// Report tenants whose live quota differs from their allocation
    CrosscheckQuotas(ReportArgs),
    /// Compare allocation, live quota and live usage of one tenant
    CompareQuotas(CompareArgs),
    /// Decide which tenants can have their quota reverted to the allocation
    RevertQuotas(RevertArgs),
    /// List every allocation record
    Allocations(ListingArgs),
    /// List per-zone quotas attached to allocations
    LocalQuotas(LocalQuotasArgs),
    /// Show where each project's allocation belongs
    AllocationHomes(ListingArgs),
    /// Show tenant manager emails of each project
    AllocationManagers(ListingArgs),
    /// Report instance usage per tenant over a time window
    InstanceUsage(InstanceUsageArgs),
    /// Show host aggregate membership in an availability zone
    Aggregates(AggregatesArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output options of the reconciliation reports.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report layout
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
}

/// Output options of the inventory listings.
#[derive(Args, Debug)]
pub struct ListingArgs {
    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report layout
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl ReportArgs {
    pub fn destination(&self) -> Destination {
        self.output.clone().into()
    }
}

impl ListingArgs {
    pub fn destination(&self) -> Destination {
        self.output.clone().into()
    }
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Tenant id or name
    pub name_or_id: String,
}

#[derive(Args, Debug)]
pub struct RevertArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Ledger of the quota changes to revert
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// 0-based ledger column holding the tenant id
    #[arg(long, default_value_t = 0, requires = "ledger")]
    pub tenant_column: usize,

    /// 0-based ledger column holding the core delta
    #[arg(long, default_value_t = 1, requires = "ledger")]
    pub core_column: usize,

    /// 0-based ledger column holding the instance delta
    #[arg(long, default_value_t = 2, requires = "ledger")]
    pub instance_column: usize,
}

#[derive(Args, Debug)]
pub struct LocalQuotasArgs {
    #[command(flatten)]
    pub listing: ListingArgs,

    /// Only report quotas of this availability zone
    #[arg(short, long)]
    pub zone: Option<String>,
}

#[derive(Args, Debug)]
pub struct InstanceUsageArgs {
    #[command(flatten)]
    pub listing: ListingArgs,

    /// Window start, YYYY-MM-DDTHH:MM
    #[arg(long, value_parser = UsageWindow::parse_bound)]
    pub start: NaiveDateTime,

    /// Window end, YYYY-MM-DDTHH:MM
    #[arg(long, value_parser = UsageWindow::parse_bound)]
    pub end: NaiveDateTime,
}

impl InstanceUsageArgs {
    pub fn window(&self) -> UsageWindow {
        UsageWindow {
            start: self.start,
            end: self.end,
        }
    }
}

#[derive(Args, Debug)]
pub struct AggregatesArgs {
    /// Availability zone of the aggregates
    pub zone: String,

    /// Only show these hosts (repeatable)
    #[arg(long = "host")]
    pub hosts: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "quota-audit.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
