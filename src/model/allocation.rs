//! Allocation registry records.

use super::compute::QuotaRecord;
use super::serde_helpers::{lenient_string, null_as_default, timestamp};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// RAM quotas in the registry are GiB; the compute service counts MiB.
pub const MIB_PER_GIB: i64 = 1024;

/// Lifecycle state of an allocation request.
///
/// The registry encodes these as single-letter codes. Only approved and
/// extended allocations describe quota that should be live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AllocationStatus {
    /// `A`
    Approved,
    /// `X`
    Extended,
    /// Any other code (new, submitted, declined, legacy...).
    Other(String),
}

impl AllocationStatus {
    /// Whether records in this state take part in reconciliation.
    pub fn is_current(&self) -> bool {
        matches!(self, AllocationStatus::Approved | AllocationStatus::Extended)
    }

    pub fn code(&self) -> &str {
        match self {
            AllocationStatus::Approved => "A",
            AllocationStatus::Extended => "X",
            AllocationStatus::Other(code) => code,
        }
    }
}

impl From<String> for AllocationStatus {
    fn from(code: String) -> Self {
        match code.as_str() {
            "A" => AllocationStatus::Approved,
            "X" => AllocationStatus::Extended,
            _ => AllocationStatus::Other(code),
        }
    }
}

impl From<AllocationStatus> for String {
    fn from(status: AllocationStatus) -> Self {
        status.code().to_string()
    }
}

impl fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One historical snapshot of an approved resource allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    /// Registry-side record id, referenced by quota rows.
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "tenant_uuid", default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub tenant_name: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub allocation_home: Option<String>,
    pub status: AllocationStatus,
    /// None when the registry sent no usable timestamp.
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_lenient",
        serialize_with = "timestamp::serialize_optional"
    )]
    pub modified_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instance_quota: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub core_quota: i64,
    /// GiB.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ram_quota: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field_of_research_1: Option<String>,
    #[serde(default)]
    pub for_percentage_1: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field_of_research_2: Option<String>,
    #[serde(default)]
    pub for_percentage_2: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub field_of_research_3: Option<String>,
    #[serde(default)]
    pub for_percentage_3: Option<i64>,
}

impl AllocationRecord {
    /// Tenant id, treating an empty string the same as an absent one.
    pub fn tenant(&self) -> Option<&str> {
        self.tenant_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Whether this record can be the current allocation of some tenant.
    /// Records without a modification time cannot be ordered and never are.
    pub fn is_eligible(&self) -> bool {
        self.status.is_current() && self.tenant().is_some() && self.modified_time.is_some()
    }

    pub fn ram_quota_mib(&self) -> i64 {
        self.ram_quota * MIB_PER_GIB
    }

    /// The allocation expressed in compute-service units.
    pub fn quota(&self) -> QuotaRecord {
        QuotaRecord {
            instances: self.instance_quota,
            cores: self.core_quota,
            ram_mib: self.ram_quota_mib(),
        }
    }

    /// Tenant name, falling back to the project name for records created
    /// before the tenant existed.
    pub fn display_name(&self) -> &str {
        self.tenant_name
            .as_deref()
            .or(self.project_name.as_deref())
            .unwrap_or("")
    }

    pub fn modified_display(&self) -> String {
        self.modified_time
            .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            .unwrap_or_default()
    }
}

/// A per-zone resource quota attached to an allocation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaRow {
    /// Id of the owning [`AllocationRecord`].
    pub allocation: i64,
    pub zone: String,
    pub resource: String,
    #[serde(default)]
    pub units: String,
    pub quota: serde_json::Number,
}

impl QuotaRow {
    /// Column label used by the local quota report.
    pub fn label(&self) -> String {
        format!("{}-{} ({})", self.zone, self.resource, self.units)
    }
}
