//! Prior quota adjustment ledger.
//!
//! A ledger is a delimited file produced by an earlier bulk quota change,
//! one row per tenant. The column positions of the tenant id, core delta and
//! instance delta are supplied by the caller; anything that does not parse
//! (headers, blank lines, short rows) is skipped.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// GiB of RAM granted alongside each additional core.
pub const RAM_GIB_PER_CORE: i64 = 4;

/// Ledger loading failures. Row-level problems are not errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Failed to open ledger {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to read ledger: {0}")]
    Csv(#[from] csv::Error),
}

/// One tenant's recorded adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    pub cores: i64,
    pub instances: i64,
}

impl Delta {
    pub fn ram_gib(&self) -> i64 {
        self.cores * RAM_GIB_PER_CORE
    }
}

/// A ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaEntry {
    pub tenant_id: String,
    pub delta: Delta,
}

/// 0-based column positions within a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerColumns {
    pub tenant: usize,
    pub cores: usize,
    pub instances: usize,
}

impl Default for LedgerColumns {
    fn default() -> Self {
        Self {
            tenant: 0,
            cores: 1,
            instances: 2,
        }
    }
}

/// Deltas keyed by tenant id.
#[derive(Debug, Clone, Default)]
pub struct DeltaLedger {
    entries: HashMap<String, Delta>,
}

impl DeltaLedger {
    /// Load a ledger file.
    pub fn load(path: &Path, columns: LedgerColumns) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|source| LedgerError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let ledger = Self::from_reader(file, columns)?;
        tracing::info!(path = %path.display(), tenants = ledger.len(), "Loaded delta ledger");
        Ok(ledger)
    }

    /// Parse ledger rows from any reader. A later row for the same tenant
    /// replaces an earlier one.
    pub fn from_reader<R: Read>(reader: R, columns: LedgerColumns) -> Result<Self, LedgerError> {
        let mut rows = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = HashMap::new();
        for (line, record) in rows.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    tracing::debug!(line = line + 1, error = %e, "Skipping unreadable ledger row");
                    continue;
                }
            };
            match parse_row(&record, columns) {
                Some(entry) => {
                    if entries.insert(entry.tenant_id, entry.delta).is_some() {
                        tracing::debug!(line = line + 1, "Ledger row replaces earlier entry");
                    }
                }
                None => tracing::debug!(line = line + 1, "Skipping malformed ledger row"),
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, tenant_id: &str) -> Option<&Delta> {
        self.entries.get(tenant_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in tenant id order.
    pub fn entries(&self) -> Vec<DeltaEntry> {
        let mut entries: Vec<DeltaEntry> = self
            .entries
            .iter()
            .map(|(tenant_id, delta)| DeltaEntry {
                tenant_id: tenant_id.clone(),
                delta: *delta,
            })
            .collect();
        entries.sort_by(|a, b| a.tenant_id.cmp(&b.tenant_id));
        entries
    }
}

fn parse_row(record: &csv::StringRecord, columns: LedgerColumns) -> Option<DeltaEntry> {
    let tenant_id = record.get(columns.tenant).filter(|t| !t.is_empty())?;
    let cores = record.get(columns.cores)?.parse().ok()?;
    let instances = record.get(columns.instances)?.parse().ok()?;
    Some(DeltaEntry {
        tenant_id: tenant_id.to_string(),
        delta: Delta { cores, instances },
    })
}
