//! Wire-format types shared by the producer (`services/logging`) and the
//! collector (`services/monitoring`): the outcome severity lattice and the
//! serialized `ActionDocument` (spec.md §3, §4.7).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `ActionLog.result`: a join-semilattice, OK <= WARN <= ERROR. Never
/// downgrades once raised (spec.md §3 invariants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Ok,
    Warn,
    Error,
}

impl Severity {
    /// Joins two severities, returning the more severe of the two. Used to
    /// implement the monotonic-escalation invariant without ever allowing a
    /// caller to downgrade `result` by accident.
    #[must_use]
    pub fn join(self, other: Self) -> Self {
        self.max(other)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Ok => "OK",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Trace sampling decision (spec.md §3, §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TraceMode {
    #[default]
    None,
    Current,
    Cascade,
}

/// Per-resource performance accumulator (spec.md §4.2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub count: u64,
    pub total_elapsed_nanos: u64,
    pub read_entries: u64,
    pub write_entries: u64,
}

/// The immutable record emitted once per `ActionLog`, at `end` (spec.md §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDocument {
    pub id: String,
    pub date: DateTime<Utc>,
    pub app: String,
    pub host: String,
    pub action: String,
    pub result: Severity,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub elapsed_nanos: u64,
    pub cpu_time_nanos: u64,
    pub context: BTreeMap<String, Vec<String>>,
    pub stats: BTreeMap<String, f64>,
    pub performance_stats: BTreeMap<String, PerformanceEntry>,
    /// `true` when this action started a new causal chain (no upstream
    /// correlation ids were observed on entry). Encodes the convention
    /// spec.md §9's Open Question calls out explicitly instead of overloading
    /// `correlation_ids == null`.
    pub is_root: bool,
    pub correlation_ids: Vec<String>,
    pub ref_ids: Vec<String>,
    pub clients: Vec<String>,
    pub trace_log: Option<String>,
}

impl ActionDocument {
    /// Index name this document belongs to, per spec.md §6
    /// (`action-YYYY.MM.DD`, UTC).
    #[must_use]
    pub fn index_name(&self) -> String {
        self.date.format(crate::constants::ACTION_INDEX_DATE_FORMAT).to_string()
    }
}
