//! Per-resource performance accumulator (spec.md §4.2)

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use services_common::PerformanceEntry;

/// Resources worth preallocating a hash-map slot for, per spec.md §9's
/// design note, to avoid map churn on the hot path.
const HOT_RESOURCES: &[&str] = &["db", "http", "cache", "kafka", "elasticsearch"];

/// Additive `{count, totalElapsedNanos, readEntries, writeEntries}` per
/// resource name. Owned by exactly one `ActionLog`; no internal locking.
pub struct PerformanceStats {
    entries: FxHashMap<String, PerformanceEntry>,
}

impl Default for PerformanceStats {
    fn default() -> Self {
        let mut entries = FxHashMap::default();
        entries.reserve(HOT_RESOURCES.len());
        Self { entries }
    }
}

impl PerformanceStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one sample to `resource`'s accumulator, creating it on first use.
    /// Returns the resource's updated sample count, letting the caller
    /// decide whether to emit a detailed log line (e.g. only on the first
    /// sample for a given resource).
    pub fn track(&mut self, resource: &str, elapsed_nanos: u64, read_entries: u64, write_entries: u64) -> u64 {
        let entry = self.entries.entry(resource.to_string()).or_default();
        entry.count += 1;
        entry.total_elapsed_nanos += elapsed_nanos;
        entry.read_entries += read_entries;
        entry.write_entries += write_entries;
        entry.count
    }

    /// A deterministically ordered snapshot suitable for serialization.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, PerformanceEntry> {
        self.entries.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }
}
