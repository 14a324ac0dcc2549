//! Factory patterns for generating `ActionDocument`s and logging events

use std::collections::BTreeMap;

use fake::{Fake, Faker};
use services_common::{ActionDocument, PerformanceEntry, Severity};

/// Builder for `ActionDocument`s with sane, overridable defaults, used by
/// collector/diagram tests that need many documents shaped a particular way
/// without repeating every field.
pub struct ActionDocumentFactory {
    app: String,
    action: String,
    result: Severity,
}

impl ActionDocumentFactory {
    pub fn new() -> Self {
        Self { app: "test-app".to_string(), action: "test:action".to_string(), result: Severity::Ok }
    }

    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = app.into();
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn with_result(mut self, result: Severity) -> Self {
        self.result = result;
        self
    }

    /// Builds a root document: `is_root = true`, `correlation_ids = [id]`.
    pub fn build_root(&self, id: impl Into<String>) -> ActionDocument {
        let id = id.into();
        self.build(id.clone(), vec![id], vec![], vec![])
    }

    /// Builds a child document with explicit correlation/ref/client chains.
    pub fn build_child(
        &self,
        id: impl Into<String>,
        correlation_ids: Vec<String>,
        ref_ids: Vec<String>,
        clients: Vec<String>,
    ) -> ActionDocument {
        self.build(id, correlation_ids, ref_ids, clients)
    }

    fn build(
        &self,
        id: impl Into<String>,
        correlation_ids: Vec<String>,
        ref_ids: Vec<String>,
        clients: Vec<String>,
    ) -> ActionDocument {
        let is_root = ref_ids.is_empty() && clients.is_empty();
        ActionDocument {
            id: id.into(),
            date: chrono::Utc::now(),
            app: self.app.clone(),
            host: "test-host".to_string(),
            action: self.action.clone(),
            result: self.result,
            error_code: None,
            error_message: None,
            elapsed_nanos: random_elapsed_nanos(),
            cpu_time_nanos: 0,
            context: BTreeMap::new(),
            stats: BTreeMap::new(),
            performance_stats: BTreeMap::new(),
            is_root,
            correlation_ids,
            ref_ids,
            clients,
            trace_log: None,
        }
    }

    /// A batch of independent root documents sharing this factory's
    /// `app`/`action`, each with a distinct fake id.
    pub fn build_batch(&self, count: usize) -> Vec<ActionDocument> {
        (0..count).map(|i| self.build_root(format!("{:024x}", i + 1))).collect()
    }
}

impl Default for ActionDocumentFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn random_elapsed_nanos() -> u64 {
    (Faker.fake::<f64>() * 50_000_000.0) as u64
}

/// A `PerformanceEntry` with the given totals, for tests asserting on
/// `DiagramBuilder`/`CollectorIndexer` behavior that don't care about how
/// the entry accumulated.
#[must_use]
pub fn performance_entry(count: u64, total_elapsed_nanos: u64, read_entries: u64, write_entries: u64) -> PerformanceEntry {
    PerformanceEntry { count, total_elapsed_nanos, read_entries, write_entries }
}
