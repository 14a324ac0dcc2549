//! Collector-side storage seam (spec.md §4.8)
//!
//! Elasticsearch client transport is an external collaborator the spec
//! keeps out of scope; `Index` is the seam a real deployment plugs a
//! client behind. `MemoryIndex` is the in-process stand-in used for the
//! demo binary and the test suite.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use services_common::ActionDocument;

#[async_trait]
pub trait Index: Send + Sync {
    async fn upsert(&self, document: ActionDocument);
    async fn get(&self, id: &str) -> Option<ActionDocument>;
    /// All documents dated on or after `since`, across every time-partitioned
    /// index.
    async fn query_since(&self, since: DateTime<Utc>) -> Vec<ActionDocument>;
    /// All documents whose `correlation_ids` intersect `roots` (spec.md
    /// §4.9's action-diagram sibling lookup).
    async fn query_by_correlation(&self, roots: &[String]) -> Vec<ActionDocument>;
}

/// Time-partitioned (`action-YYYY.MM.DD`) in-memory store, idempotent on
/// `ActionDocument.id`.
#[derive(Default)]
pub struct MemoryIndex {
    by_partition: DashMap<String, DashMap<String, ActionDocument>>,
    by_correlation: DashMap<String, HashSet<String>>,
}

impl MemoryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Index for MemoryIndex {
    async fn upsert(&self, document: ActionDocument) {
        let partition = document.index_name();
        for root in &document.correlation_ids {
            self.by_correlation.entry(root.clone()).or_default().insert(document.id.clone());
        }
        self.by_partition.entry(partition).or_default().insert(document.id.clone(), document);
    }

    async fn get(&self, id: &str) -> Option<ActionDocument> {
        self.by_partition.iter().find_map(|partition| partition.value().get(id).map(|d| d.clone()))
    }

    async fn query_since(&self, since: DateTime<Utc>) -> Vec<ActionDocument> {
        self.by_partition
            .iter()
            .flat_map(|partition| partition.value().iter().map(|e| e.value().clone()).collect::<Vec<_>>())
            .filter(|doc| doc.date >= since)
            .collect()
    }

    async fn query_by_correlation(&self, roots: &[String]) -> Vec<ActionDocument> {
        let mut ids = HashSet::new();
        for root in roots {
            if let Some(set) = self.by_correlation.get(root) {
                ids.extend(set.value().iter().cloned());
            }
        }
        let mut result = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(doc) = self.get(&id).await {
                result.push(doc);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services_common::Severity;

    fn doc(id: &str, app: &str, correlation_ids: Vec<String>, ref_ids: Vec<String>, is_root: bool) -> ActionDocument {
        ActionDocument {
            id: id.to_string(),
            date: Utc::now(),
            app: app.to_string(),
            host: "host".into(),
            action: "test".into(),
            result: Severity::Ok,
            error_code: None,
            error_message: None,
            elapsed_nanos: 0,
            cpu_time_nanos: 0,
            context: Default::default(),
            stats: Default::default(),
            performance_stats: Default::default(),
            is_root,
            correlation_ids,
            ref_ids,
            clients: vec![],
            trace_log: None,
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent_by_id() {
        let index = MemoryIndex::new();
        index.upsert(doc("a", "app", vec!["a".into()], vec![], true)).await;
        index.upsert(doc("a", "app", vec!["a".into()], vec![], true)).await;
        let since = Utc::now() - chrono::Duration::hours(1);
        assert_eq!(index.query_since(since).await.len(), 1);
    }

    #[tokio::test]
    async fn query_by_correlation_finds_siblings() {
        let index = MemoryIndex::new();
        index.upsert(doc("root", "app-a", vec!["root".into()], vec![], true)).await;
        index.upsert(doc("child", "app-b", vec!["root".into()], vec!["root".into()], false)).await;
        let siblings = index.query_by_correlation(&["root".to_string()]).await;
        assert_eq!(siblings.len(), 2);
    }
}
