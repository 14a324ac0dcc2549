//! Arch and per-action causal diagrams, rendered as Graphviz `dot` text
//! (spec.md §4.9)

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use rustc_hash::FxHashSet;
use services_common::ActionDocument;
use services_common::constants::{
    DIAGRAM_ACTION_FANOUT_LIMIT, DIAGRAM_ARCH_ACTION_LIMIT, DIAGRAM_ARCH_APP_LIMIT,
    DIAGRAM_ARCH_CLIENT_LIMIT,
};
use thiserror::Error;

use crate::index::Index;

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("action {0} not found")]
    NotFound(String),
}

pub struct DiagramBuilder {
    index: Arc<dyn Index>,
}

impl DiagramBuilder {
    #[must_use]
    pub fn new(index: Arc<dyn Index>) -> Self {
        Self { index }
    }

    /// `arch(hours, excludeApps) -> dot`: nodes are apps, edges
    /// `client -> app` labeled by the aggregated action names observed
    /// between them (spec.md §4.9).
    pub async fn arch(&self, hours: i64, exclude_apps: &[String]) -> String {
        let since = Utc::now() - chrono::Duration::hours(hours.max(0));
        let documents = self.index.query_since(since).await;
        let excluded: FxHashSet<&str> = exclude_apps.iter().map(String::as_str).collect();

        let mut apps: BTreeSet<String> = BTreeSet::new();
        let mut edges: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();

        for document in &documents {
            if excluded.contains(document.app.as_str()) {
                continue;
            }
            if apps.len() < DIAGRAM_ARCH_APP_LIMIT || apps.contains(&document.app) {
                apps.insert(document.app.clone());
            }

            let clients = if document.clients.is_empty() {
                vec!["external".to_string()]
            } else {
                document.clients.clone()
            };

            for client in clients.into_iter().take(DIAGRAM_ARCH_CLIENT_LIMIT) {
                if excluded.contains(client.as_str()) {
                    continue;
                }
                let actions = edges.entry((client, document.app.clone())).or_default();
                if actions.len() < DIAGRAM_ARCH_ACTION_LIMIT {
                    actions.insert(document.action.clone());
                }
            }
        }

        render_arch_dot(&apps, &edges)
    }

    /// `action(actionId) -> dot`: the causal tree for one action, following
    /// `refIds` caller-to-callee edges (spec.md §4.9).
    pub async fn action(&self, action_id: &str) -> Result<String, DiagramError> {
        let root_document =
            self.index.get(action_id).await.ok_or_else(|| DiagramError::NotFound(action_id.to_string()))?;

        let roots: Vec<String> =
            if root_document.is_root { vec![root_document.id.clone()] } else { root_document.correlation_ids.clone() };

        let mut siblings = self.index.query_by_correlation(&roots).await;
        if !root_document.is_root {
            for root_id in &roots {
                if let Some(root) = self.index.get(root_id).await {
                    if !siblings.iter().any(|d| d.id == root.id) {
                        siblings.push(root);
                    }
                }
            }
        }
        siblings.truncate(DIAGRAM_ACTION_FANOUT_LIMIT);

        Ok(render_action_dot(&siblings))
    }
}

fn dot_id(label: &str) -> String {
    format!("\"{}\"", label.replace('"', "\\\""))
}

fn render_arch_dot(apps: &BTreeSet<String>, edges: &BTreeMap<(String, String), BTreeSet<String>>) -> String {
    let mut out = String::from("digraph arch {\n  rankdir=LR;\n");
    for app in apps {
        out.push_str(&format!("  {} [shape=box];\n", dot_id(app)));
    }
    for ((client, app), actions) in edges {
        let label: Vec<_> = actions.iter().cloned().collect();
        out.push_str(&format!("  {} -> {} [label={}];\n", dot_id(client), dot_id(app), dot_id(&label.join(", "))));
    }
    out.push_str("}\n");
    out
}

fn render_action_dot(documents: &[ActionDocument]) -> String {
    let node_ids: FxHashSet<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    let mut out = String::from("digraph action {\n  rankdir=TB;\n");
    for document in documents {
        let label = format!("{}:{}", document.app, document.action);
        out.push_str(&format!("  {} [label={}];\n", dot_id(&document.id), dot_id(&label)));
    }
    for document in documents {
        for ref_id in &document.ref_ids {
            if node_ids.contains(ref_id.as_str()) {
                out.push_str(&format!("  {} -> {};\n", dot_id(ref_id), dot_id(&document.id)));
            }
        }
    }
    out.push_str("}\n");
    out
}
