//! Masks fields declared sensitive before emission (spec.md §4.4)
//!
//! The registry is built once at startup and never mutated afterward
//! (spec.md §5: "The filter registry and config: immutable after
//! initialization"), so it's safe to share behind an `Arc` across threads
//! without locking.

use rustc_hash::FxHashSet;

use services_common::ActionDocument;

const MASK: &str = "******";

/// Registry of context keys (and, specially, `"errorMessage"`) whose values
/// must be masked before a record leaves the process.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    masked_keys: FxHashSet<String>,
}

impl LogFilter {
    #[must_use]
    pub fn new(masked_keys: impl IntoIterator<Item = String>) -> Self {
        Self { masked_keys: masked_keys.into_iter().collect() }
    }

    /// Masks matching fields in place. Must run after truncation: masked
    /// length never exceeds pre-filter length (spec.md §4.4 invariant).
    pub fn apply(&self, doc: &mut ActionDocument) {
        for (key, values) in &mut doc.context {
            if self.masked_keys.contains(key) {
                for v in values.iter_mut() {
                    mask_in_place(v);
                }
            }
        }
        if self.masked_keys.contains("errorMessage") {
            if let Some(message) = &mut doc.error_message {
                mask_in_place(message);
            }
        }
    }
}

/// Replaces `value` with asterisks, never growing it: a full `"******"`
/// when the value is long enough to hold it, otherwise one asterisk per
/// remaining byte.
fn mask_in_place(value: &mut String) {
    let len = value.len().min(MASK.len());
    *value = MASK[..len].to_string();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn doc_with_context(pairs: &[(&str, &str)]) -> ActionDocument {
        let mut context = BTreeMap::new();
        for (k, v) in pairs {
            context.insert((*k).to_string(), vec![(*v).to_string()]);
        }
        ActionDocument {
            id: "id".into(),
            date: chrono::Utc::now(),
            app: "app".into(),
            host: "host".into(),
            action: "test".into(),
            result: services_common::Severity::Ok,
            error_code: None,
            error_message: None,
            elapsed_nanos: 0,
            cpu_time_nanos: 0,
            context,
            stats: Default::default(),
            performance_stats: Default::default(),
            is_root: true,
            correlation_ids: vec!["id".into()],
            ref_ids: vec![],
            clients: vec![],
            trace_log: None,
        }
    }

    #[test]
    fn masks_declared_fields_only() {
        let filter = LogFilter::new(["password".to_string()]);
        let mut doc = doc_with_context(&[("password", "hunter2"), ("username", "alice")]);
        filter.apply(&mut doc);
        assert_eq!(doc.context["password"], vec!["******".to_string()]);
        assert_eq!(doc.context["username"], vec!["alice".to_string()]);
    }

    #[test]
    fn mask_never_grows_the_value() {
        let mut short = "ab".to_string();
        mask_in_place(&mut short);
        assert_eq!(short.len(), 2);

        let mut long = "a-much-longer-secret".to_string();
        let before = long.len();
        mask_in_place(&mut long);
        assert!(long.len() <= before);
    }
}
