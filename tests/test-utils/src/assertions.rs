//! Custom assertions for action-log invariants (spec.md §8)

use services_common::{ActionDocument, Severity};

/// Asserts `doc.result >= minimum`, per the result-monotonicity invariant
/// (spec.md §8): a document's outcome should never undershoot what a
/// triggering event demanded.
pub fn assert_result_at_least(doc: &ActionDocument, minimum: Severity) {
    assert!(doc.result >= minimum, "expected result >= {minimum:?}, got {:?}", doc.result);
}

/// Asserts every context value for `key` is within the configured length
/// limit (counted in chars, per spec.md §3), or that the document was
/// downgraded to `WARN` with the conventional overflow message (spec.md §8).
pub fn assert_context_length_invariant(doc: &ActionDocument, key: &str, max_len: usize) {
    let Some(values) = doc.context.get(key) else { return };
    let within_limit = values.iter().all(|v| v.chars().count() <= max_len);
    if within_limit {
        return;
    }
    assert!(doc.result >= Severity::Warn, "context[{key}] exceeds {max_len} chars but result was not escalated");
    let message = doc.error_message.as_deref().unwrap_or("");
    assert!(message.contains("context value is too long"), "expected overflow errorMessage, got {message:?}");
}

/// Asserts `doc.trace_log` is present, i.e. `flushTraceLog()` was true at
/// emission time (spec.md §4.3, §8).
pub fn assert_trace_flushed(doc: &ActionDocument) {
    assert!(doc.trace_log.is_some(), "expected trace_log to be present on {}", doc.id);
}

/// Asserts `doc.trace_log` is absent: no WARN-or-worse event and trace mode
/// was NONE.
pub fn assert_trace_not_flushed(doc: &ActionDocument) {
    assert!(doc.trace_log.is_none(), "expected trace_log to be absent on {}", doc.id);
}

/// Asserts the child/parent correlation round-trip invariant from spec.md
/// §8: `child.refIds[0] == parent.id`, `child.clients[0] == parent.app`, and
/// `child`'s correlation ids equal the parent's emitted root id(s).
pub fn assert_correlation_round_trip(parent: &ActionDocument, child: &ActionDocument) {
    assert_eq!(child.ref_ids.first(), Some(&parent.id));
    assert_eq!(child.clients.first(), Some(&parent.app));
    let expected_roots = if parent.is_root { vec![parent.id.clone()] } else { parent.correlation_ids.clone() };
    assert_eq!(child.correlation_ids, expected_roots);
}
