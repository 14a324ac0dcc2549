//! `ActionLog`: the in-memory state machine accumulated during one action
//! (spec.md §3, §4.3)

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;
use rustc_hash::FxHashMap;
use services_common::{ActionDocument, ActionFault, LogManagerConfig, Severity, TraceMode};
use tracing::Level;

use crate::filter::LogFilter;
use crate::performance::PerformanceStats;
use crate::trace_buffer::TraceBuffer;

const UNASSIGNED: &str = "UNASSIGNED";

/// One logging event intercepted by the `LogManager` and handed to the
/// owning `ActionLog::process` (spec.md §4.5).
pub struct LogEvent {
    pub level: Level,
    pub logger: String,
    pub message: String,
    pub error_code: Option<String>,
    pub throwable: Option<String>,
}

impl LogEvent {
    #[must_use]
    pub fn new(level: Level, logger: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level, logger: logger.into(), message: message.into(), error_code: None, throwable: None }
    }

    #[must_use]
    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }
}

/// Upstream correlation state captured by the `Correlator` at `begin` time
/// (spec.md §4.6).
#[derive(Debug, Clone, Default)]
pub struct Inbound {
    pub correlation_ids: Vec<String>,
    pub ref_ids: Vec<String>,
    pub clients: Vec<String>,
    pub trace_mode: TraceMode,
}

/// The in-memory accumulator for a single action. Owned by exactly one
/// thread for its entire lifetime (spec.md §5): no field here is
/// internally synchronized.
pub struct ActionLog {
    id: String,
    date: chrono::DateTime<Utc>,
    start: Instant,
    action: String,
    result: Severity,
    error_code: Option<String>,
    error_message: Option<String>,
    context: FxHashMap<String, Vec<String>>,
    stats: FxHashMap<String, f64>,
    performance: PerformanceStats,
    correlation_ids: Vec<String>,
    ref_ids: Vec<String>,
    clients: Vec<String>,
    is_root: bool,
    trace_mode: TraceMode,
    trace_buffer: TraceBuffer,
    max_context_value_length: usize,
}

impl ActionLog {
    #[must_use]
    pub fn new(action: impl Into<String>, id: Option<String>, inbound: Inbound, config: &LogManagerConfig) -> Self {
        let is_root = inbound.correlation_ids.is_empty();
        Self {
            id: id.unwrap_or_else(services_common::ids::new_action_id),
            date: Utc::now(),
            start: Instant::now(),
            action: action.into(),
            result: Severity::Ok,
            error_code: None,
            error_message: None,
            context: FxHashMap::default(),
            stats: FxHashMap::default(),
            performance: PerformanceStats::new(),
            correlation_ids: inbound.correlation_ids,
            ref_ids: inbound.ref_ids,
            clients: inbound.clients,
            is_root,
            trace_mode: inbound.trace_mode,
            trace_buffer: TraceBuffer::new(),
            max_context_value_length: config.max_context_value_length,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    #[must_use]
    pub fn trace_mode(&self) -> TraceMode {
        self.trace_mode
    }

    /// The root-action id(s) this action would hand to a callee: its own id
    /// when it is itself root, otherwise the inherited ids unchanged
    /// (spec.md §4.6 outbound rule).
    #[must_use]
    pub fn correlation_ids_for_emission(&self) -> Vec<String> {
        if self.is_root {
            vec![self.id.clone()]
        } else {
            self.correlation_ids.clone()
        }
    }

    /// CASCADE inherited from upstream overrides any local default; once set
    /// it must be re-emitted downstream (spec.md §4.6).
    pub fn upgrade_trace_mode(&mut self, mode: TraceMode) {
        if mode == TraceMode::Cascade {
            self.trace_mode = TraceMode::Cascade;
        } else if self.trace_mode == TraceMode::None {
            self.trace_mode = mode;
        }
    }

    /// Appends a context value, enforcing `MAX_CONTEXT_VALUE_LENGTH` in
    /// characters, not bytes (spec.md §3). Over-long values are rejected:
    /// the stored entry becomes an empty string and the action is
    /// downgraded to `WARN`.
    pub fn context(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if value.chars().count() > self.max_context_value_length {
            self.context.entry(key.to_string()).or_default().push(String::new());
            self.raise_warning(format!("context value is too long, key={key}"));
        } else {
            self.context.entry(key.to_string()).or_default().push(value);
        }
    }

    /// Adds `delta` to the named additive stat, creating it on first use.
    pub fn stat(&mut self, name: &str, delta: f64) {
        *self.stats.entry(name.to_string()).or_insert(0.0) += delta;
    }

    /// Delegates to `PerformanceStats::track`, returning the resource's
    /// updated sample count.
    pub fn track(&mut self, resource: &str, elapsed_nanos: u64, read_entries: u64, write_entries: u64) -> u64 {
        self.performance.track(resource, elapsed_nanos, read_entries, write_entries)
    }

    /// Intercepts one logging event: always appended to the trace buffer;
    /// escalates `result`/`errorCode`/`errorMessage` when the level is
    /// `WARN` or worse (spec.md §4.3, §4.5).
    pub fn process(&mut self, event: LogEvent) {
        self.trace_buffer.append(
            Utc::now(),
            event.level,
            &event.logger,
            &event.message,
            event.throwable.as_deref(),
        );
        if event.level <= Level::WARN {
            let severity = if event.level <= Level::ERROR { Severity::Error } else { Severity::Warn };
            self.result = self.result.join(severity);
            if self.error_message.is_none() {
                self.error_message = Some(truncate(&event.message, self.max_context_value_length));
            }
            if self.error_code.is_none() {
                self.error_code = Some(event.error_code.unwrap_or_else(|| UNASSIGNED.to_string()));
            }
        }
    }

    /// Records a fault at `end`: escalates to `ERROR`, except a
    /// `ActionFault::Warning` caps the result at `WARN` (spec.md §7).
    pub fn fail(&mut self, fault: &ActionFault) {
        let severity = if fault.is_error() { Severity::Error } else { Severity::Warn };
        let level = if fault.is_error() { Level::ERROR } else { Level::WARN };
        self.result = self.result.join(severity);
        if self.error_code.is_none() {
            self.error_code = Some(fault.code().to_string());
        }
        let message = fault.to_string();
        if self.error_message.is_none() {
            self.error_message = Some(truncate(&message, self.max_context_value_length));
        }
        self.trace_buffer.append(Utc::now(), level, "uncaught", &message, None);
    }

    /// Records an uncaught error with no registered `ActionFault` mapping:
    /// derives `errorCode` from a stable fingerprint of the error's type
    /// name (spec.md §4.5).
    pub fn fail_uncaught(&mut self, type_name: &str, message: &str) {
        self.result = self.result.join(Severity::Error);
        if self.error_code.is_none() {
            self.error_code = Some(services_common::ids::fingerprint_type_name(type_name));
        }
        if self.error_message.is_none() {
            self.error_message = Some(truncate(message, self.max_context_value_length));
        }
        self.trace_buffer.append(Utc::now(), Level::ERROR, "uncaught", message, None);
    }

    /// Internal helper for conditions the framework itself raises (context
    /// overflow): escalates to `WARN` without overwriting a prior error.
    fn raise_warning(&mut self, message: String) {
        self.result = self.result.join(Severity::Warn);
        if self.error_message.is_none() {
            self.error_message = Some(truncate(&message, self.max_context_value_length));
        }
        if self.error_code.is_none() {
            self.error_code = Some(UNASSIGNED.to_string());
        }
        self.trace_buffer.append(Utc::now(), Level::WARN, "action-log", &message, None);
    }

    /// Renders the trace buffer per the soft/hard limit rules.
    #[must_use]
    pub fn trace(&self, soft_limit: usize, hard_limit: usize) -> String {
        self.trace_buffer.render(soft_limit, hard_limit)
    }

    /// `true` iff the trace should be retained on the emitted record:
    /// trace mode is CURRENT/CASCADE, or any event at WARN-or-worse was
    /// processed (spec.md §4.3).
    #[must_use]
    pub fn flush_trace_log(&self) -> bool {
        self.trace_mode != TraceMode::None || self.trace_buffer.has_warning()
    }

    #[must_use]
    pub fn result(&self) -> Severity {
        self.result
    }

    /// Consumes the `ActionLog`, producing the record to forward. Record
    /// emission happens exactly once per action, here.
    #[must_use]
    pub fn finish(self, app: &str, host: &str, cpu_time_nanos: u64, filter: &LogFilter, config: &LogManagerConfig) -> ActionDocument {
        let elapsed_nanos = self.start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
        let correlation_ids = if self.is_root { vec![self.id.clone()] } else { self.correlation_ids };
        let trace_log = if self.flush_trace_log() {
            Some(self.trace_buffer.render(config.trace_soft_limit_chars, config.trace_hard_limit_chars))
        } else {
            None
        };

        let context: BTreeMap<String, Vec<String>> = self.context.into_iter().collect();
        let stats: BTreeMap<String, f64> = self.stats.into_iter().collect();
        let performance_stats = self.performance.snapshot();

        let mut document = ActionDocument {
            id: self.id,
            date: self.date,
            app: app.to_string(),
            host: host.to_string(),
            action: self.action,
            result: self.result,
            error_code: self.error_code,
            error_message: self.error_message,
            elapsed_nanos,
            cpu_time_nanos,
            context,
            stats,
            performance_stats,
            is_root: self.is_root,
            correlation_ids,
            ref_ids: self.ref_ids,
            clients: self.clients,
            trace_log,
        };
        filter.apply(&mut document);
        document
    }
}

/// Truncates `s` to at most `max_len` characters (spec.md §3 counts
/// `MAX_CONTEXT_VALUE_LENGTH` in chars, not bytes).
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    s.chars().take(max_len).collect()
}
