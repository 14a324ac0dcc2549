//! Task-bound entry point: `begin`/`end` around an action, plus the
//! convenience wrappers every call site actually reaches for (spec.md §4.1,
//! §5)
//!
//! An `ActionLog` is owned by exactly one task at a time. `LogManager` keeps
//! the "current" one in a [`tokio::task_local`], not a thread-local: a task
//! polled on a multi-thread runtime can resume on a different worker thread
//! after any `.await` (including the body extractor and handler wrapped by
//! [`crate::Inbound`]'s consumer, `action_log_middleware`), and a thread-local
//! binding would simply not be there when it does. The task-local follows the
//! task instead of the thread, so [`LogManager::begin`] and everything
//! downstream of it keep working regardless of where the runtime schedules
//! the rest of the future. [`LogManager::task_scope`] establishes the binding
//! slot for the lifetime of a future; callers must wrap the entire unit of
//! work in it before calling `begin`. Moving an action across an async task
//! boundary (fan-out, spawned work) is done explicitly with
//! [`LogManager::take`] / [`LogManager::rebind`] rather than by sharing it
//! behind a lock — the receiving task establishes its own `task_scope` and
//! rebinds the handle into it.

use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use services_common::{ActionFault, LogManagerConfig};
use tracing::error;

use crate::action_log::{ActionLog, Inbound, LogEvent};
use crate::filter::LogFilter;
use crate::forwarder::RecordForwarder;

tokio::task_local! {
    static CURRENT: RefCell<Option<(ActionLog, Instant)>>;
}

/// How an action concluded, decided by the call site at `end` time.
pub enum Outcome<'a> {
    Ok,
    Fault(&'a ActionFault),
    /// An error with no registered `ActionFault` mapping; `type_name` drives
    /// the fingerprinted error code (spec.md §4.5).
    Uncaught { type_name: &'a str, message: &'a str },
}

/// Owns the app identity, filter registry and forwarder every action is
/// finished against. Cheap to clone (all fields are `Arc`-backed or `Copy`);
/// typically constructed once per process and shared via a handle held in
/// application state.
#[derive(Clone)]
pub struct LogManager {
    app: Arc<str>,
    host: Arc<str>,
    config: Arc<LogManagerConfig>,
    filter: Arc<LogFilter>,
    forwarder: Arc<RecordForwarder>,
}

impl LogManager {
    #[must_use]
    pub fn new(app: impl Into<Arc<str>>, host: impl Into<Arc<str>>, config: LogManagerConfig, filter: LogFilter, forwarder: Arc<RecordForwarder>) -> Self {
        Self { app: app.into(), host: host.into(), config: Arc::new(config), filter: Arc::new(filter), forwarder }
    }

    /// Establishes the task-local binding slot for the duration of `f`
    /// (spec.md §5). Must wrap the entire unit of work — a request, a
    /// spawned job — from before its first `begin` to after its last `end`;
    /// `begin`/`rebind` panic if called outside one. Because the slot is a
    /// `tokio::task_local`, it stays reachable across every `.await` inside
    /// `f` no matter which worker thread the runtime resumes it on.
    pub async fn task_scope<F: Future>(f: F) -> F::Output {
        CURRENT.scope(RefCell::new(None), f).await
    }

    /// Binds a new `ActionLog` to the calling task. Fatal (panics) if one is
    /// already bound without a matching `end`: spec.md §5 calls nested
    /// `begin` without prior `end` a programming error. Also panics if
    /// called outside a [`LogManager::task_scope`].
    pub fn begin(&self, action: impl Into<String>, id: Option<String>, inbound: Inbound) {
        CURRENT
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                assert!(slot.is_none(), "LogManager::begin called with an action already bound on this task");
                *slot = Some((ActionLog::new(action, id, inbound, &self.config), Instant::now()));
            })
            .expect("LogManager::begin called outside LogManager::task_scope");
    }

    /// The id of the action currently bound to this task, if any.
    #[must_use]
    pub fn current_id(&self) -> Option<String> {
        CURRENT.try_with(|cell| cell.borrow().as_ref().map(|(log, _)| log.id().to_string())).unwrap_or(None)
    }

    /// Runs `f` against the task-bound `ActionLog`. Panics if none is bound:
    /// every call site downstream of `begin` is expected to run inside its
    /// scope.
    pub fn with_current<R>(&self, f: impl FnOnce(&mut ActionLog) -> R) -> R {
        CURRENT
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                let (log, _) = slot.as_mut().expect("no action bound on this task");
                f(log)
            })
            .expect("no action bound on this task")
    }

    /// Intercepts one logging event against the task-bound action.
    pub fn process(&self, event: LogEvent) {
        self.with_current(|log| log.process(event));
    }

    /// Appends a context value to the task-bound action.
    pub fn context(&self, key: &str, value: impl Into<String>) {
        self.with_current(|log| log.context(key, value));
    }

    /// Adds to an additive stat on the task-bound action.
    pub fn stat(&self, name: &str, delta: f64) {
        self.with_current(|log| log.stat(name, delta));
    }

    /// Records a performance sample on the task-bound action.
    pub fn track(&self, resource: &str, elapsed_nanos: u64, read_entries: u64, write_entries: u64) -> u64 {
        self.with_current(|log| log.track(resource, elapsed_nanos, read_entries, write_entries))
    }

    /// Finalizes the task-bound action: computes elapsed/cpu time, applies
    /// `outcome`, runs the filter, and enqueues the resulting document on
    /// the forwarder. Any publish failure from a *previous* flush is
    /// recorded as context on this action before it closes (spec.md §4.7).
    pub fn end(&self, outcome: Outcome<'_>) {
        let taken = CURRENT.try_with(|cell| cell.borrow_mut().take());
        let Ok(Some((mut log, started))) = taken else {
            error!("LogManager::end called with no action bound on this task");
            return;
        };

        if let Some(failure) = self.forwarder.take_last_failure() {
            log.context("logPublishError", failure);
        }

        match outcome {
            Outcome::Ok => {}
            Outcome::Fault(fault) => log.fail(fault),
            Outcome::Uncaught { type_name, message } => log.fail_uncaught(type_name, message),
        }

        // No portable per-thread CPU timer in stable std; wall-clock elapsed
        // is already captured inside `ActionLog`, so this is an honest 0
        // rather than a faked duplicate of elapsed_nanos.
        let _ = started;
        let cpu_time_nanos = 0;

        let document = log.finish(&self.app, &self.host, cpu_time_nanos, &self.filter, &self.config);
        self.forwarder.enqueue(document);
    }

    /// Removes the task-bound action without finishing it, handing
    /// ownership to the caller so it can be rebound on another task
    /// (spec.md §5 fan-out: "the caller captures the handle and hands it to
    /// the child task, which rebinds on entry and unbinds on exit").
    #[must_use]
    pub fn take(&self) -> Option<ActionLog> {
        CURRENT.try_with(|cell| cell.borrow_mut().take().map(|(log, _)| log)).unwrap_or(None)
    }

    /// Binds a previously-`take`n action to the calling task. Fatal if one is
    /// already bound, same as `begin`. The child task must call this inside
    /// its own [`LogManager::task_scope`] — task-local state does not cross
    /// a `tokio::spawn` boundary on its own.
    pub fn rebind(&self, log: ActionLog) {
        CURRENT
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                assert!(slot.is_none(), "LogManager::rebind called with an action already bound on this task");
                *slot = Some((log, Instant::now()));
            })
            .expect("LogManager::rebind called outside LogManager::task_scope");
    }

    /// Flushes whatever is currently queued on the forwarder. Call
    /// periodically from a background task; never required for correctness,
    /// only for latency until the next natural flush.
    pub async fn flush(&self) {
        self.forwarder.flush().await;
    }
}
