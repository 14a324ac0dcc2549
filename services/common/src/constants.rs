//! Constants shared by every crate in the action-logging platform
//!
//! Single source of truth for the limits and topic/index names spec'd in the
//! action-log wire contract (headers, Kafka topic, index naming).

/// Longest value a single `ActionLog` context entry may hold before the
/// action is downgraded to `WARN`.
pub const MAX_CONTEXT_VALUE_LENGTH: usize = 1000;

/// Trace buffer soft limit in characters. Rendering keeps going past this
/// point only to finish a warning/error line already in progress.
pub const TRACE_SOFT_LIMIT_CHARS: usize = 30_000;

/// Trace buffer hard limit in characters. Rendering never exceeds this.
pub const TRACE_HARD_LIMIT_CHARS: usize = 3_000_000;

/// Capacity of the in-memory queue sitting between `LogManager::end` and the
/// background forwarder task. Drop-oldest applies once this fills up.
pub const FORWARD_QUEUE_CAPACITY: usize = 1024;

/// Kafka topic completed `ActionDocument`s are published to.
pub const ACTION_LOG_TOPIC: &str = "action-log";

/// `strftime`-style pattern for time-partitioned collector indices.
pub const ACTION_INDEX_DATE_FORMAT: &str = "action-%Y.%m.%d";

/// Wire header carrying the root action id(s) of a causal chain.
pub const HEADER_CORRELATION_ID: &str = "x-correlation-id";

/// Wire header carrying the immediate caller's action id.
pub const HEADER_REF_ID: &str = "x-ref-id";

/// Wire header carrying the immediate caller's app name.
pub const HEADER_CLIENT: &str = "x-client";

/// Wire header carrying the trace sampling decision (`CURRENT`/`CASCADE`).
pub const HEADER_TRACE: &str = "x-trace";

/// Error code stamped on a `WARN` event that didn't supply its own code.
pub const ERROR_CODE_UNASSIGNED: &str = "UNASSIGNED";

/// Error code for programming errors (null where forbidden, illegal state).
pub const ERROR_CODE_INTERNAL: &str = "ERROR";

/// Error code for I/O failure to a downstream dependency with no more
/// specific code available.
pub const ERROR_CODE_REMOTE_SERVICE: &str = "REMOTE_SERVICE_ERROR";

/// Error code assigned when the boundary layer cancels an in-flight action.
pub const ERROR_CODE_CANCELLED: &str = "CANCELLED";

/// Hard cap on the number of per-action diagram nodes `DiagramBuilder`
/// collects for a causal tree (spec.md §4.9).
pub const DIAGRAM_ACTION_FANOUT_LIMIT: usize = 10_000;

/// Aggregation sizes for the architecture diagram's `app -> action -> client`
/// term buckets (spec.md §4.9): apps, actions per app, clients per action.
pub const DIAGRAM_ARCH_APP_LIMIT: usize = 100;
pub const DIAGRAM_ARCH_ACTION_LIMIT: usize = 500;
pub const DIAGRAM_ARCH_CLIENT_LIMIT: usize = 100;
