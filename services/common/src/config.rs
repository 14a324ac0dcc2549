//! Shared action-log limits configuration, layered env > file > defaults

use serde::{Deserialize, Serialize};

use crate::constants::{
    FORWARD_QUEUE_CAPACITY, MAX_CONTEXT_VALUE_LENGTH, TRACE_HARD_LIMIT_CHARS,
    TRACE_SOFT_LIMIT_CHARS,
};

/// Limits governing one `ActionLog`'s lifecycle: context value length, trace
/// buffer soft/hard caps, and forwarding queue capacity (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogManagerConfig {
    pub max_context_value_length: usize,
    pub trace_soft_limit_chars: usize,
    pub trace_hard_limit_chars: usize,
    pub forward_queue_capacity: usize,
}

impl Default for LogManagerConfig {
    fn default() -> Self {
        Self {
            max_context_value_length: MAX_CONTEXT_VALUE_LENGTH,
            trace_soft_limit_chars: TRACE_SOFT_LIMIT_CHARS,
            trace_hard_limit_chars: TRACE_HARD_LIMIT_CHARS,
            forward_queue_capacity: FORWARD_QUEUE_CAPACITY,
        }
    }
}

impl LogManagerConfig {
    /// Loads configuration from (in increasing priority) built-in defaults,
    /// an optional `config/logging.toml` file, then `ACTIONLOG_*`
    /// environment variables. Falls back to [`Default`] if no file and no
    /// environment overrides are present.
    pub fn load() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::File::with_name("config/logging").required(false))
            .add_source(config::Environment::with_prefix("ACTIONLOG"));
        Ok(builder.build()?.try_deserialize()?)
    }
}
