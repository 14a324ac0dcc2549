//! rstest fixtures for common action-logging test inputs

// Allow missing docs for rstest generated code
#![allow(missing_docs)]

use rstest::*;
use services_common::LogManagerConfig;

/// Standard `LogManagerConfig` fixture, mirroring production defaults
/// (spec.md §6 limits) so tests exercising the soft/hard trace path don't
/// each hardcode `1000`/`30_000`/`3_000_000`.
#[fixture]
pub fn log_manager_config() -> LogManagerConfig {
    LogManagerConfig::default()
}

/// A `LogManagerConfig` fixture with a deliberately tiny context-value
/// limit, for tests exercising the context-overflow warning path without
/// building kilobyte-long strings.
#[fixture]
pub fn tight_context_limit_config() -> LogManagerConfig {
    LogManagerConfig { max_context_value_length: 8, ..LogManagerConfig::default() }
}

/// A `LogManagerConfig` fixture with tiny trace soft/hard limits, for
/// `TraceBuffer::render` truncation-path tests.
#[fixture]
pub fn tight_trace_limits_config() -> LogManagerConfig {
    LogManagerConfig { trace_soft_limit_chars: 100, trace_hard_limit_chars: 1_000, ..LogManagerConfig::default() }
}

/// A standard root-action inbound fixture: no upstream correlation state.
#[fixture]
pub fn root_inbound() -> action_logging::Inbound {
    action_logging::Inbound::default()
}

/// A child-action inbound fixture correlated to a fixed upstream root,
/// mirroring the causal-graph reconstruction scenario in spec.md §8.6.
#[fixture]
pub fn child_inbound() -> action_logging::Inbound {
    action_logging::Inbound {
        correlation_ids: vec!["root000000000000000000r1".to_string()],
        ref_ids: vec!["caller00000000000000c1".to_string()],
        clients: vec!["upstream-app".to_string()],
        trace_mode: services_common::TraceMode::None,
    }
}
