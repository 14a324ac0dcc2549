//! Parses/emits correlation headers across process hops (spec.md §4.6)
//!
//! Kept transport-agnostic (plain `&str` lookups) so both the axum gateway
//! and any future transport can drive it without this crate depending on a
//! specific HTTP stack.

use services_common::constants::{HEADER_CLIENT, HEADER_CORRELATION_ID, HEADER_REF_ID, HEADER_TRACE};
use services_common::TraceMode;

use crate::action_log::{ActionLog, Inbound};

/// The correlation headers as read off an inbound request/message. Absent
/// fields are `None`; multi-valued fields are already split on commas.
#[derive(Debug, Clone, Default)]
pub struct InboundHeaders {
    pub correlation_id: Option<String>,
    pub ref_id: Option<String>,
    pub client: Option<String>,
    pub trace: Option<String>,
}

fn split_ids(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

fn parse_trace_mode(value: Option<&str>) -> TraceMode {
    match value.map(str::to_ascii_uppercase).as_deref() {
        Some("CASCADE") => TraceMode::Cascade,
        Some("CURRENT") => TraceMode::Current,
        _ => TraceMode::None,
    }
}

/// Turns inbound headers into the `Inbound` state an `ActionLog` is built
/// from. Absence of `x-correlation-id` marks the action as root.
#[must_use]
pub fn parse_inbound(headers: &InboundHeaders) -> Inbound {
    Inbound {
        correlation_ids: headers.correlation_id.as_deref().map(split_ids).unwrap_or_default(),
        ref_ids: headers.ref_id.as_deref().map(split_ids).unwrap_or_default(),
        clients: headers.client.as_deref().map(split_ids).unwrap_or_default(),
        trace_mode: parse_trace_mode(headers.trace.as_deref()),
    }
}

/// Headers to inject on an outbound call made from within `action`, on
/// behalf of `app_name` (spec.md §4.6 "On outbound: inject from current
/// ActionLog").
#[must_use]
pub fn outbound_headers(action: &ActionLog, app_name: &str) -> Vec<(&'static str, String)> {
    let mut headers = vec![
        (HEADER_CORRELATION_ID, action.correlation_ids_for_emission().join(",")),
        (HEADER_REF_ID, action.id().to_string()),
        (HEADER_CLIENT, app_name.to_string()),
    ];
    if action.trace_mode() != TraceMode::None {
        let value = match action.trace_mode() {
            TraceMode::Cascade => "CASCADE",
            TraceMode::Current => "CURRENT",
            TraceMode::None => unreachable!(),
        };
        headers.push((HEADER_TRACE, value.to_string()));
    }
    headers
}
