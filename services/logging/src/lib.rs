//! Structured action logging pipeline
//!
//! One `ActionLog` accumulates state across the lifetime of a single
//! action (an inbound request, a scheduled job, a consumed message), and is
//! converted into a single `ActionDocument` when the action ends. See
//! `services_common::model::ActionDocument` for the wire shape and
//! `manager::LogManager` for the entry point applications actually use.

pub mod action_log;
pub mod correlator;
pub mod filter;
pub mod forwarder;
pub mod manager;
pub mod performance;
pub mod trace_buffer;

pub use action_log::{ActionLog, Inbound, LogEvent};
pub use correlator::{outbound_headers, parse_inbound, InboundHeaders};
pub use filter::LogFilter;
pub use forwarder::{ChannelTransport, KafkaTransport, RecordForwarder, Transport};
pub use manager::{LogManager, Outcome};
