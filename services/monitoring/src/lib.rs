//! Collector side of the action-logging platform: indexes completed
//! `ActionDocument`s and serves architecture/causal diagrams over HTTP
//! (spec.md §4.8, §4.9)

pub mod collector;
pub mod config;
pub mod diagram;
pub mod index;
pub mod server;

pub use collector::{ChannelSource, CollectorIndexer, KafkaSource, RecordSource};
pub use config::MonitoringConfig;
pub use diagram::{DiagramBuilder, DiagramError};
pub use index::{Index, MemoryIndex};
