//! `CollectorIndexer`: drains completed `ActionDocument`s from a record
//! source into the `Index` (spec.md §4.8)

use std::sync::Arc;

use async_trait::async_trait;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::{ClientConfig, Message};
use services_common::ActionDocument;
use tracing::{error, warn};

use crate::index::Index;

/// Where a `CollectorIndexer` reads `ActionDocument`s from.
#[async_trait]
pub trait RecordSource: Send {
    async fn recv(&mut self) -> Option<ActionDocument>;
}

/// In-process counterpart to `action_logging::ChannelTransport`, used by the
/// demo binary and tests to avoid a running Kafka broker.
pub struct ChannelSource {
    receiver: tokio::sync::mpsc::Receiver<ActionDocument>,
}

impl ChannelSource {
    #[must_use]
    pub fn new(receiver: tokio::sync::mpsc::Receiver<ActionDocument>) -> Self {
        Self { receiver }
    }
}

#[async_trait]
impl RecordSource for ChannelSource {
    async fn recv(&mut self) -> Option<ActionDocument> {
        self.receiver.recv().await
    }
}

/// Consumes `action-log` off a real Kafka broker.
pub struct KafkaSource {
    consumer: StreamConsumer,
}

impl KafkaSource {
    pub fn new(brokers: &str, group_id: &str, topic: &str) -> anyhow::Result<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .create()?;
        consumer.subscribe(&[topic])?;
        Ok(Self { consumer })
    }
}

#[async_trait]
impl RecordSource for KafkaSource {
    async fn recv(&mut self) -> Option<ActionDocument> {
        loop {
            match self.consumer.recv().await {
                Ok(message) => {
                    let Some(payload) = message.payload() else { continue };
                    match serde_json::from_slice::<ActionDocument>(payload) {
                        Ok(document) => {
                            if let Err(e) = self.consumer.commit_message(&message, rdkafka::consumer::CommitMode::Async) {
                                warn!(error = %e, "failed to commit kafka offset");
                            }
                            return Some(document);
                        }
                        Err(e) => {
                            error!(error = %e, "failed to decode action document, skipping message");
                        }
                    }
                }
                Err(e) => {
                    error!(error = %e, "kafka consumer error");
                    return None;
                }
            }
        }
    }
}

/// Drains `source` into `index` forever. Intended to run as a background
/// task alongside the diagram HTTP server.
pub struct CollectorIndexer {
    index: Arc<dyn Index>,
}

impl CollectorIndexer {
    #[must_use]
    pub fn new(index: Arc<dyn Index>) -> Self {
        Self { index }
    }

    pub async fn run(&self, mut source: impl RecordSource) {
        while let Some(document) = source.recv().await {
            self.index.upsert(document).await;
        }
        warn!("record source closed; collector indexer stopping");
    }
}
