//! Converts completed `ActionLog`s into `ActionDocument`s and hands them to
//! a transport with at-least-once, best-effort semantics (spec.md §4.7)
//!
//! The queue in front of the transport is bounded and drop-oldest on
//! overflow (spec.md §5): a stuck collector must never stall request
//! threads. Dropped count is process-wide and surfaced via
//! [`RecordForwarder::dropped_count`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use services_common::ActionDocument;
use tracing::{error, warn};

/// Where a serialized `ActionDocument` ultimately goes. `KafkaTransport`
/// (binary crates only) and `ChannelTransport` (tests, single-process demo
/// wiring) both implement this.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, document: ActionDocument) -> anyhow::Result<()>;
}

/// In-process transport backed by a `tokio::mpsc` channel. Stands in for a
/// running Kafka broker in tests and in the demo wiring between
/// `services/gateway` and `services/monitoring`.
pub struct ChannelTransport {
    sender: tokio::sync::mpsc::Sender<ActionDocument>,
}

impl ChannelTransport {
    #[must_use]
    pub fn new(capacity: usize) -> (Self, tokio::sync::mpsc::Receiver<ActionDocument>) {
        let (sender, receiver) = tokio::sync::mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, document: ActionDocument) -> anyhow::Result<()> {
        self.sender.send(document).await.map_err(|e| anyhow::anyhow!("channel closed: {e}"))
    }
}

/// Publishes to a real Kafka broker, keyed by `app` so records for a given
/// application land on the same partition (spec.md §4.7, `ACTION_LOG_TOPIC`).
pub struct KafkaTransport {
    producer: FutureProducer,
    topic: String,
}

impl KafkaTransport {
    pub fn new(brokers: &str, topic: impl Into<String>) -> anyhow::Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;
        Ok(Self { producer, topic: topic.into() })
    }
}

#[async_trait]
impl Transport for KafkaTransport {
    async fn send(&self, document: ActionDocument) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(&document)?;
        let record = FutureRecord::to(&self.topic).payload(&payload).key(&document.app);
        self.producer
            .send(record, rdkafka::util::Timeout::After(std::time::Duration::from_secs(5)))
            .await
            .map_err(|(e, _)| anyhow::anyhow!("kafka send failed: {e}"))?;
        Ok(())
    }
}

/// Bounded, drop-oldest queue sitting between `LogManager::end` and the
/// background task that actually publishes to `transport`.
pub struct RecordForwarder {
    queue: Mutex<VecDeque<ActionDocument>>,
    capacity: usize,
    dropped: AtomicU64,
    transport: Arc<dyn Transport>,
    /// Failure to publish is recorded on the *next* action, never
    /// recursively (spec.md §4.7): this flag is drained by `take_last_failure`.
    last_failure: Mutex<Option<String>>,
}

impl RecordForwarder {
    #[must_use]
    pub fn new(capacity: usize, transport: Arc<dyn Transport>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            capacity,
            dropped: AtomicU64::new(0),
            transport,
            last_failure: Mutex::new(None),
        }
    }

    /// Enqueues a completed document, dropping the oldest queued one if the
    /// queue is already at capacity.
    pub fn enqueue(&self, document: ActionDocument) {
        let mut queue = self.queue.lock();
        if queue.len() >= self.capacity {
            queue.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        queue.push_back(document);
    }

    /// Drains and publishes everything currently queued. Errors are
    /// swallowed here and stashed for the caller to surface on the next
    /// action, per spec.md §7 ("errors thrown inside the logging pipeline
    /// itself ... never propagate into the action").
    pub async fn flush(&self) {
        let batch: Vec<_> = {
            let mut queue = self.queue.lock();
            queue.drain(..).collect()
        };
        for document in batch {
            if let Err(e) = self.transport.send(document).await {
                error!(error = %e, "failed to publish action document");
                *self.last_failure.lock() = Some(e.to_string());
            }
        }
    }

    /// Number of documents dropped due to queue overflow so far.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Takes the most recent publish failure, if any, to be recorded as
    /// context on the *next* action rather than the one that triggered it.
    pub fn take_last_failure(&self) -> Option<String> {
        self.last_failure.lock().take()
    }
}

/// Warns (does not panic) when the forwarder is being dropped with work
/// still queued, since that work is about to be lost.
impl Drop for RecordForwarder {
    fn drop(&mut self) {
        let remaining = self.queue.lock().len();
        if remaining > 0 {
            warn!(remaining, "record forwarder dropped with unflushed documents");
        }
    }
}
