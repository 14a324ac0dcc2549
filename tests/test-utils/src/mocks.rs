//! Mock collaborators for testing the forwarder/collector seam

use std::sync::Arc;

use action_logging::Transport;
use async_trait::async_trait;
use parking_lot::Mutex;
use services_common::ActionDocument;

/// Records every document handed to it in order, for asserting on what a
/// `RecordForwarder` actually published without a running Kafka broker.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<ActionDocument>>>,
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far, in send order.
    #[must_use]
    pub fn sent(&self) -> Vec<ActionDocument> {
        self.sent.lock().clone()
    }

    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, document: ActionDocument) -> anyhow::Result<()> {
        self.sent.lock().push(document);
        Ok(())
    }
}

/// Always fails, for exercising `RecordForwarder`'s "failure recorded on the
/// *next* action" rule (spec.md §4.7) without depending on Kafka being down.
#[derive(Clone, Default)]
pub struct FailingTransport {
    failures: Arc<Mutex<usize>>,
}

impl FailingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        *self.failures.lock()
    }
}

#[async_trait]
impl Transport for FailingTransport {
    async fn send(&self, _document: ActionDocument) -> anyhow::Result<()> {
        *self.failures.lock() += 1;
        Err(anyhow::anyhow!("simulated transport failure"))
    }
}
