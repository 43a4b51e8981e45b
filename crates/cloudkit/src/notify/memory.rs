//! In-memory publisher implementation.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use cloudkit_core::notify::{
    DeliveryReceipt, NotificationPublisher, NotifyError, OutboundMessage, Result,
};

/// In-memory publisher for testing.
///
/// Keeps every accepted message in order. Failures can be queued with
/// [`fail_next`](Self::fail_next).
#[derive(Debug, Clone, Default)]
pub struct MemoryPublisher {
    messages: Arc<RwLock<Vec<OutboundMessage>>>,
    failures: Arc<RwLock<VecDeque<NotifyError>>>,
}

impl MemoryPublisher {
    /// Creates a new empty publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the next publish with `error`.
    pub async fn fail_next(&self, error: NotifyError) {
        self.failures.write().await.push_back(error);
    }

    /// Messages published so far.
    pub async fn messages(&self) -> Vec<OutboundMessage> {
        self.messages.read().await.clone()
    }
}

#[async_trait]
impl NotificationPublisher for MemoryPublisher {
    async fn publish(&self, message: OutboundMessage) -> Result<DeliveryReceipt> {
        if let Some(error) = self.failures.write().await.pop_front() {
            return Err(error);
        }

        let mut messages = self.messages.write().await;
        messages.push(message);

        Ok(DeliveryReceipt {
            message_id: Some(format!("msg-{}", messages.len())),
            sequence_number: None,
        })
    }
}
