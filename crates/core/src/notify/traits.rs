use async_trait::async_trait;

use super::{DeliveryReceipt, OutboundMessage, Result};

/// A managed publish-subscribe notification service.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// Sends a prepared message to its topic.
    async fn publish(&self, message: OutboundMessage) -> Result<DeliveryReceipt>;
}
