//! Notification helper built on any [`NotificationPublisher`].

use std::sync::Arc;

use serde::Serialize;

use cloudkit_core::notify::{
    prepare_message, DeliveryReceipt, NotificationPublisher, PublishOptions, Result,
};
use cloudkit_core::storage::Record;

/// Publishes JSON payloads with typed attributes to a topic.
///
/// # Type Parameters
///
/// * `P` - The underlying publisher implementation
#[derive(Debug)]
pub struct Notifier<P>
where
    P: NotificationPublisher,
{
    publisher: Arc<P>,
}

impl<P> Clone for Notifier<P>
where
    P: NotificationPublisher,
{
    fn clone(&self) -> Self {
        Self {
            publisher: Arc::clone(&self.publisher),
        }
    }
}

impl<P> Notifier<P>
where
    P: NotificationPublisher,
{
    pub fn new(publisher: Arc<P>) -> Self {
        Self { publisher }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Serializes `payload`, encodes `attributes` and sends both to `topic`.
    ///
    /// Attribute values must be strings, numbers or arrays; anything else is
    /// rejected before the message is sent.
    pub async fn publish<T>(
        &self,
        topic: &str,
        payload: &T,
        attributes: &Record,
        options: PublishOptions,
    ) -> Result<DeliveryReceipt>
    where
        T: Serialize + ?Sized,
    {
        let message = prepare_message(topic, payload, attributes, options)?;
        let attribute_count = message.attributes.len();

        match self.publisher.publish(message).await {
            Ok(receipt) => {
                tracing::info!(
                    topic,
                    attributes = attribute_count,
                    message_id = receipt.message_id.as_deref().unwrap_or_default(),
                    "Notification published"
                );
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(topic, error = %err, "Failed to publish notification");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::memory::MemoryPublisher;
    use cloudkit_core::args::MissingArgument;
    use cloudkit_core::notify::{AttributeDataType, NotifyError};
    use serde_json::json;

    const TOPIC: &str = "arn:aws:sns:us-east-1:123456789012:orders";

    fn notifier() -> (Arc<MemoryPublisher>, Notifier<MemoryPublisher>) {
        let publisher = Arc::new(MemoryPublisher::new());
        (publisher.clone(), Notifier::new(publisher))
    }

    #[tokio::test]
    async fn test_publish_sends_serialized_payload() {
        let (publisher, notifier) = notifier();
        let attributes = json!({"tags": ["x", "y"], "count": 3})
            .as_object()
            .unwrap()
            .clone();

        let receipt = notifier
            .publish(TOPIC, &json!({"orderId": "o-1"}), &attributes, PublishOptions::default())
            .await
            .unwrap();
        assert_eq!(receipt.message_id.as_deref(), Some("msg-1"));

        let messages = publisher.messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].topic, TOPIC);
        assert_eq!(messages[0].body, r#"{"orderId":"o-1"}"#);
        assert_eq!(messages[0].attributes["tags"].data_type, AttributeDataType::StringArray);
        assert_eq!(messages[0].attributes["tags"].string_value, r#"["x","y"]"#);
        assert_eq!(messages[0].attributes["count"].string_value, "3");
    }

    #[tokio::test]
    async fn test_publish_rejects_invalid_attribute_before_sending() {
        let (publisher, notifier) = notifier();
        let attributes = json!({"flag": true}).as_object().unwrap().clone();

        let result = notifier
            .publish(TOPIC, "hello", &attributes, PublishOptions::default())
            .await;

        assert!(matches!(
            result,
            Err(NotifyError::InvalidAttributeType { ref name, .. }) if name == "flag"
        ));
        assert!(publisher.messages().await.is_empty());
    }

    #[tokio::test]
    async fn test_publish_requires_topic() {
        let (_, notifier) = notifier();

        let result = notifier
            .publish("", "hello", &Record::new(), PublishOptions::default())
            .await;

        assert_eq!(result, Err(MissingArgument("topic").into()));
    }

    #[tokio::test]
    async fn test_publish_surfaces_publisher_errors() {
        let (publisher, notifier) = notifier();
        publisher
            .fail_next(NotifyError::TopicNotFound(TOPIC.to_string()))
            .await;

        let result = notifier
            .publish(TOPIC, "hello", &Record::new(), PublishOptions::default())
            .await;

        assert_eq!(result, Err(NotifyError::TopicNotFound(TOPIC.to_string())));
    }
}
