//! SNS publisher.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_sns::types::MessageAttributeValue;
use aws_sdk_sns::Client;

use cloudkit_core::notify::{
    DeliveryReceipt, MessageAttributes, NotificationPublisher, NotifyError, OutboundMessage,
    Result,
};

use super::error::map_publish_error;

/// SNS-backed publisher. The topic ARN travels with each message.
#[derive(Debug, Clone)]
pub struct SnsPublisher {
    client: Client,
}

impl SnsPublisher {
    /// Creates a new publisher with the given SNS client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a new publisher from a loaded AWS configuration.
    pub fn from_conf(config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(config))
    }

    /// Creates a new publisher using the AWS SDK default credential chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::from_conf(&config)
    }
}

/// Converts encoded attributes to the SDK's attribute values.
pub fn to_sns_attributes(
    attributes: &MessageAttributes,
) -> Result<HashMap<String, MessageAttributeValue>> {
    attributes
        .iter()
        .map(|(name, attribute)| {
            let value = MessageAttributeValue::builder()
                .data_type(attribute.data_type.as_str())
                .string_value(&attribute.string_value)
                .build()
                .map_err(|e| NotifyError::Serialization(format!("{name}: {e}")))?;
            Ok((name.clone(), value))
        })
        .collect()
}

#[async_trait]
impl NotificationPublisher for SnsPublisher {
    async fn publish(&self, message: OutboundMessage) -> Result<DeliveryReceipt> {
        let attributes = to_sns_attributes(&message.attributes)?;

        let output = self
            .client
            .publish()
            .topic_arn(&message.topic)
            .message(message.body)
            .set_message_attributes((!attributes.is_empty()).then_some(attributes))
            .set_subject(message.options.subject)
            .set_message_group_id(message.options.message_group_id)
            .set_message_deduplication_id(message.options.message_deduplication_id)
            .send()
            .await
            .map_err(|e| map_publish_error(e, &message.topic))?;

        Ok(DeliveryReceipt {
            message_id: output.message_id().map(String::from),
            sequence_number: output.sequence_number().map(String::from),
        })
    }
}
