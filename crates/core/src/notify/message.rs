use serde::{Deserialize, Serialize};

use super::{parse_attributes, MessageAttributes, NotifyError, Result};
use crate::args::require;
use crate::storage::Record;

/// Optional publish settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOptions {
    pub subject: Option<String>,
    /// Required by FIFO topics.
    pub message_group_id: Option<String>,
    pub message_deduplication_id: Option<String>,
}

/// A fully prepared message: serialized payload plus typed attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub topic: String,
    pub body: String,
    pub attributes: MessageAttributes,
    pub options: PublishOptions,
}

/// Receipt returned by the notification service for an accepted message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    pub message_id: Option<String>,
    /// Set for FIFO topics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
}

/// Serializes `payload` to JSON text and encodes `attributes`.
///
/// The topic is validated first; nothing is sent from here.
pub fn prepare_message<T>(
    topic: &str,
    payload: &T,
    attributes: &Record,
    options: PublishOptions,
) -> Result<OutboundMessage>
where
    T: Serialize + ?Sized,
{
    let topic = require("topic", topic)?;
    let body =
        serde_json::to_string(payload).map_err(|e| NotifyError::Serialization(e.to_string()))?;

    Ok(OutboundMessage {
        topic: topic.to_string(),
        body,
        attributes: parse_attributes(attributes)?,
        options,
    })
}
