//! Inbound notification envelopes as delivered to a function.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode_attributes, InboundAttribute, NotifyError, Result};
use crate::parse::parse_lenient;
use crate::storage::Record;

/// The event a function receives from a topic subscription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    #[serde(rename = "Records", default)]
    pub records: Vec<NotificationRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationRecord {
    pub event_source: Option<String>,
    pub event_subscription_arn: Option<String>,
    pub sns: NotificationMessage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationMessage {
    pub message: String,
    #[serde(default)]
    pub message_attributes: BTreeMap<String, InboundAttribute>,
    pub message_id: Option<String>,
    pub topic_arn: Option<String>,
    pub subject: Option<String>,
    pub timestamp: Option<String>,
}

impl NotificationEnvelope {
    /// Deserializes an envelope from an arbitrary event value.
    pub fn from_value(event: Value) -> Result<Self> {
        serde_json::from_value(event).map_err(|e| NotifyError::MalformedEnvelope(e.to_string()))
    }
}

/// Payload and attributes extracted from an envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedNotification {
    pub payload: Value,
    pub attributes: Record,
}

/// Extracts the first record's message and attributes.
///
/// The message is parsed as JSON when possible and kept as text otherwise.
pub fn parse_envelope(envelope: &NotificationEnvelope) -> Result<ParsedNotification> {
    let record = envelope.records.first().ok_or(NotifyError::EmptyEnvelope)?;

    Ok(ParsedNotification {
        payload: parse_lenient(&record.sns.message),
        attributes: decode_attributes(&record.sns.message_attributes),
    })
}
