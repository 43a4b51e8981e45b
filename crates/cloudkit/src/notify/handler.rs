//! Event-handler wrapper that reports every invocation to a topic.

use std::fmt::Display;
use std::future::Future;

use serde_json::Value;

use cloudkit_core::notify::{
    encode_attribute, outcome_message, parse_envelope, HandlerOutcome, NotificationEnvelope,
    NotificationPublisher, ParsedNotification, PublishOptions, Result,
};
use cloudkit_core::storage::Record;

use super::Notifier;

/// Runs `handler` on the notification in `event` and publishes the outcome to `topic`.
///
/// The handler receives the parsed payload and attributes. Whatever happens,
/// exactly one message is published: `{"status":"pass","input","result"}`
/// when the handler succeeds, `{"status":"fail","input","error"}` when it
/// fails or when `event` is not a usable envelope. The outbound attributes are
/// the inbound ones plus `status`.
///
/// Returns the outcome; only a failure to publish is an error.
pub async fn wrap_handler<P, F, Fut, E>(
    notifier: &Notifier<P>,
    topic: &str,
    event: Value,
    handler: F,
) -> Result<HandlerOutcome>
where
    P: NotificationPublisher,
    F: FnOnce(ParsedNotification) -> Fut,
    Fut: Future<Output = std::result::Result<Value, E>>,
    E: Display,
{
    let parsed =
        NotificationEnvelope::from_value(event).and_then(|envelope| parse_envelope(&envelope));

    let (input, attributes, outcome) = match parsed {
        Ok(notification) => {
            let input = notification.payload.clone();
            let attributes = publishable(&notification.attributes);
            let outcome = match handler(notification).await {
                Ok(result) => HandlerOutcome::Pass(result),
                Err(err) => HandlerOutcome::Fail(err.to_string()),
            };
            (input, attributes, outcome)
        }
        Err(err) => {
            tracing::warn!(topic, error = %err, "Unusable notification envelope");
            (Value::Null, Record::new(), HandlerOutcome::Fail(err.to_string()))
        }
    };

    if let HandlerOutcome::Fail(error) = &outcome {
        tracing::warn!(topic, error = %error, "Handler failed");
    }

    let (payload, attributes) = outcome_message(&input, &attributes, &outcome);
    notifier
        .publish(topic, &payload, &attributes, PublishOptions::default())
        .await?;

    Ok(outcome)
}

/// Inbound attributes that would not encode again (a `String.Array` holding
/// `null`, say) are forwarded as their JSON text.
fn publishable(attributes: &Record) -> Record {
    attributes
        .iter()
        .map(|(name, value)| match encode_attribute(name, value) {
            Ok(_) => (name.clone(), value.clone()),
            Err(_) => (name.clone(), Value::String(value.to_string())),
        })
        .collect()
}
