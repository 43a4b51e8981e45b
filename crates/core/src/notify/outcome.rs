//! Pass/fail envelopes republished after a wrapped handler runs.

use serde_json::{json, Value};

use crate::storage::Record;

/// Attribute carrying `pass` or `fail` on republished messages.
pub const STATUS_ATTRIBUTE: &str = "status";

/// Result of running a wrapped handler.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutcome {
    Pass(Value),
    Fail(String),
}

impl HandlerOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Pass(_) => "pass",
            Self::Fail(_) => "fail",
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass(_))
    }
}

/// Builds the payload and attributes announcing `outcome`.
///
/// The payload echoes the handler input next to its result (or error). The
/// attributes are the inbound ones with `status` added, so subscribers can
/// filter on it.
pub fn outcome_message(
    input: &Value,
    attributes: &Record,
    outcome: &HandlerOutcome,
) -> (Value, Record) {
    let payload = match outcome {
        HandlerOutcome::Pass(result) => json!({
            "status": outcome.status(),
            "input": input,
            "result": result,
        }),
        HandlerOutcome::Fail(error) => json!({
            "status": outcome.status(),
            "input": input,
            "error": error,
        }),
    };

    let mut attributes = attributes.clone();
    attributes.insert(
        STATUS_ATTRIBUTE.to_string(),
        Value::String(outcome.status().to_string()),
    );

    (payload, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_message() {
        let attributes = json!({"tenant": "acme"}).as_object().unwrap().clone();
        let (payload, attrs) = outcome_message(
            &json!({"orderId": "o-1"}),
            &attributes,
            &HandlerOutcome::Pass(json!({"charged": true})),
        );

        assert_eq!(
            payload,
            json!({"status": "pass", "input": {"orderId": "o-1"}, "result": {"charged": true}})
        );
        assert_eq!(attrs["status"], json!("pass"));
        assert_eq!(attrs["tenant"], json!("acme"));
    }

    #[test]
    fn test_fail_message() {
        let (payload, attrs) = outcome_message(
            &json!(null),
            &Record::new(),
            &HandlerOutcome::Fail("card declined".to_string()),
        );

        assert_eq!(
            payload,
            json!({"status": "fail", "input": null, "error": "card declined"})
        );
        assert_eq!(attrs["status"], json!("fail"));
    }

    #[test]
    fn test_status_overrides_inbound_status_attribute() {
        let attributes = json!({"status": "pass"}).as_object().unwrap().clone();
        let outcome = HandlerOutcome::Fail("timeout".to_string());
        let (_, attrs) = outcome_message(&json!({}), &attributes, &outcome);
        assert_eq!(attrs["status"], json!("fail"));
    }
}
