//! Pure functions for encoding and decoding typed message attributes.
//!
//! Outbound attributes carry a `DataType` and a text `StringValue`. Arrays are
//! sent as JSON text under the `String.Array` type and parsed back on receipt.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{NotifyError, Result};
use crate::parse::parse_lenient;
use crate::storage::Record;

/// Attribute types accepted by the notification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeDataType {
    String,
    Number,
    #[serde(rename = "String.Array")]
    StringArray,
}

impl AttributeDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::StringArray => "String.Array",
        }
    }
}

/// A typed attribute ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageAttribute {
    pub data_type: AttributeDataType,
    pub string_value: String,
}

impl MessageAttribute {
    /// Turns the attribute back into the JSON value it was encoded from.
    pub fn decode(&self) -> Value {
        decode_attribute(self.data_type.as_str(), &self.string_value)
    }
}

/// Outbound attributes keyed by name.
pub type MessageAttributes = BTreeMap<String, MessageAttribute>;

/// An attribute as it appears in an inbound notification record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundAttribute {
    #[serde(rename = "Type")]
    pub data_type: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Encodes one attribute value.
///
/// Strings, numbers and arrays are accepted; anything else is an
/// [`NotifyError::InvalidAttributeType`].
pub fn encode_attribute(name: &str, value: &Value) -> Result<MessageAttribute> {
    let (data_type, string_value) = match value {
        Value::String(s) => (AttributeDataType::String, s.clone()),
        Value::Number(n) => (AttributeDataType::Number, n.to_string()),
        Value::Array(_) => (AttributeDataType::StringArray, value.to_string()),
        Value::Bool(_) => return Err(invalid(name, "boolean")),
        Value::Null => return Err(invalid(name, "null")),
        Value::Object(_) => return Err(invalid(name, "object")),
    };

    Ok(MessageAttribute {
        data_type,
        string_value,
    })
}

fn invalid(name: &str, kind: &'static str) -> NotifyError {
    NotifyError::InvalidAttributeType {
        name: name.to_string(),
        kind,
    }
}

/// Encodes a whole attribute map.
///
/// # Examples
///
/// ```
/// use cloudkit_core::notify::{parse_attributes, AttributeDataType};
/// use serde_json::json;
///
/// let input = json!({"tags": ["x", "y"], "count": 3});
/// let attributes = parse_attributes(input.as_object().unwrap()).unwrap();
///
/// assert_eq!(attributes["tags"].data_type, AttributeDataType::StringArray);
/// assert_eq!(attributes["tags"].string_value, r#"["x","y"]"#);
/// assert_eq!(attributes["count"].data_type, AttributeDataType::Number);
/// assert_eq!(attributes["count"].string_value, "3");
/// ```
pub fn parse_attributes(attributes: &Record) -> Result<MessageAttributes> {
    attributes
        .iter()
        .map(|(name, value)| Ok((name.clone(), encode_attribute(name, value)?)))
        .collect()
}

/// Decodes one received attribute.
///
/// `String.Array` and `Number` values are parsed back from text. A value that
/// does not parse is kept as text.
pub fn decode_attribute(data_type: &str, value: &str) -> Value {
    match data_type {
        "String.Array" | "Number" => parse_lenient(value),
        _ => Value::String(value.to_string()),
    }
}

/// Decodes the attributes of an inbound notification record.
pub fn decode_attributes(attributes: &BTreeMap<String, InboundAttribute>) -> Record {
    attributes
        .iter()
        .map(|(name, attr)| (name.clone(), decode_attribute(&attr.data_type, &attr.value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_parse_attributes_array_and_number() {
        let input = record(json!({"tags": ["x", "y"], "count": 3}));
        let attributes = parse_attributes(&input).unwrap();

        assert_eq!(
            serde_json::to_value(&attributes).unwrap(),
            json!({
                "tags": {"DataType": "String.Array", "StringValue": "[\"x\",\"y\"]"},
                "count": {"DataType": "Number", "StringValue": "3"}
            })
        );
    }

    #[test]
    fn test_parse_attributes_string() {
        let attributes = parse_attributes(&record(json!({"kind": "order.created"}))).unwrap();

        assert_eq!(
            attributes["kind"],
            MessageAttribute {
                data_type: AttributeDataType::String,
                string_value: "order.created".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_attributes_rejects_boolean() {
        let result = parse_attributes(&record(json!({"urgent": true})));

        assert_eq!(
            result,
            Err(NotifyError::InvalidAttributeType {
                name: "urgent".to_string(),
                kind: "boolean",
            })
        );
    }

    #[test]
    fn test_parse_attributes_rejects_object_and_null() {
        assert!(matches!(
            encode_attribute("meta", &json!({"a": 1})),
            Err(NotifyError::InvalidAttributeType { kind: "object", .. })
        ));
        assert!(matches!(
            encode_attribute("gone", &Value::Null),
            Err(NotifyError::InvalidAttributeType { kind: "null", .. })
        ));
    }

    #[test]
    fn test_decode_inbound_attributes() {
        let mut inbound = BTreeMap::new();
        inbound.insert(
            "tags".to_string(),
            InboundAttribute {
                data_type: "String.Array".to_string(),
                value: r#"["x","y"]"#.to_string(),
            },
        );
        inbound.insert(
            "count".to_string(),
            InboundAttribute {
                data_type: "Number".to_string(),
                value: "3".to_string(),
            },
        );
        inbound.insert(
            "kind".to_string(),
            InboundAttribute {
                data_type: "String".to_string(),
                value: "42".to_string(),
            },
        );

        let decoded = decode_attributes(&inbound);

        assert_eq!(decoded["tags"], json!(["x", "y"]));
        assert_eq!(decoded["count"], json!(3));
        // Plain strings are never reinterpreted.
        assert_eq!(decoded["kind"], json!("42"));
    }

    #[test]
    fn test_decode_unparsable_array_keeps_text() {
        assert_eq!(decode_attribute("String.Array", "[oops"), json!("[oops"));
    }

    #[test]
    fn test_message_attribute_decode_reverses_encode() {
        let value = json!(["a", 1, "b"]);
        let encoded = encode_attribute("mixed", &value).unwrap();
        assert_eq!(encoded.decode(), value);
    }
}
