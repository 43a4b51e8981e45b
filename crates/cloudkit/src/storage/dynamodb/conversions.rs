//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB `AttributeValue` maps and
//! plain JSON records. These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cloudkit_core::storage::{Record, StoreError};
use serde_json::{Number, Value};

/// A record in the store's native encoding.
pub type Item = HashMap<String, AttributeValue>;

/// Convert a JSON value to its DynamoDB attribute.
pub fn value_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(value_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(record_to_item(map)),
    }
}

/// Convert a record to a DynamoDB item.
pub fn record_to_item(record: &Record) -> Item {
    record
        .iter()
        .map(|(name, value)| (name.clone(), value_to_attribute(value)))
        .collect()
}

/// Convert a DynamoDB attribute to a JSON value.
///
/// Sets become arrays and binary values become base64 text.
pub fn attribute_to_value(attribute: &AttributeValue) -> Result<Value, StoreError> {
    let value = match attribute {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(values) => Value::Array(
            values
                .iter()
                .map(attribute_to_value)
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(map) => Value::Object(item_to_record(map)?),
        AttributeValue::Ss(values) => Value::Array(values.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(values) => Value::Array(
            values
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::B(blob) => Value::String(STANDARD.encode(blob.as_ref())),
        AttributeValue::Bs(blobs) => Value::Array(
            blobs
                .iter()
                .map(|blob| Value::String(STANDARD.encode(blob.as_ref())))
                .collect(),
        ),
        other => {
            return Err(StoreError::InvalidData(format!(
                "Unsupported attribute value: {:?}",
                other
            )))
        }
    };

    Ok(value)
}

/// Convert a DynamoDB item to a record.
///
/// Items come back from the SDK unordered; fields are sorted by name so the
/// same item always produces the same record.
pub fn item_to_record(item: &Item) -> Result<Record, StoreError> {
    let mut fields: Vec<(&String, &AttributeValue)> = item.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .map(|(name, attribute)| Ok((name.clone(), attribute_to_value(attribute)?)))
        .collect()
}

/// Parse a DynamoDB number string.
fn parse_number(n: &str) -> Result<Number, StoreError> {
    serde_json::from_str::<Number>(n.trim())
        .map_err(|_| StoreError::InvalidData(format!("Invalid number: {}", n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::primitives::Blob;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_record_to_item_scalars() {
        let item = record_to_item(&record(json!({
            "id": "user#1",
            "age": 42,
            "score": 9.5,
            "active": true,
            "nickname": null
        })));

        assert_eq!(item.get("id").unwrap().as_s().unwrap(), "user#1");
        assert_eq!(item.get("age").unwrap().as_n().unwrap(), "42");
        assert_eq!(item.get("score").unwrap().as_n().unwrap(), "9.5");
        assert!(*item.get("active").unwrap().as_bool().unwrap());
        assert!(item.get("nickname").unwrap().is_null());
    }

    #[test]
    fn test_record_to_item_nested() {
        let item = record_to_item(&record(json!({
            "tags": ["a", 1],
            "address": {"city": "Montevideo"}
        })));

        let tags = item.get("tags").unwrap().as_l().unwrap();
        assert_eq!(tags[0].as_s().unwrap(), "a");
        assert_eq!(tags[1].as_n().unwrap(), "1");

        let address = item.get("address").unwrap().as_m().unwrap();
        assert_eq!(address.get("city").unwrap().as_s().unwrap(), "Montevideo");
    }

    #[test]
    fn test_item_to_record_strips_type_tags() {
        let original = record(json!({
            "active": false,
            "id": "order#9",
            "lines": [{"qty": 2, "sku": "A-1"}],
            "total": 12.5
        }));

        let parsed = item_to_record(&record_to_item(&original)).unwrap();

        assert_eq!(Value::Object(parsed), Value::Object(original));
    }

    #[test]
    fn test_item_to_record_sorts_fields() {
        let mut item = Item::new();
        item.insert("zeta".to_string(), AttributeValue::S("z".to_string()));
        item.insert("alpha".to_string(), AttributeValue::S("a".to_string()));

        let parsed = item_to_record(&item).unwrap();
        let keys: Vec<&String> = parsed.keys().collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_sets_decode_to_arrays() {
        assert_eq!(
            attribute_to_value(&AttributeValue::Ss(vec!["x".into(), "y".into()])).unwrap(),
            json!(["x", "y"])
        );
        assert_eq!(
            attribute_to_value(&AttributeValue::Ns(vec!["1".into(), "2.5".into()])).unwrap(),
            json!([1, 2.5])
        );
    }

    #[test]
    fn test_binary_decodes_to_base64() {
        let value = attribute_to_value(&AttributeValue::B(Blob::new(b"hi".to_vec()))).unwrap();
        assert_eq!(value, json!("aGk="));
    }

    #[test]
    fn test_wide_numbers_keep_every_digit() {
        let digits = "12345678901234567890123456789012345678";
        let value = attribute_to_value(&AttributeValue::N(digits.to_string())).unwrap();

        assert_eq!(value.to_string(), digits);
        assert_eq!(value_to_attribute(&value), AttributeValue::N(digits.to_string()));

        let fraction = "0.10000000000000000000000000000000000001";
        let value = attribute_to_value(&AttributeValue::N(fraction.to_string())).unwrap();
        assert_eq!(value_to_attribute(&value), AttributeValue::N(fraction.to_string()));
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let result = attribute_to_value(&AttributeValue::N("twelve".to_string()));
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }
}
