//! Lenient JSON parsing.

use serde_json::Value;

/// Parses `text` as JSON, falling back to the original text.
///
/// Parse failures are not errors here: the caller gets `Value::String(text)`
/// back, so plain-text payloads pass through untouched.
///
/// # Examples
///
/// ```
/// use cloudkit_core::parse::parse_lenient;
/// use serde_json::json;
///
/// assert_eq!(parse_lenient(r#"{"a":1}"#), json!({"a": 1}));
/// assert_eq!(parse_lenient("not json"), json!("not json"));
/// ```
pub fn parse_lenient(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
