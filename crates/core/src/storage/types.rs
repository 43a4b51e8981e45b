use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::args::{require, MissingArgument};

/// A stored item as a plain JSON object, with the store's type tags removed.
///
/// Field order is preserved from construction and from the store's response.
pub type Record = Map<String, Value>;

/// Result-count ceiling applied to reads that do not specify one.
pub const DEFAULT_QUERY_LIMIT: i32 = 1000;

/// One page of a paginated read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub items: Vec<Record>,
    /// Key to resume from; absent once the read is exhausted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<Record>,
}

impl Page {
    /// Returns `true` if another page is available.
    pub fn has_more(&self) -> bool {
        self.continuation_token.is_some()
    }
}

/// A key-condition query against a table or one of its indexes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub key_condition_expression: String,
    pub index_name: Option<String>,
    pub filter_expression: Option<String>,
    pub projection_expression: Option<String>,
    #[serde(default)]
    pub expression_attribute_names: BTreeMap<String, String>,
    #[serde(default)]
    pub expression_attribute_values: Record,
    pub limit: Option<i32>,
    pub exclusive_start_key: Option<Record>,
    pub scan_index_forward: Option<bool>,
    pub consistent_read: Option<bool>,
}

impl QueryRequest {
    pub fn new(key_condition_expression: impl Into<String>) -> Self {
        Self {
            key_condition_expression: key_condition_expression.into(),
            ..Default::default()
        }
    }

    pub fn with_index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    pub fn with_filter(mut self, filter_expression: impl Into<String>) -> Self {
        self.filter_expression = Some(filter_expression.into());
        self
    }

    pub fn with_name(mut self, placeholder: impl Into<String>, name: impl Into<String>) -> Self {
        self.expression_attribute_names
            .insert(placeholder.into(), name.into());
        self
    }

    pub fn with_value(mut self, placeholder: impl Into<String>, value: impl Into<Value>) -> Self {
        self.expression_attribute_values
            .insert(placeholder.into(), value.into());
        self
    }

    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resumes the query after a previous page's continuation token.
    pub fn starting_after(mut self, token: Option<Record>) -> Self {
        self.exclusive_start_key = token;
        self
    }

    /// Fills in `limit` when the caller left it unset.
    pub fn with_default_limit(mut self, default_limit: i32) -> Self {
        self.limit.get_or_insert(default_limit);
        self
    }
}

/// A full-table (or full-index) scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub index_name: Option<String>,
    pub filter_expression: Option<String>,
    pub projection_expression: Option<String>,
    #[serde(default)]
    pub expression_attribute_names: BTreeMap<String, String>,
    #[serde(default)]
    pub expression_attribute_values: Record,
    pub limit: Option<i32>,
    pub exclusive_start_key: Option<Record>,
    pub consistent_read: Option<bool>,
}

impl ScanRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter_expression: impl Into<String>) -> Self {
        self.filter_expression = Some(filter_expression.into());
        self
    }

    pub fn with_name(mut self, placeholder: impl Into<String>, name: impl Into<String>) -> Self {
        self.expression_attribute_names
            .insert(placeholder.into(), name.into());
        self
    }

    pub fn with_value(mut self, placeholder: impl Into<String>, value: impl Into<Value>) -> Self {
        self.expression_attribute_values
            .insert(placeholder.into(), value.into());
        self
    }

    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn starting_after(mut self, token: Option<Record>) -> Self {
        self.exclusive_start_key = token;
        self
    }

    pub fn with_default_limit(mut self, default_limit: i32) -> Self {
        self.limit.get_or_insert(default_limit);
        self
    }
}

/// An update-expression write against a single item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub key: Record,
    pub update_expression: String,
    pub condition_expression: Option<String>,
    #[serde(default)]
    pub expression_attribute_names: BTreeMap<String, String>,
    #[serde(default)]
    pub expression_attribute_values: Record,
}

impl UpdateRequest {
    pub fn new(key: Record, update_expression: impl Into<String>) -> Self {
        Self {
            key,
            update_expression: update_expression.into(),
            ..Default::default()
        }
    }

    pub fn with_condition(mut self, condition_expression: impl Into<String>) -> Self {
        self.condition_expression = Some(condition_expression.into());
        self
    }

    pub fn with_name(mut self, placeholder: impl Into<String>, name: impl Into<String>) -> Self {
        self.expression_attribute_names
            .insert(placeholder.into(), name.into());
        self
    }

    pub fn with_value(mut self, placeholder: impl Into<String>, value: impl Into<Value>) -> Self {
        self.expression_attribute_values
            .insert(placeholder.into(), value.into());
        self
    }
}

/// Builds the single-attribute key used by mapping lookups.
///
/// Both parts are required; blank values are rejected before any request is made.
pub fn mapping_key(key_name: &str, key_value: &str) -> Result<Record, MissingArgument> {
    let key_name = require("key name", key_name)?;
    let key_value = require("key value", key_value)?;

    let mut key = Record::new();
    key.insert(key_name.to_string(), Value::String(key_value.to_string()));
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_limit_fills_missing_limit() {
        let request = QueryRequest::new("pk = :pk").with_default_limit(DEFAULT_QUERY_LIMIT);
        assert_eq!(request.limit, Some(1000));
    }

    #[test]
    fn test_default_limit_keeps_explicit_limit() {
        let request = QueryRequest::new("pk = :pk")
            .with_limit(10)
            .with_default_limit(DEFAULT_QUERY_LIMIT);
        assert_eq!(request.limit, Some(10));

        let scan = ScanRequest::new().with_limit(5).with_default_limit(50);
        assert_eq!(scan.limit, Some(5));
    }

    #[test]
    fn test_query_request_builders() {
        let request = QueryRequest::new("#pk = :pk")
            .with_index("GSI1")
            .with_name("#pk", "GSI1PK")
            .with_value(":pk", "CAL#1");

        assert_eq!(request.index_name.as_deref(), Some("GSI1"));
        assert_eq!(request.expression_attribute_names["#pk"], "GSI1PK");
        assert_eq!(request.expression_attribute_values[":pk"], json!("CAL#1"));
    }

    #[test]
    fn test_query_request_deserializes_from_camel_case() {
        let request: QueryRequest = serde_json::from_value(json!({
            "keyConditionExpression": "pk = :pk",
            "expressionAttributeValues": {":pk": "user#1"}
        }))
        .unwrap();

        assert_eq!(request.key_condition_expression, "pk = :pk");
        assert_eq!(request.expression_attribute_values[":pk"], json!("user#1"));
        assert_eq!(request.limit, None);
    }

    #[test]
    fn test_page_serializes_without_token_when_exhausted() {
        let page = Page {
            items: vec![json!({"id": "1"}).as_object().unwrap().clone()],
            continuation_token: None,
        };

        assert!(!page.has_more());
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({"items": [{"id": "1"}]})
        );
    }

    #[test]
    fn test_mapping_key_builds_single_attribute_key() {
        let key = mapping_key("slug", "summer-sale").unwrap();
        assert_eq!(serde_json::Value::Object(key), json!({"slug": "summer-sale"}));
    }

    #[test]
    fn test_mapping_key_rejects_missing_parts() {
        assert_eq!(mapping_key("", "x"), Err(MissingArgument("key name")));
        assert_eq!(mapping_key("slug", " "), Err(MissingArgument("key value")));
    }
}
