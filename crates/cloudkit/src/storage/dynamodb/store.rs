//! DynamoDB store implementation.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, ReturnValue, WriteRequest};
use aws_sdk_dynamodb::Client;

use cloudkit_core::storage::{
    KeyValueStore, Page, QueryRequest, Record, Result, ScanRequest, StoreError, UpdateRequest,
};

use super::conversions::{item_to_record, record_to_item, Item};
use super::error::{
    map_batch_write_error, map_delete_item_error, map_get_item_error, map_put_item_error,
    map_query_error, map_scan_error, map_update_item_error,
};

/// DynamoDB-backed store.
///
/// The table is chosen per call, so one store serves every table the
/// function touches.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Creates a new store with the given DynamoDB client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a new store from a loaded AWS configuration.
    pub fn from_conf(config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(config))
    }

    /// Creates a new store using the AWS SDK default credential chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::from_conf(&config)
    }
}

// The service rejects empty expression maps, so they are only sent when used.
fn expression_names(names: &BTreeMap<String, String>) -> Option<HashMap<String, String>> {
    if names.is_empty() {
        return None;
    }
    Some(names.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

fn expression_values(values: &Record) -> Option<HashMap<String, AttributeValue>> {
    if values.is_empty() {
        return None;
    }
    Some(record_to_item(values))
}

fn to_page(items: Option<Vec<Item>>, last_evaluated_key: Option<Item>) -> Result<Page> {
    let items = items
        .unwrap_or_default()
        .iter()
        .map(item_to_record)
        .collect::<Result<Vec<_>>>()?;

    let continuation_token = match last_evaluated_key {
        Some(key) if !key.is_empty() => Some(item_to_record(&key)?),
        _ => None,
    };

    Ok(Page {
        items,
        continuation_token,
    })
}

#[async_trait]
impl KeyValueStore for DynamoDbStore {
    async fn write_chunk(&self, table: &str, records: Vec<Record>) -> Result<Vec<Record>> {
        let requests = records
            .iter()
            .map(|record| {
                let put = PutRequest::builder()
                    .set_item(Some(record_to_item(record)))
                    .build()
                    .map_err(|e| StoreError::InvalidData(e.to_string()))?;
                Ok(WriteRequest::builder().put_request(put).build())
            })
            .collect::<Result<Vec<_>>>()?;

        let output = self
            .client
            .batch_write_item()
            .request_items(table, requests)
            .send()
            .await
            .map_err(|e| map_batch_write_error(e, table))?;

        output
            .unprocessed_items
            .unwrap_or_default()
            .into_values()
            .flatten()
            .filter_map(|request| request.put_request)
            .map(|put| item_to_record(put.item()))
            .collect()
    }

    async fn query(&self, table: &str, request: &QueryRequest) -> Result<Page> {
        let output = self
            .client
            .query()
            .table_name(table)
            .key_condition_expression(&request.key_condition_expression)
            .set_index_name(request.index_name.clone())
            .set_filter_expression(request.filter_expression.clone())
            .set_projection_expression(request.projection_expression.clone())
            .set_expression_attribute_names(expression_names(&request.expression_attribute_names))
            .set_expression_attribute_values(expression_values(
                &request.expression_attribute_values,
            ))
            .set_limit(request.limit)
            .set_exclusive_start_key(request.exclusive_start_key.as_ref().map(record_to_item))
            .set_scan_index_forward(request.scan_index_forward)
            .set_consistent_read(request.consistent_read)
            .send()
            .await
            .map_err(|e| map_query_error(e, table))?;

        to_page(output.items, output.last_evaluated_key)
    }

    async fn scan(&self, table: &str, request: &ScanRequest) -> Result<Page> {
        let output = self
            .client
            .scan()
            .table_name(table)
            .set_index_name(request.index_name.clone())
            .set_filter_expression(request.filter_expression.clone())
            .set_projection_expression(request.projection_expression.clone())
            .set_expression_attribute_names(expression_names(&request.expression_attribute_names))
            .set_expression_attribute_values(expression_values(
                &request.expression_attribute_values,
            ))
            .set_limit(request.limit)
            .set_exclusive_start_key(request.exclusive_start_key.as_ref().map(record_to_item))
            .set_consistent_read(request.consistent_read)
            .send()
            .await
            .map_err(|e| map_scan_error(e, table))?;

        to_page(output.items, output.last_evaluated_key)
    }

    async fn get_item(&self, table: &str, key: &Record) -> Result<Option<Record>> {
        let output = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(record_to_item(key)))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, table))?;

        output.item.as_ref().map(item_to_record).transpose()
    }

    async fn put_item(&self, table: &str, item: Record) -> Result<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(record_to_item(&item)))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, table))?;

        Ok(())
    }

    async fn update_item(&self, table: &str, request: &UpdateRequest) -> Result<Option<Record>> {
        let output = self
            .client
            .update_item()
            .table_name(table)
            .set_key(Some(record_to_item(&request.key)))
            .update_expression(&request.update_expression)
            .set_condition_expression(request.condition_expression.clone())
            .set_expression_attribute_names(expression_names(&request.expression_attribute_names))
            .set_expression_attribute_values(expression_values(
                &request.expression_attribute_values,
            ))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, table))?;

        output.attributes.as_ref().map(item_to_record).transpose()
    }

    async fn delete_item(&self, table: &str, key: &Record) -> Result<()> {
        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(record_to_item(key)))
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, table))?;

        Ok(())
    }
}
