//! In-memory store implementation.
//!
//! Behaves enough like the managed store for tests and local runs: items are
//! kept per table, queries and scans understand `field = :value` clauses
//! joined by `AND`, and updates understand `SET field = :value` lists. Batch
//! writes can be told to leave records unprocessed or to fail outright, and
//! every request is recorded for inspection.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use cloudkit_core::storage::{
    KeyValueStore, Page, QueryRequest, Record, Result, ScanRequest, StoreError, UpdateRequest,
};

/// Field used by continuation tokens handed out by this store.
const OFFSET_TOKEN: &str = "offset";

/// One batch write request as received by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteCall {
    pub table: String,
    pub records: Vec<Record>,
}

/// In-memory storage backend for testing.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, Vec<Record>>>>,
    key_fields: Arc<RwLock<HashMap<String, Vec<String>>>>,
    unprocessed_plan: Arc<RwLock<VecDeque<usize>>>,
    write_failures: Arc<RwLock<VecDeque<StoreError>>>,
    write_calls: Arc<RwLock<Vec<WriteCall>>>,
    queries: Arc<RwLock<Vec<QueryRequest>>>,
    scans: Arc<RwLock<Vec<ScanRequest>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the primary key fields of `table`, so puts replace instead of append.
    pub async fn define_table(&self, table: &str, key_fields: &[&str]) {
        self.key_fields.write().await.insert(
            table.to_string(),
            key_fields.iter().map(|f| f.to_string()).collect(),
        );
    }

    /// Seeds `table` with records.
    pub async fn insert_records(&self, table: &str, records: Vec<Record>) {
        for record in records {
            self.store(table, record).await;
        }
    }

    /// Leaves the last `count` records of the next batch write request unprocessed.
    ///
    /// Calls queue up: the first planned count applies to the next request,
    /// the second to the one after, and so on.
    pub async fn leave_unprocessed(&self, count: usize) {
        self.unprocessed_plan.write().await.push_back(count);
    }

    /// Fails the next batch write request with `error`.
    pub async fn fail_next_write(&self, error: StoreError) {
        self.write_failures.write().await.push_back(error);
    }

    /// All records currently stored in `table`.
    pub async fn records(&self, table: &str) -> Vec<Record> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Batch write requests received so far.
    pub async fn write_calls(&self) -> Vec<WriteCall> {
        self.write_calls.read().await.clone()
    }

    /// Query requests received so far.
    pub async fn queries(&self) -> Vec<QueryRequest> {
        self.queries.read().await.clone()
    }

    /// Scan requests received so far.
    pub async fn scans(&self) -> Vec<ScanRequest> {
        self.scans.read().await.clone()
    }

    async fn store(&self, table: &str, record: Record) {
        let key_fields = self.key_fields.read().await.get(table).cloned();
        let mut tables = self.tables.write().await;
        let records = tables.entry(table.to_string()).or_default();

        let existing = key_fields.and_then(|fields| {
            let key = project(&record, &fields);
            records.iter().position(|r| matches_key(r, &key))
        });

        match existing {
            Some(index) => records[index] = record,
            None => records.push(record),
        }
    }

    async fn matching(
        &self,
        table: &str,
        expressions: &[&str],
        names: &BTreeMap<String, String>,
        values: &Record,
    ) -> Vec<Record> {
        let clauses: Vec<(String, Value)> = expressions
            .iter()
            .flat_map(|expression| equality_clauses(expression, names, values))
            .collect();

        self.records(table)
            .await
            .into_iter()
            .filter(|record| {
                clauses
                    .iter()
                    .all(|(field, value)| record.get(field) == Some(value))
            })
            .collect()
    }
}

fn project(record: &Record, fields: &[String]) -> Record {
    fields
        .iter()
        .filter_map(|f| record.get(f).map(|v| (f.clone(), v.clone())))
        .collect()
}

fn matches_key(record: &Record, key: &Record) -> bool {
    !key.is_empty() && key.iter().all(|(k, v)| record.get(k) == Some(v))
}

fn resolve_name(name: &str, names: &BTreeMap<String, String>) -> String {
    names.get(name).cloned().unwrap_or_else(|| name.to_string())
}

/// Extracts `field = :value` pairs from an expression; other clauses are ignored.
fn equality_clauses(
    expression: &str,
    names: &BTreeMap<String, String>,
    values: &Record,
) -> Vec<(String, Value)> {
    expression
        .split(" AND ")
        .filter_map(|clause| {
            let (lhs, rhs) = clause.split_once(" = ")?;
            let value = values.get(rhs.trim())?.clone();
            Some((resolve_name(lhs.trim(), names), value))
        })
        .collect()
}

fn apply_set_expression(record: &mut Record, request: &UpdateRequest) -> Result<()> {
    let unsupported =
        || StoreError::InvalidData(format!("Unsupported update expression: {}", request.update_expression));

    let assignments = request
        .update_expression
        .trim()
        .strip_prefix("SET ")
        .ok_or_else(unsupported)?;

    for assignment in assignments.split(',') {
        let (lhs, rhs) = assignment.split_once('=').ok_or_else(unsupported)?;
        let value = request
            .expression_attribute_values
            .get(rhs.trim())
            .ok_or_else(|| StoreError::InvalidData(format!("Missing value for {}", rhs.trim())))?;
        record.insert(
            resolve_name(lhs.trim(), &request.expression_attribute_names),
            value.clone(),
        );
    }

    Ok(())
}

fn paginate(matching: Vec<Record>, start: Option<&Record>, limit: Option<i32>) -> Page {
    let offset = start
        .and_then(|token| token.get(OFFSET_TOKEN))
        .and_then(Value::as_u64)
        .unwrap_or(0) as usize;

    let remaining: Vec<Record> = matching.into_iter().skip(offset).collect();
    let page_size = limit.map_or(remaining.len(), |l| l.max(0) as usize);
    let has_more = remaining.len() > page_size;
    let items: Vec<Record> = remaining.into_iter().take(page_size).collect();
    let next_offset = offset + items.len();

    let continuation_token = has_more.then(|| {
        let mut token = Record::new();
        token.insert(OFFSET_TOKEN.to_string(), json!(next_offset));
        token
    });

    Page {
        items,
        continuation_token,
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn write_chunk(&self, table: &str, records: Vec<Record>) -> Result<Vec<Record>> {
        self.write_calls.write().await.push(WriteCall {
            table: table.to_string(),
            records: records.clone(),
        });

        if let Some(error) = self.write_failures.write().await.pop_front() {
            return Err(error);
        }

        let declined = self
            .unprocessed_plan
            .write()
            .await
            .pop_front()
            .unwrap_or(0)
            .min(records.len());

        let mut records = records;
        let unprocessed = records.split_off(records.len() - declined);
        for record in records {
            self.store(table, record).await;
        }

        Ok(unprocessed)
    }

    async fn query(&self, table: &str, request: &QueryRequest) -> Result<Page> {
        self.queries.write().await.push(request.clone());

        let mut expressions = vec![request.key_condition_expression.as_str()];
        if let Some(filter) = &request.filter_expression {
            expressions.push(filter);
        }

        let mut matching = self
            .matching(
                table,
                &expressions,
                &request.expression_attribute_names,
                &request.expression_attribute_values,
            )
            .await;
        if request.scan_index_forward == Some(false) {
            matching.reverse();
        }

        Ok(paginate(
            matching,
            request.exclusive_start_key.as_ref(),
            request.limit,
        ))
    }

    async fn scan(&self, table: &str, request: &ScanRequest) -> Result<Page> {
        self.scans.write().await.push(request.clone());

        let expressions: Vec<&str> = request.filter_expression.as_deref().into_iter().collect();
        let matching = self
            .matching(
                table,
                &expressions,
                &request.expression_attribute_names,
                &request.expression_attribute_values,
            )
            .await;

        Ok(paginate(
            matching,
            request.exclusive_start_key.as_ref(),
            request.limit,
        ))
    }

    async fn get_item(&self, table: &str, key: &Record) -> Result<Option<Record>> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .and_then(|records| records.iter().find(|r| matches_key(r, key)))
            .cloned())
    }

    async fn put_item(&self, table: &str, item: Record) -> Result<()> {
        self.store(table, item).await;
        Ok(())
    }

    async fn update_item(&self, table: &str, request: &UpdateRequest) -> Result<Option<Record>> {
        let mut tables = self.tables.write().await;
        let records = tables.entry(table.to_string()).or_default();

        let index = match records.iter().position(|r| matches_key(r, &request.key)) {
            Some(index) => index,
            None => {
                records.push(request.key.clone());
                records.len() - 1
            }
        };

        apply_set_expression(&mut records[index], request)?;
        Ok(Some(records[index].clone()))
    }

    async fn delete_item(&self, table: &str, key: &Record) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(records) = tables.get_mut(table) {
            records.retain(|r| !matches_key(r, key));
        }
        Ok(())
    }
}
