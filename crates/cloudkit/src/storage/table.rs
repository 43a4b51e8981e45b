//! Table helper built on any [`KeyValueStore`].
//!
//! Adds what the raw store calls leave to the caller: chunked concurrent batch
//! writes with retry of unprocessed records, a default result limit on reads,
//! pagination helpers and required-argument checks.

use std::sync::Arc;

use futures_util::future::try_join_all;

use cloudkit_core::args::require;
use cloudkit_core::storage::{
    chunk_records, mapping_key, BatchWriteOptions, BatchWriteReport, KeyValueStore, Page,
    QueryRequest, Record, Result, ScanRequest, StoreError, UpdateRequest, DEFAULT_QUERY_LIMIT,
};

use crate::config::Config;

/// Table operations with batching, retries and default limits.
///
/// # Type Parameters
///
/// * `S` - The underlying store implementation
#[derive(Debug)]
pub struct TableHelper<S>
where
    S: KeyValueStore,
{
    store: Arc<S>,
    query_limit: i32,
    batch_options: BatchWriteOptions,
}

impl<S> Clone for TableHelper<S>
where
    S: KeyValueStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            query_limit: self.query_limit,
            batch_options: self.batch_options.clone(),
        }
    }
}

impl<S> TableHelper<S>
where
    S: KeyValueStore,
{
    /// Creates a helper with the default limit and unbounded retries.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            query_limit: DEFAULT_QUERY_LIMIT,
            batch_options: BatchWriteOptions::default(),
        }
    }

    /// Creates a helper tuned by `config`.
    pub fn with_config(store: Arc<S>, config: &Config) -> Self {
        Self {
            store,
            query_limit: config.query_limit,
            batch_options: config.batch_write_options(),
        }
    }

    pub fn with_batch_options(mut self, options: BatchWriteOptions) -> Self {
        self.batch_options = options;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Batch writes
    // ========================================================================

    /// Writes `records` to `table`, retrying unprocessed records until none remain.
    pub async fn batch_write(&self, table: &str, records: Vec<Record>) -> Result<BatchWriteReport> {
        self.batch_write_with(table, records, &self.batch_options)
            .await
    }

    /// Like [`batch_write`](Self::batch_write) with explicit options.
    ///
    /// Every round splits the pending records into chunks, sends all chunks
    /// concurrently and gathers what the store left unprocessed, in chunk
    /// order. The next round waits for the current backoff delay first. Errors
    /// from any chunk request end the call immediately and are not retried.
    pub async fn batch_write_with(
        &self,
        table: &str,
        records: Vec<Record>,
        options: &BatchWriteOptions,
    ) -> Result<BatchWriteReport> {
        let table = require("table", table)?;

        let mut report = BatchWriteReport {
            records: records.len(),
            ..Default::default()
        };
        let mut schedule = options.schedule();
        let mut pending = records;

        while !pending.is_empty() {
            if options.max_rounds.is_some_and(|max| report.rounds >= max) {
                tracing::warn!(
                    table,
                    rounds = report.rounds,
                    unprocessed = pending.len(),
                    "Batch write retries exhausted"
                );
                return Err(StoreError::RetriesExhausted {
                    rounds: report.rounds,
                    unprocessed: pending.len(),
                });
            }

            if report.rounds > 0 {
                let delay = schedule.advance();
                tracing::warn!(
                    table,
                    unprocessed = pending.len(),
                    delay_ms = delay.as_millis() as u64,
                    "Retrying unprocessed records"
                );
                tokio::time::sleep(delay).await;
                report.retry_delays.push(delay);
            }

            let chunks = chunk_records(pending, options.effective_chunk_size());
            report.rounds += 1;
            report.requests += chunks.len();
            tracing::debug!(
                table,
                round = report.rounds,
                chunks = chunks.len(),
                sizes = ?chunks.iter().map(Vec::len).collect::<Vec<_>>(),
                "Sending batch write round"
            );

            let remainders =
                try_join_all(chunks.into_iter().map(|chunk| self.store.write_chunk(table, chunk)))
                    .await?;
            pending = remainders.into_iter().flatten().collect();
        }

        tracing::info!(
            table,
            records = report.records,
            rounds = report.rounds,
            requests = report.requests,
            "Batch write complete"
        );
        Ok(report)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Runs a query and returns the items of its first page.
    pub async fn query(&self, table: &str, request: QueryRequest) -> Result<Vec<Record>> {
        Ok(self.query_page(table, request, None).await?.items)
    }

    /// Runs a query and returns one page.
    ///
    /// A `token` replaces the request's own start key; without one the
    /// request's start key (if any) is used.
    pub async fn query_page(
        &self,
        table: &str,
        request: QueryRequest,
        token: Option<Record>,
    ) -> Result<Page> {
        let table = require("table", table)?;
        require("key condition expression", &request.key_condition_expression)?;

        let mut request = request.with_default_limit(self.query_limit);
        if token.is_some() {
            request = request.starting_after(token);
        }
        let page = self.store.query(table, &request).await?;
        tracing::debug!(table, items = page.items.len(), more = page.has_more(), "Query page");
        Ok(page)
    }

    /// Runs a query and follows continuation tokens until the last page.
    pub async fn query_all(&self, table: &str, request: QueryRequest) -> Result<Vec<Record>> {
        let mut items = Vec::new();
        let mut token = request.exclusive_start_key.clone();

        loop {
            let page = self.query_page(table, request.clone(), token).await?;
            items.extend(page.items);
            match page.continuation_token {
                Some(next) => token = Some(next),
                None => return Ok(items),
            }
        }
    }

    /// Runs a scan and returns the items of its first page.
    pub async fn scan(&self, table: &str, request: ScanRequest) -> Result<Vec<Record>> {
        Ok(self.scan_page(table, request, None).await?.items)
    }

    /// Runs a scan and returns one page, resuming from `token` when given.
    pub async fn scan_page(
        &self,
        table: &str,
        request: ScanRequest,
        token: Option<Record>,
    ) -> Result<Page> {
        let table = require("table", table)?;

        let mut request = request.with_default_limit(self.query_limit);
        if token.is_some() {
            request = request.starting_after(token);
        }
        let page = self.store.scan(table, &request).await?;
        tracing::debug!(table, items = page.items.len(), more = page.has_more(), "Scan page");
        Ok(page)
    }

    /// Runs a scan and follows continuation tokens until the last page.
    pub async fn scan_all(&self, table: &str, request: ScanRequest) -> Result<Vec<Record>> {
        let mut items = Vec::new();
        let mut token = request.exclusive_start_key.clone();

        loop {
            let page = self.scan_page(table, request.clone(), token).await?;
            items.extend(page.items);
            match page.continuation_token {
                Some(next) => token = Some(next),
                None => return Ok(items),
            }
        }
    }

    // ========================================================================
    // Items
    // ========================================================================

    pub async fn get_item(&self, table: &str, key: &Record) -> Result<Option<Record>> {
        let table = require("table", table)?;
        self.store.get_item(table, key).await
    }

    /// Looks up the item whose `key_name` attribute equals `key_value`.
    pub async fn get_mapping(
        &self,
        table: &str,
        key_name: &str,
        key_value: &str,
    ) -> Result<Option<Record>> {
        let table = require("table", table)?;
        let key = mapping_key(key_name, key_value)?;
        self.store.get_item(table, &key).await
    }

    /// Creates or replaces an item. Returns `true` once the store confirms it.
    pub async fn put_item(&self, table: &str, item: Record) -> Result<bool> {
        let table = require("table", table)?;
        self.store.put_item(table, item).await?;
        Ok(true)
    }

    pub async fn update_item(&self, table: &str, request: &UpdateRequest) -> Result<Option<Record>> {
        let table = require("table", table)?;
        require("update expression", &request.update_expression)?;
        self.store.update_item(table, request).await
    }

    /// Deletes an item. Returns `true` once the store confirms it.
    pub async fn delete_item(&self, table: &str, key: &Record) -> Result<bool> {
        let table = require("table", table)?;
        self.store.delete_item(table, key).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use cloudkit_core::args::MissingArgument;
    use serde_json::{json, Value};
    use tokio::sync::{Barrier, Mutex};
    use tokio::time::Instant;

    use super::*;
    use crate::storage::memory::InMemoryStore;

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| json!({ "id": format!("r{i}"), "n": i }).as_object().unwrap().clone())
            .collect()
    }

    fn helper() -> (Arc<InMemoryStore>, TableHelper<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (store.clone(), TableHelper::new(store))
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_write_single_round_when_nothing_unprocessed() {
        let (store, table) = helper();

        let report = table.batch_write("events", records(10)).await.unwrap();

        assert_eq!(report.rounds, 1);
        assert_eq!(report.requests, 1);
        assert!(report.retry_delays.is_empty());
        assert_eq!(store.records("events").await.len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_write_retries_unprocessed_chunk() {
        let (store, table) = helper();
        store.leave_unprocessed(0).await;
        store.leave_unprocessed(5).await;
        let input = records(30);

        let report = table.batch_write("events", input.clone()).await.unwrap();

        let calls = store.write_calls().await;
        let sizes: Vec<usize> = calls.iter().map(|c| c.records.len()).collect();
        assert_eq!(sizes, vec![25, 5, 5]);
        assert_eq!(calls[2].records, input[25..].to_vec());

        assert_eq!(report.rounds, 2);
        assert_eq!(report.requests, 3);
        assert_eq!(report.retry_delays, vec![Duration::from_millis(1000)]);
        assert_eq!(store.records("events").await.len(), 30);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_write_backoff_grows_every_round() {
        let (store, table) = helper();
        store.leave_unprocessed(3).await;
        store.leave_unprocessed(2).await;
        store.leave_unprocessed(1).await;
        let start = Instant::now();

        let report = table.batch_write("events", records(3)).await.unwrap();

        assert_eq!(report.rounds, 4);
        assert_eq!(
            report.retry_delays,
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(3000),
            ]
        );
        assert!(start.elapsed() >= Duration::from_millis(6000));
        assert_eq!(store.records("events").await, records(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_write_respects_round_cap() {
        let (store, table) = helper();
        store.leave_unprocessed(4).await;
        store.leave_unprocessed(2).await;

        let options = BatchWriteOptions::default().with_max_rounds(2);
        let result = table.batch_write_with("events", records(4), &options).await;

        assert_eq!(
            result,
            Err(StoreError::RetriesExhausted {
                rounds: 2,
                unprocessed: 2
            })
        );
    }

    #[tokio::test]
    async fn test_batch_write_propagates_request_errors() {
        let (store, table) = helper();
        store
            .fail_next_write(StoreError::TableNotFound("events".to_string()))
            .await;

        let result = table.batch_write("events", records(3)).await;

        assert_eq!(result, Err(StoreError::TableNotFound("events".to_string())));
        assert_eq!(store.write_calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_write_empty_input() {
        let (store, table) = helper();

        let report = table.batch_write("events", Vec::new()).await.unwrap();

        assert_eq!(report, BatchWriteReport::default());
        assert!(store.write_calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_batch_write_requires_table() {
        let (store, table) = helper();

        let result = table.batch_write(" ", records(1)).await;

        assert_eq!(result, Err(MissingArgument("table").into()));
        assert!(store.write_calls().await.is_empty());
    }

    struct BarrierStore {
        barrier: Barrier,
        chunk_sizes: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl KeyValueStore for BarrierStore {
        async fn write_chunk(&self, _table: &str, records: Vec<Record>) -> Result<Vec<Record>> {
            self.chunk_sizes.lock().await.push(records.len());
            self.barrier.wait().await;
            Ok(Vec::new())
        }

        async fn query(&self, _table: &str, _request: &QueryRequest) -> Result<Page> {
            Ok(Page::default())
        }

        async fn scan(&self, _table: &str, _request: &ScanRequest) -> Result<Page> {
            Ok(Page::default())
        }

        async fn get_item(&self, _table: &str, _key: &Record) -> Result<Option<Record>> {
            Ok(None)
        }

        async fn put_item(&self, _table: &str, _item: Record) -> Result<()> {
            Ok(())
        }

        async fn update_item(
            &self,
            _table: &str,
            _request: &UpdateRequest,
        ) -> Result<Option<Record>> {
            Ok(None)
        }

        async fn delete_item(&self, _table: &str, _key: &Record) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_batch_write_sends_chunks_concurrently() {
        // Each chunk request only completes once all three are in flight.
        let store = Arc::new(BarrierStore {
            barrier: Barrier::new(3),
            chunk_sizes: Mutex::new(Vec::new()),
        });
        let table = TableHelper::new(store.clone());

        let report = tokio::time::timeout(
            Duration::from_secs(5),
            table.batch_write("events", records(60)),
        )
        .await
        .expect("chunk requests were not issued concurrently")
        .unwrap();

        assert_eq!(report.rounds, 1);
        assert_eq!(report.requests, 3);
        assert_eq!(*store.chunk_sizes.lock().await, vec![25, 25, 10]);
    }

    #[tokio::test]
    async fn test_query_keeps_caller_start_key() {
        let (store, table) = helper();
        let items: Vec<Record> = (0..4)
            .map(|i| json!({"pk": "a", "n": i}).as_object().unwrap().clone())
            .collect();
        store.insert_records("items", items.clone()).await;
        let start = json!({"offset": 2}).as_object().unwrap().clone();

        let request = QueryRequest::new("pk = :pk")
            .with_value(":pk", "a")
            .starting_after(Some(start.clone()));
        let found = table.query("items", request).await.unwrap();

        assert_eq!(found, items[2..].to_vec());
        assert_eq!(store.queries().await[0].exclusive_start_key, Some(start));
    }

    #[tokio::test]
    async fn test_scan_keeps_caller_start_key() {
        let (store, table) = helper();
        store.insert_records("items", records(4)).await;
        let start = json!({"offset": 2}).as_object().unwrap().clone();

        let found = table
            .scan("items", ScanRequest::new().starting_after(Some(start.clone())))
            .await
            .unwrap();
        assert_eq!(found.len(), 2);

        let later = json!({"offset": 3}).as_object().unwrap().clone();
        let page = table
            .scan_page(
                "items",
                ScanRequest::new().starting_after(Some(start)),
                Some(later.clone()),
            )
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(store.scans().await[1].exclusive_start_key, Some(later));
    }

    #[tokio::test]
    async fn test_query_applies_default_limit() {
        let (store, table) = helper();

        table
            .query("items", QueryRequest::new("pk = :pk").with_value(":pk", "a"))
            .await
            .unwrap();
        table
            .query("items", QueryRequest::new("pk = :pk").with_value(":pk", "a").with_limit(7))
            .await
            .unwrap();

        let limits: Vec<Option<i32>> = store.queries().await.iter().map(|q| q.limit).collect();
        assert_eq!(limits, vec![Some(1000), Some(7)]);
    }

    #[tokio::test]
    async fn test_query_all_follows_continuation_tokens() {
        let (store, table) = helper();
        let items: Vec<Record> = (0..7)
            .map(|i| json!({"pk": "a", "n": i}).as_object().unwrap().clone())
            .collect();
        store.insert_records("items", items.clone()).await;

        let request = QueryRequest::new("pk = :pk")
            .with_value(":pk", "a")
            .with_limit(3);
        let all = table.query_all("items", request).await.unwrap();

        assert_eq!(all, items);
        assert_eq!(store.queries().await.len(), 3);
    }

    #[tokio::test]
    async fn test_scan_page_returns_token() {
        let (store, table) = helper();
        store.insert_records("items", records(4)).await;

        let page = table
            .scan_page("items", ScanRequest::new().with_limit(3), None)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 3);

        let rest = table
            .scan_page("items", ScanRequest::new().with_limit(3), page.continuation_token)
            .await
            .unwrap();
        assert_eq!(rest.items.len(), 1);
        assert!(!rest.has_more());
    }

    #[tokio::test]
    async fn test_scan_all_with_filter() {
        let (store, table) = helper();
        store.insert_records("items", records(5)).await;

        let request = ScanRequest::new()
            .with_filter("#n = :n")
            .with_name("#n", "n")
            .with_value(":n", 3);
        let found = table.scan_all("items", request).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["id"], json!("r3"));
        assert_eq!(store.scans().await[0].limit, Some(1000));
    }

    #[tokio::test]
    async fn test_get_mapping() {
        let (store, table) = helper();
        store
            .insert_records(
                "mappings",
                vec![json!({"alias": "home", "target": "/"}).as_object().unwrap().clone()],
            )
            .await;

        let found = table.get_mapping("mappings", "alias", "home").await.unwrap();
        assert_eq!(found.unwrap()["target"], json!("/"));

        let missing = table.get_mapping("mappings", "alias", "away").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_mapping_requires_key_parts() {
        let (_, table) = helper();

        let result = table.get_mapping("mappings", "alias", "").await;
        assert_eq!(result, Err(MissingArgument("key value").into()));

        let result = table.get_mapping("mappings", "", "home").await;
        assert_eq!(result, Err(MissingArgument("key name").into()));
    }

    #[tokio::test]
    async fn test_item_writes_confirm_with_true() {
        let (store, table) = helper();
        store.define_table("users", &["id"]).await;
        let key = json!({"id": "1"}).as_object().unwrap().clone();

        let item = json!({"id": "1", "name": "Ana"}).as_object().unwrap().clone();
        assert!(table.put_item("users", item).await.unwrap());

        let request = UpdateRequest::new(key.clone(), "SET #name = :name")
            .with_name("#name", "name")
            .with_value(":name", "Bea");
        let updated = table.update_item("users", &request).await.unwrap().unwrap();
        assert_eq!(updated["name"], Value::from("Bea"));

        assert!(table.delete_item("users", &key).await.unwrap());
        assert!(table.get_item("users", &key).await.unwrap().is_none());
    }
}
