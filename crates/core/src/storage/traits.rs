use async_trait::async_trait;

use super::{Page, QueryRequest, Record, Result, ScanRequest, UpdateRequest};

/// A managed key-value/document store.
///
/// Implementations speak the store's native encoding; callers only ever see
/// plain [`Record`]s.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Writes one chunk of at most `BATCH_WRITE_LIMIT` records.
    ///
    /// Returns the records the store declined to persist (possibly empty).
    /// Request-level failures are returned as errors instead.
    async fn write_chunk(&self, table: &str, records: Vec<Record>) -> Result<Vec<Record>>;

    /// Runs a key-condition query and returns one page.
    async fn query(&self, table: &str, request: &QueryRequest) -> Result<Page>;

    /// Runs a scan and returns one page.
    async fn scan(&self, table: &str, request: &ScanRequest) -> Result<Page>;

    /// Gets a single item by its full key.
    async fn get_item(&self, table: &str, key: &Record) -> Result<Option<Record>>;

    /// Creates or replaces an item.
    async fn put_item(&self, table: &str, item: Record) -> Result<()>;

    /// Applies an update expression and returns the item's new attributes.
    async fn update_item(&self, table: &str, request: &UpdateRequest) -> Result<Option<Record>>;

    /// Deletes an item by its full key.
    async fn delete_item(&self, table: &str, key: &Record) -> Result<()>;
}
