mod batching;
mod error;
mod http_mapping;
mod traits;
mod types;

pub use batching::{
    chunk_records, BackoffSchedule, BatchWriteOptions, BatchWriteReport, BACKOFF_STEP,
    BATCH_WRITE_LIMIT, INITIAL_BACKOFF,
};
pub use error::{Result, StoreError};
pub use http_mapping::store_error_to_status_code;
pub use traits::KeyValueStore;
pub use types::{
    mapping_key, Page, QueryRequest, Record, ScanRequest, UpdateRequest, DEFAULT_QUERY_LIMIT,
};
