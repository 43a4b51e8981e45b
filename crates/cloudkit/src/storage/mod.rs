//! Key-value store backends and the table helper.

#[cfg(feature = "dynamodb")]
pub mod dynamodb;
pub mod memory;
mod table;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;
pub use memory::{InMemoryStore, WriteCall};
pub use table::TableHelper;
