//! DynamoDB implementation of [`KeyValueStore`](cloudkit_core::storage::KeyValueStore)
//! using `aws-sdk-dynamodb`.

mod conversions;
mod error;
mod store;

pub use conversions::{attribute_to_value, item_to_record, record_to_item, value_to_attribute};
pub use store::DynamoDbStore;
