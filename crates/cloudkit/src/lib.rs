//! cloudkit - helpers for serverless functions backed by DynamoDB, SNS and SSM.
//!
//! Each service gets a helper facade generic over the matching
//! `cloudkit_core` trait:
//!
//! - [`TableHelper`] over a [`KeyValueStore`](cloudkit_core::storage::KeyValueStore)
//! - [`Notifier`] over a [`NotificationPublisher`](cloudkit_core::notify::NotificationPublisher)
//! - [`ParameterFetcher`] over a [`ParameterStore`](cloudkit_core::params::ParameterStore)
//!
//! The AWS implementations sit behind the `dynamodb`, `sns` and `ssm`
//! features. In-memory implementations are always available for tests.

pub mod config;
pub mod notify;
pub mod params;
pub mod storage;

pub use config::Config;
pub use notify::{wrap_handler, Notifier};
pub use params::ParameterFetcher;
pub use storage::TableHelper;

pub use cloudkit_core::http::{format_http_response, status_description, HttpResponse};
pub use cloudkit_core::parse::parse_lenient;
