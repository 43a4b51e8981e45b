//! SNS implementation of [`NotificationPublisher`](cloudkit_core::notify::NotificationPublisher)
//! using `aws-sdk-sns`.

mod error;
mod publisher;

pub use publisher::{to_sns_attributes, SnsPublisher};
