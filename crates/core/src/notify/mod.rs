mod attributes;
mod envelope;
mod error;
mod message;
mod outcome;
mod traits;

pub use attributes::{
    decode_attribute, decode_attributes, encode_attribute, parse_attributes, AttributeDataType,
    InboundAttribute, MessageAttribute, MessageAttributes,
};
pub use envelope::{
    parse_envelope, NotificationEnvelope, NotificationMessage, NotificationRecord,
    ParsedNotification,
};
pub use error::{NotifyError, Result};
pub use message::{prepare_message, DeliveryReceipt, OutboundMessage, PublishOptions};
pub use outcome::{outcome_message, HandlerOutcome, STATUS_ATTRIBUTE};
pub use traits::NotificationPublisher;
