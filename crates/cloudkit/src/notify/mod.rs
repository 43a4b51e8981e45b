//! Notification publishing and the reporting handler wrapper.

mod handler;
pub mod memory;
mod notifier;
#[cfg(feature = "sns")]
pub mod sns;

pub use handler::wrap_handler;
pub use memory::MemoryPublisher;
pub use notifier::Notifier;
#[cfg(feature = "sns")]
pub use sns::SnsPublisher;
