use std::sync::Arc;

use anyhow::Result;

use cloudkit::notify::{Notifier, SnsPublisher};
use cloudkit_core::notify::PublishOptions;
use cloudkit_core::parse::parse_lenient;

use super::{print_json, read_record};

#[derive(Debug, clap::Parser)]
pub struct PublishCommand {
    /// Topic ARN.
    #[arg(long, env = "CLOUDKIT_TOPIC")]
    pub topic: String,

    /// Message payload. JSON is sent as parsed, anything else as a string.
    #[arg(long)]
    pub message: String,

    /// Attributes as a JSON object of strings, numbers and arrays.
    #[arg(long, default_value = "{}")]
    pub attributes: String,

    #[arg(long)]
    pub subject: Option<String>,

    /// Message group for FIFO topics.
    #[arg(long)]
    pub group_id: Option<String>,

    /// Deduplication id for FIFO topics.
    #[arg(long)]
    pub deduplication_id: Option<String>,
}

pub async fn run(cmd: PublishCommand) -> Result<()> {
    let attributes = read_record(&cmd.attributes).await?;
    let payload = parse_lenient(&cmd.message);
    let options = PublishOptions {
        subject: cmd.subject,
        message_group_id: cmd.group_id,
        message_deduplication_id: cmd.deduplication_id,
    };

    let notifier = Notifier::new(Arc::new(SnsPublisher::from_env().await));
    let receipt = notifier
        .publish(&cmd.topic, &payload, &attributes, options)
        .await?;

    print_json(&receipt)
}
