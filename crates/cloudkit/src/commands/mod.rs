//! Subcommand implementations and shared input/output helpers.

pub mod http;
pub mod params;
pub mod publish;
pub mod table;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tokio::io::AsyncReadExt;

use cloudkit_core::storage::Record;

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Log at debug level unless RUST_LOG says otherwise
    #[clap(long, global = true)]
    pub verbose: bool,
}

/// Reads a JSON argument: inline text, `@path` for a file or `-` for stdin.
pub async fn read_json(arg: &str) -> Result<Value> {
    let text = if arg == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read stdin")?;
        text
    } else if let Some(path) = arg.strip_prefix('@') {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {path}"))?
    } else {
        arg.to_string()
    };

    serde_json::from_str(&text).context("Input is not valid JSON")
}

/// Like [`read_json`], for arguments that must be a JSON object.
pub async fn read_record(arg: &str) -> Result<Record> {
    match read_json(arg).await? {
        Value::Object(record) => Ok(record),
        other => anyhow::bail!("Expected a JSON object, got {other}"),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
