use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;

use cloudkit::storage::{DynamoDbStore, TableHelper};
use cloudkit::Config;
use cloudkit_core::storage::{QueryRequest, Record, ScanRequest};

use super::{print_json, read_json, read_record};

#[derive(Debug, clap::Parser)]
pub struct BatchWriteCommand {
    /// Destination table.
    #[arg(long, env = "CLOUDKIT_TABLE")]
    pub table: String,

    /// JSON array of records: inline, `@file` or `-` for stdin.
    #[arg(long, default_value = "-")]
    pub records: String,

    /// Give up after this many rounds instead of retrying forever.
    #[arg(long)]
    pub max_rounds: Option<usize>,
}

#[derive(Debug, clap::Parser)]
#[command(long_about = "Query a table or index.

The request is a JSON object using the store's query fields in camelCase,
for example:

  {\"keyConditionExpression\": \"pk = :pk\",
   \"expressionAttributeValues\": {\":pk\": \"user#1\"}}

A limit of CLOUDKIT_QUERY_LIMIT (default 1000) applies when none is given.")]
pub struct QueryCommand {
    /// Table to query.
    #[arg(long, env = "CLOUDKIT_TABLE")]
    pub table: String,

    /// Query request: inline JSON, `@file` or `-` for stdin.
    #[arg(long)]
    pub request: String,

    /// Continuation token from a previous page.
    #[arg(long)]
    pub token: Option<String>,

    /// Follow continuation tokens and print every item.
    #[arg(long, conflicts_with = "token")]
    pub all: bool,
}

#[derive(Debug, clap::Parser)]
pub struct ScanCommand {
    /// Table to scan.
    #[arg(long, env = "CLOUDKIT_TABLE")]
    pub table: String,

    /// Scan request: inline JSON, `@file` or `-` for stdin.
    #[arg(long, default_value = "{}")]
    pub request: String,

    /// Continuation token from a previous page.
    #[arg(long)]
    pub token: Option<String>,

    /// Follow continuation tokens and print every item.
    #[arg(long, conflicts_with = "token")]
    pub all: bool,
}

async fn helper(config: &Config) -> TableHelper<DynamoDbStore> {
    TableHelper::with_config(Arc::new(DynamoDbStore::from_env().await), config)
}

async fn token(arg: Option<&str>) -> Result<Option<Record>> {
    match arg {
        Some(arg) => Ok(Some(read_record(arg).await?)),
        None => Ok(None),
    }
}

pub async fn batch_write(cmd: BatchWriteCommand, config: &Config) -> Result<()> {
    let records: Vec<Record> = serde_json::from_value(read_json(&cmd.records).await?)
        .context("Records must be a JSON array of objects")?;

    let mut options = config.batch_write_options();
    if let Some(max_rounds) = cmd.max_rounds {
        options = options.with_max_rounds(max_rounds);
    }

    let report = helper(config)
        .await
        .batch_write_with(&cmd.table, records, &options)
        .await?;

    print_json(&json!({
        "records": report.records,
        "rounds": report.rounds,
        "requests": report.requests,
        "retryDelaysMs": report
            .retry_delays
            .iter()
            .map(|d| d.as_millis() as u64)
            .collect::<Vec<_>>(),
    }))
}

pub async fn query(cmd: QueryCommand, config: &Config) -> Result<()> {
    let request: QueryRequest = serde_json::from_value(read_json(&cmd.request).await?)
        .context("Invalid query request")?;
    let table = helper(config).await;

    if cmd.all {
        let items = table.query_all(&cmd.table, request).await?;
        return print_json(&items);
    }

    let page = table
        .query_page(&cmd.table, request, token(cmd.token.as_deref()).await?)
        .await?;
    print_json(&page)
}

pub async fn scan(cmd: ScanCommand, config: &Config) -> Result<()> {
    let request: ScanRequest = serde_json::from_value(read_json(&cmd.request).await?)
        .context("Invalid scan request")?;
    let table = helper(config).await;

    if cmd.all {
        let items = table.scan_all(&cmd.table, request).await?;
        return print_json(&items);
    }

    let page = table
        .scan_page(&cmd.table, request, token(cmd.token.as_deref()).await?)
        .await?;
    print_json(&page)
}
