//! Command line access to the cloudkit helpers.
//!
//! Every command prints its result as JSON on stdout. AWS credentials and
//! region come from the SDK default chain.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloudkit::Config;

mod commands;

/// cloudkit - DynamoDB, SNS and SSM helpers for serverless functions
#[derive(Debug, Parser)]
#[command(name = "cloudkit")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: commands::Global,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Write records to a table, retrying unprocessed ones
    BatchWrite(commands::table::BatchWriteCommand),

    /// Query a table or index
    Query(commands::table::QueryCommand),

    /// Scan a table or index
    Scan(commands::table::ScanCommand),

    /// Publish a message to a topic
    Publish(commands::publish::PublishCommand),

    /// Read configuration parameters
    Params(commands::params::ParamsCommand),

    /// Format a function HTTP response
    HttpResponse(commands::http::HttpResponseCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose {
        "cloudkit=debug"
    } else {
        "cloudkit=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    tracing::debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::BatchWrite(cmd) => commands::table::batch_write(cmd, &config).await,
        Commands::Query(cmd) => commands::table::query(cmd, &config).await,
        Commands::Scan(cmd) => commands::table::scan(cmd, &config).await,
        Commands::Publish(cmd) => commands::publish::run(cmd).await,
        Commands::Params(cmd) => commands::params::run(cmd, &config).await,
        Commands::HttpResponse(cmd) => commands::http::run(cmd),
    }
}
