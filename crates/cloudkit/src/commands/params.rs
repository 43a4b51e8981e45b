use std::sync::Arc;

use anyhow::Result;

use cloudkit::params::{ParameterFetcher, SsmParameterStore};
use cloudkit::Config;

use super::print_json;

#[derive(Debug, clap::Parser)]
pub struct ParamsCommand {
    #[command(subcommand)]
    pub action: ParamsAction,

    /// Return secure values encrypted.
    #[arg(long, global = true)]
    pub no_decrypt: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum ParamsAction {
    /// Fetch parameters by name.
    Get {
        /// Parameter names.
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Fetch every parameter under a path.
    Path {
        /// Hierarchy to list, e.g. /app/prod.
        path: String,

        /// Include nested levels.
        #[arg(long)]
        recursive: bool,
    },
}

pub async fn run(cmd: ParamsCommand, config: &Config) -> Result<()> {
    let store = Arc::new(SsmParameterStore::from_env().await);
    let mut fetcher = ParameterFetcher::with_config(store, config);
    if cmd.no_decrypt {
        fetcher = fetcher.with_decryption(false);
    }

    let values = match cmd.action {
        ParamsAction::Get { names } => fetcher.get_many(&names).await?,
        ParamsAction::Path { path, recursive } => fetcher.get_by_path(&path, recursive).await?,
    };

    print_json(&values)
}
