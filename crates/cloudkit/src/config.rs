use std::{env, time::Duration};

use cloudkit_core::storage::{BatchWriteOptions, DEFAULT_QUERY_LIMIT};

/// Helper configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Limit applied to queries and scans that set none (default: 1000)
    pub query_limit: i32,
    /// Delay before the first batch write retry, in milliseconds (default: 1000)
    pub batch_backoff_ms: u64,
    /// Amount added to the retry delay every round, in milliseconds (default: 1000)
    pub batch_backoff_step_ms: u64,
    /// Maximum batch write rounds (default: unbounded)
    pub batch_max_rounds: Option<usize>,
    /// Whether secure parameters are decrypted (default: true)
    pub parameter_decrypt: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CLOUDKIT_QUERY_LIMIT` - Default query/scan limit (default: 1000)
    /// - `CLOUDKIT_BATCH_BACKOFF_MS` - Initial retry delay (default: 1000)
    /// - `CLOUDKIT_BATCH_BACKOFF_STEP_MS` - Retry delay increment (default: 1000)
    /// - `CLOUDKIT_BATCH_MAX_ROUNDS` - Batch write round cap (default: none)
    /// - `CLOUDKIT_PARAMETER_DECRYPT` - Decrypt secure parameters (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = BatchWriteOptions::default();

        Self {
            query_limit: lookup("CLOUDKIT_QUERY_LIMIT")
                .and_then(|v| v.parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_QUERY_LIMIT),
            batch_backoff_ms: lookup("CLOUDKIT_BATCH_BACKOFF_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.initial_backoff.as_millis() as u64),
            batch_backoff_step_ms: lookup("CLOUDKIT_BATCH_BACKOFF_STEP_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.backoff_step.as_millis() as u64),
            batch_max_rounds: lookup("CLOUDKIT_BATCH_MAX_ROUNDS")
                .and_then(|v| v.parse().ok())
                .filter(|rounds| *rounds > 0),
            parameter_decrypt: lookup("CLOUDKIT_PARAMETER_DECRYPT")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }

    /// Batch write options derived from this configuration.
    pub fn batch_write_options(&self) -> BatchWriteOptions {
        BatchWriteOptions {
            initial_backoff: Duration::from_millis(self.batch_backoff_ms),
            backoff_step: Duration::from_millis(self.batch_backoff_step_ms),
            max_rounds: self.batch_max_rounds,
            ..Default::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
