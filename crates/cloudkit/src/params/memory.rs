//! In-memory parameter store implementation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use cloudkit_core::params::{
    Parameter, ParameterBatch, ParameterPage, ParameterStore, Result, GET_PARAMETERS_LIMIT,
};

/// In-memory parameter store for testing.
///
/// Path listings are paged [`GET_PARAMETERS_LIMIT`] parameters at a time so
/// callers exercise continuation tokens.
#[derive(Debug, Clone, Default)]
pub struct MemoryParameterStore {
    parameters: Arc<RwLock<BTreeMap<String, String>>>,
    requests: Arc<AtomicUsize>,
}

impl MemoryParameterStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters
            .write()
            .await
            .insert(name.into(), value.into());
    }

    /// Number of requests served so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

fn under_path(path: &str, name: &str, recursive: bool) -> bool {
    let prefix = format!("{}/", path.trim_end_matches('/'));
    match name.strip_prefix(&prefix) {
        Some(rest) => recursive || !rest.contains('/'),
        None => false,
    }
}

#[async_trait]
impl ParameterStore for MemoryParameterStore {
    async fn get_parameters(&self, names: &[String], _decrypt: bool) -> Result<ParameterBatch> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let parameters = self.parameters.read().await;

        let mut batch = ParameterBatch::default();
        for name in names {
            match parameters.get(name) {
                Some(value) => batch.parameters.push(Parameter {
                    name: name.clone(),
                    value: value.clone(),
                }),
                None => batch.invalid.push(name.clone()),
            }
        }
        Ok(batch)
    }

    async fn get_parameters_by_path(
        &self,
        path: &str,
        recursive: bool,
        _decrypt: bool,
        next_token: Option<String>,
    ) -> Result<ParameterPage> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let offset: usize = next_token.and_then(|t| t.parse().ok()).unwrap_or(0);

        let matching: Vec<Parameter> = self
            .parameters
            .read()
            .await
            .iter()
            .filter(|(name, _)| under_path(path, name, recursive))
            .map(|(name, value)| Parameter {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();

        let end = (offset + GET_PARAMETERS_LIMIT).min(matching.len());
        let next_token = (end < matching.len()).then(|| end.to_string());

        Ok(ParameterPage {
            parameters: matching.get(offset..end).unwrap_or_default().to_vec(),
            next_token,
        })
    }
}
