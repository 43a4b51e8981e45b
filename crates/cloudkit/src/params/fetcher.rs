//! Parameter helper built on any [`ParameterStore`].

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::try_join_all;

use cloudkit_core::args::require;
use cloudkit_core::params::{chunk_names, relative_name, ParameterError, ParameterStore, Result};

use crate::config::Config;

/// Fetches configuration values, decrypting secure ones by default.
///
/// # Type Parameters
///
/// * `S` - The underlying parameter store implementation
#[derive(Debug)]
pub struct ParameterFetcher<S>
where
    S: ParameterStore,
{
    store: Arc<S>,
    decrypt: bool,
}

impl<S> Clone for ParameterFetcher<S>
where
    S: ParameterStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            decrypt: self.decrypt,
        }
    }
}

impl<S> ParameterFetcher<S>
where
    S: ParameterStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            decrypt: true,
        }
    }

    pub fn with_config(store: Arc<S>, config: &Config) -> Self {
        Self {
            store,
            decrypt: config.parameter_decrypt,
        }
    }

    pub fn with_decryption(mut self, decrypt: bool) -> Self {
        self.decrypt = decrypt;
        self
    }

    /// Fetches a single value.
    pub async fn get(&self, name: &str) -> Result<String> {
        let name = require("parameter name", name)?;
        let mut values = self.get_many(&[name.to_string()]).await?;
        values
            .remove(name)
            .ok_or_else(|| ParameterError::NotFound(vec![name.to_string()]))
    }

    /// Fetches several values, keyed by name.
    ///
    /// Requests are split by the store's per-request limit and sent
    /// concurrently. Fails with [`ParameterError::NotFound`] naming every
    /// missing parameter if any is missing.
    pub async fn get_many(&self, names: &[String]) -> Result<BTreeMap<String, String>> {
        for name in names {
            require("parameter name", name)?;
        }

        let chunks = chunk_names(names);
        tracing::debug!(names = names.len(), requests = chunks.len(), "Fetching parameters");

        let batches = try_join_all(
            chunks
                .iter()
                .map(|chunk| self.store.get_parameters(chunk, self.decrypt)),
        )
        .await?;

        let mut values = BTreeMap::new();
        let mut missing = Vec::new();
        for batch in batches {
            missing.extend(batch.invalid);
            values.extend(batch.parameters.into_iter().map(|p| (p.name, p.value)));
        }

        if !missing.is_empty() {
            tracing::warn!(missing = ?missing, "Parameters not found");
            return Err(ParameterError::NotFound(missing));
        }
        Ok(values)
    }

    /// Fetches every value under `path`, keyed by name relative to `path`.
    pub async fn get_by_path(&self, path: &str, recursive: bool) -> Result<BTreeMap<String, String>> {
        let path = require("parameter path", path)?;

        let mut values = BTreeMap::new();
        let mut next_token = None;
        loop {
            let page = self
                .store
                .get_parameters_by_path(path, recursive, self.decrypt, next_token)
                .await?;
            for parameter in page.parameters {
                values.insert(
                    relative_name(path, &parameter.name).to_string(),
                    parameter.value,
                );
            }
            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(path, parameters = values.len(), "Fetched parameter hierarchy");
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::memory::MemoryParameterStore;
    use cloudkit_core::args::MissingArgument;

    async fn fetcher() -> (Arc<MemoryParameterStore>, ParameterFetcher<MemoryParameterStore>) {
        let store = Arc::new(MemoryParameterStore::new());
        store.insert("/app/prod/db/url", "postgres://db").await;
        store.insert("/app/prod/db/password", "s3cret").await;
        store.insert("/app/prod/token", "abc").await;
        store.insert("/app/dev/token", "dev").await;
        (store.clone(), ParameterFetcher::new(store))
    }

    #[tokio::test]
    async fn test_get_single_value() {
        let (_, fetcher) = fetcher().await;
        assert_eq!(fetcher.get("/app/prod/token").await.unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_get_missing_value() {
        let (_, fetcher) = fetcher().await;
        let result = fetcher.get("/app/prod/missing").await;
        assert_eq!(
            result,
            Err(ParameterError::NotFound(vec!["/app/prod/missing".to_string()]))
        );
    }

    #[tokio::test]
    async fn test_get_requires_name() {
        let (store, fetcher) = fetcher().await;
        let result = fetcher.get("  ").await;
        assert_eq!(result, Err(MissingArgument("parameter name").into()));
        assert_eq!(store.requests(), 0);
    }

    #[tokio::test]
    async fn test_get_many_batches_requests() {
        let (store, fetcher) = fetcher().await;
        let mut names = Vec::new();
        for i in 0..12 {
            let name = format!("/bulk/{i}");
            store.insert(name.clone(), i.to_string()).await;
            names.push(name);
        }

        let values = fetcher.get_many(&names).await.unwrap();

        assert_eq!(values.len(), 12);
        assert_eq!(values["/bulk/11"], "11");
        assert_eq!(store.requests(), 2);
    }

    #[tokio::test]
    async fn test_get_many_lists_every_missing_name() {
        let (_, fetcher) = fetcher().await;
        let names = vec![
            "/app/prod/token".to_string(),
            "/nope/a".to_string(),
            "/nope/b".to_string(),
        ];

        let result = fetcher.get_many(&names).await;

        assert_eq!(
            result,
            Err(ParameterError::NotFound(vec!["/nope/a".to_string(), "/nope/b".to_string()]))
        );
    }

    #[tokio::test]
    async fn test_get_by_path_relative_keys() {
        let (_, fetcher) = fetcher().await;

        let direct = fetcher.get_by_path("/app/prod", false).await.unwrap();
        assert_eq!(direct.len(), 1);
        assert_eq!(direct["token"], "abc");

        let all = fetcher.get_by_path("/app/prod/", true).await.unwrap();
        let keys: Vec<&str> = all.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["db/password", "db/url", "token"]);
    }

    #[tokio::test]
    async fn test_get_by_path_follows_pages() {
        let (store, fetcher) = fetcher().await;
        for i in 0..25 {
            store.insert(format!("/many/{i:02}"), i.to_string()).await;
        }

        let values = fetcher.get_by_path("/many", false).await.unwrap();

        assert_eq!(values.len(), 25);
        assert_eq!(values["07"], "7");
        assert_eq!(store.requests(), 3);
    }
}
