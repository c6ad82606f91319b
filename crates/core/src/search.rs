//! City search service.
//!
//! The single entry point of the lookup path: validate, consult the cache,
//! fall back to the dataset on a miss, and populate the cache with
//! non-empty results.

use std::sync::Arc;

use serde::Deserialize;

use crate::cache::{CacheKey, QueryCache};
use crate::config::AppConfig;
use crate::dataset::CityLookup;
use crate::error::SearchError;
use crate::model::City;
use crate::query::{DEFAULT_LIMIT, Limit, validate_query};

/// Raw search parameters as they arrive on a request.
///
/// `q` and `query` are equivalent, as are `l` and `limit`; the short form is
/// consulted first and empty values count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub l: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

impl SearchParams {
    /// The query text, or `""` when neither name is present.
    pub fn query_text(&self) -> &str {
        first_non_empty(&self.q, &self.query).unwrap_or("")
    }

    /// The limit text, or `"10"` when neither name is present.
    pub fn limit_text(&self) -> &str {
        first_non_empty(&self.l, &self.limit).unwrap_or(DEFAULT_LIMIT)
    }
}

fn first_non_empty<'a>(primary: &'a Option<String>, alias: &'a Option<String>) -> Option<&'a str> {
    [primary, alias]
        .into_iter()
        .filter_map(|value| value.as_deref())
        .find(|value| !value.is_empty())
}

/// Validates, caches and resolves city searches.
pub struct SearchService {
    lookup: Arc<dyn CityLookup>,
    cache: QueryCache,
    cache_size: usize,
    max_limit: u32,
}

impl SearchService {
    /// Create a service over `lookup`.
    ///
    /// The cache is cleared whenever it holds more than `cache_size` entries;
    /// limits above `max_limit` are rejected.
    pub fn new(lookup: Arc<dyn CityLookup>, cache_size: usize, max_limit: u32) -> Self {
        Self { lookup, cache: QueryCache::new(), cache_size, max_limit }
    }

    pub fn from_config(lookup: Arc<dyn CityLookup>, config: &AppConfig) -> Self {
        Self::new(lookup, config.cache_size, config.max_limit)
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Search using request parameters.
    pub async fn search_params(&self, params: &SearchParams) -> Result<Arc<[City]>, SearchError> {
        self.search(params.query_text(), params.limit_text()).await
    }

    /// Search for cities whose name starts with `raw_query`.
    ///
    /// Never returns an empty sequence: zero matches is `SearchError::NotFound`,
    /// and such results are not cached.
    ///
    /// # Errors
    ///
    /// - `EmptyOrInvalidLength` / `InvalidCharacters` for a bad query
    /// - `InvalidLimit` for a limit outside `1..=max_limit`
    /// - `NotFound` when the dataset has no match
    /// - `DatasetUnavailable` when the lookup fails or times out
    pub async fn search(&self, raw_query: &str, raw_limit: &str) -> Result<Arc<[City]>, SearchError> {
        let query = validate_query(raw_query)?;
        let limit = Limit::parse(raw_limit, self.max_limit)?;

        self.cache.reset_if_over(self.cache_size).await;

        let key = CacheKey::new(query, limit);
        if let Some(hit) = self.cache.get(&key).await
            && !hit.is_empty()
        {
            tracing::debug!(query = %key.query, limit = %limit, "search cache hit");
            return Ok(hit);
        }

        let cities = self
            .lookup
            .find_cities_by_prefix(&key.query, limit)
            .await
            .inspect_err(|e| tracing::warn!(query = %key.query, error = %e, "city lookup failed"))?;

        if cities.is_empty() {
            tracing::debug!(query = %key.query, "no cities found");
            return Err(SearchError::NotFound);
        }

        tracing::debug!(query = %key.query, count = cities.len(), "search cache populated");
        let cities: Arc<[City]> = cities.into();
        self.cache.put(key, Arc::clone(&cities)).await;

        Ok(cities)
    }

    /// Check that the underlying dataset answers.
    pub async fn ready(&self) -> Result<(), SearchError> {
        self.lookup.ping().await.map_err(SearchError::from)
    }
}
