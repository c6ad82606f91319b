//! Read-only access to the countries/states/cities dataset.
//!
//! The dataset is a SQLite database accessed through tokio-rusqlite, which
//! runs every statement on a dedicated background thread. It provides:
//!
//! - Prefix lookup of cities joined with their country and state
//! - Per-call deadlines on every query
//! - A `CityLookup` seam so the search service can run against any source

use async_trait::async_trait;

use crate::error::DatasetError;
use crate::model::City;
use crate::query::Limit;

pub mod cities;
pub mod connection;
pub mod schema;

pub use connection::Dataset;

/// Source of city records for the search service.
#[async_trait]
pub trait CityLookup: Send + Sync {
    /// Cities whose name starts with `prefix`, joined with country and state,
    /// capped at `limit` rows.
    async fn find_cities_by_prefix(&self, prefix: &str, limit: Limit) -> Result<Vec<City>, DatasetError>;

    /// Cheap round trip proving the source is reachable.
    async fn ping(&self) -> Result<(), DatasetError>;
}

#[async_trait]
impl CityLookup for Dataset {
    async fn find_cities_by_prefix(&self, prefix: &str, limit: Limit) -> Result<Vec<City>, DatasetError> {
        Dataset::find_cities_by_prefix(self, prefix, limit).await
    }

    async fn ping(&self) -> Result<(), DatasetError> {
        Dataset::ping(self).await
    }
}
