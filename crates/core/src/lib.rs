//! Core types and the city lookup path for cityfind.
//!
//! This crate provides:
//! - Read-only dataset access over SQLite
//! - The in-memory search cache with coarse reset
//! - The search service tying validation, cache and dataset together
//! - Configuration and error types

pub mod cache;
pub mod config;
pub mod dataset;
pub mod error;
pub mod model;
pub mod query;
pub mod search;

pub use cache::{CacheKey, QueryCache};
pub use config::{AppConfig, ConfigError};
pub use dataset::{CityLookup, Dataset};
pub use error::{DatasetError, SearchError};
pub use model::{City, Country, State};
pub use query::Limit;
pub use search::{SearchParams, SearchService};
