//! HTTP adapter for the cityfind lookup service.
//!
//! Translates query parameters into `SearchService` calls and renders the
//! results or errors as JSON.

pub mod error;
pub mod handler;

pub use error::ApiError;
pub use handler::{AppState, router};
