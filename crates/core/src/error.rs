//! Error types for dataset access and the search path.
//!
//! `SearchError::code` yields the short string sent back to HTTP callers.

use tokio_rusqlite::rusqlite;

/// Failures talking to the geographic dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Query execution or connection failure.
    #[error("DATASET_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// The dataset file could not be opened.
    #[error("DATASET_ERROR: failed to open {0}")]
    Open(String),

    /// A lookup ran past its deadline.
    #[error("DATASET_TIMEOUT: query exceeded {0}ms")]
    Timeout(u64),

    /// Schema script failed to apply.
    #[error("DATASET_ERROR: schema failed: {0}")]
    Schema(String),
}

impl From<tokio_rusqlite::Error<DatasetError>> for DatasetError {
    fn from(err: tokio_rusqlite::Error<DatasetError>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => DatasetError::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => DatasetError::Database(tokio_rusqlite::Error::Close(c)),
            _ => DatasetError::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for DatasetError {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        DatasetError::Database(err)
    }
}

impl From<rusqlite::Error> for DatasetError {
    fn from(err: rusqlite::Error) -> Self {
        DatasetError::Database(tokio_rusqlite::Error::Error(err))
    }
}

/// Failures of a single city search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Query missing, shorter than 3 or longer than 50 characters.
    #[error("query must be between 3 and 50 characters")]
    EmptyOrInvalidLength,

    /// Query contains something other than letters, spaces and hyphens.
    #[error("query may only contain letters, spaces and hyphens")]
    InvalidCharacters,

    /// Limit is not a positive integer within the configured maximum.
    #[error("invalid limit: {0}")]
    InvalidLimit(String),

    /// Valid query, zero dataset matches.
    #[error("no cities found")]
    NotFound,

    /// Dataset lookup failed or timed out; carries the driver message.
    #[error("dataset unavailable: {0}")]
    DatasetUnavailable(String),

    /// Response encoding failed at the boundary.
    #[error("serialization failed: {0}")]
    SerializationFailure(String),
}

impl SearchError {
    /// Short error code exposed to callers.
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::EmptyOrInvalidLength => "query_is_empty",
            SearchError::InvalidCharacters => "invalid_query_parameter",
            SearchError::InvalidLimit(_) => "invalid_limit_parameter",
            SearchError::NotFound => "cities_not_found",
            SearchError::DatasetUnavailable(_) => "dataset_unavailable",
            SearchError::SerializationFailure(_) => "serialization_failed",
        }
    }
}

impl From<DatasetError> for SearchError {
    fn from(err: DatasetError) -> Self {
        SearchError::DatasetUnavailable(err.to_string())
    }
}
