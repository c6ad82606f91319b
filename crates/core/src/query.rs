//! Input validation for city searches.
//!
//! Turns raw request text into a validated query string and row limit
//! before anything touches the cache or the dataset.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::SearchError;

/// Minimum query length, in characters, after trimming.
pub const MIN_QUERY_CHARS: usize = 3;

/// Maximum query length, in characters, after trimming.
pub const MAX_QUERY_CHARS: usize = 50;

/// Limit applied when the caller supplies none.
pub const DEFAULT_LIMIT: &str = "10";

/// Letters from any script, whitespace and hyphens.
static QUERY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\s\-]+$").expect("query pattern is a valid regex"));

/// Trim and validate a raw search query.
///
/// Length is checked before the character class, so `"1"` reports a length
/// error rather than an invalid character.
///
/// # Errors
///
/// - `SearchError::EmptyOrInvalidLength` if the trimmed query has fewer than
///   3 or more than 50 characters
/// - `SearchError::InvalidCharacters` if it contains anything other than
///   letters, whitespace and hyphens
pub fn validate_query(raw: &str) -> Result<String, SearchError> {
    let query = raw.trim();
    let len = query.chars().count();

    if !(MIN_QUERY_CHARS..=MAX_QUERY_CHARS).contains(&len) {
        return Err(SearchError::EmptyOrInvalidLength);
    }

    if !QUERY_PATTERN.is_match(query) {
        return Err(SearchError::InvalidCharacters);
    }

    Ok(query.to_string())
}

/// A validated, positive row cap for dataset lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Limit(u32);

impl Limit {
    /// Parse caller-supplied limit text.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidLimit` if the text is not an integer in
    /// `1..=max`.
    pub fn parse(raw: &str, max: u32) -> Result<Self, SearchError> {
        let value: u32 = raw
            .trim()
            .parse()
            .map_err(|_| SearchError::InvalidLimit(format!("'{raw}' is not a positive integer")))?;

        if value == 0 {
            return Err(SearchError::InvalidLimit("must be greater than 0".into()));
        }
        if value > max {
            return Err(SearchError::InvalidLimit(format!("must not exceed {max}")));
        }

        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
