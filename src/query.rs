//! Query normalization
//!
//! Turns the raw value of a search input into a trimmed query and decides
//! whether it is long enough to act on.

use crate::types::SearchMode;

/// Snapshot of a search input at the time of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub raw_text: String,
    pub trimmed_query: String,
    pub min_length: usize,
}

impl QueryState {
    pub fn new(raw_text: impl Into<String>, min_length: usize) -> Self {
        let raw_text = raw_text.into();
        let trimmed_query = raw_text.trim().to_string();
        Self {
            raw_text,
            trimmed_query,
            min_length,
        }
    }

    /// Build a state using the default threshold for `mode`
    pub fn for_mode(raw_text: impl Into<String>, mode: SearchMode) -> Self {
        Self::new(raw_text, mode.default_min_length())
    }

    /// The query to act on, or `None` when the input counts as "no query".
    ///
    /// An empty input is never a query, even with a threshold of zero.
    pub fn search_term(&self) -> Option<&str> {
        let length = self.trimmed_query.chars().count();
        if length == 0 || length < self.min_length {
            None
        } else {
            Some(&self.trimmed_query)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trimmed_query.is_empty()
    }
}

/// Trim `raw` and return it when it meets `min_length`.
pub fn normalize(raw: &str, min_length: usize) -> Option<String> {
    QueryState::new(raw, min_length)
        .search_term()
        .map(str::to_string)
}
