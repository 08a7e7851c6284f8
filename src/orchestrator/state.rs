use serde::Serialize;

use crate::store::TrendingEntry;
use crate::tmdb::MovieSummary;

/// Shown for transport failures, bad status codes and undecodable bodies.
pub const GENERIC_FETCH_ERROR: &str = "Failed to fetch movies please try again later.";

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SearchState {
    pub raw_term: String,
    pub debounced_term: String,
    pub is_loading: bool,
    pub error_message: String,
}

/// Everything the page renders from. Cloned out of the orchestrator on every
/// change, so readers never hold its lock.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageSnapshot {
    pub search: SearchState,
    pub movies: Vec<MovieSummary>,
    pub trending: Vec<TrendingEntry>,
    /// Set once a fetch has succeeded; an empty `movies` then means "no matches".
    pub results_loaded: bool,
}

impl PageSnapshot {
    pub fn has_error(&self) -> bool {
        !self.search.error_message.is_empty()
    }

    pub fn no_matches(&self) -> bool {
        self.results_loaded && self.movies.is_empty() && !self.has_error()
    }
}
