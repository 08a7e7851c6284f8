use serde::{Deserialize, Serialize};

use crate::orchestrator::SearchState;
use crate::store::TrendingEntry;
use crate::tmdb::MovieSummary;

#[derive(Debug, Deserialize)]
pub struct SearchInput {
    #[serde(default)]
    pub term: String,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub search: SearchState,
    pub movies: Vec<MovieSummary>,
    pub trending: Vec<TrendingEntry>,
    pub no_matches: bool,
}
