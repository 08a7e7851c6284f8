use async_trait::async_trait;

use super::model::*;
use crate::tmdb::MovieSummary;

/// Persistence for search popularity. Ranking is the backend's job.
#[async_trait]
pub trait SearchCountStore: Send + Sync {
    /// Bump the counter for `search_term`, creating the record from `movie`
    /// the first time the term is seen.
    async fn increment(&self, search_term: &str, movie: &MovieSummary) -> StoreResult<()>;
    /// Records ordered by count, highest first.
    async fn top(&self, limit: usize) -> StoreResult<Vec<TrendingEntry>>;
}
