//! In-memory stand-ins for the movie API and the search-count backend.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

use crate::store::{SearchCountStore, StoreError, StoreResult, TrendingEntry};
use crate::tmdb::{FetchError, MoviePage, MovieSource, MovieSummary};

#[derive(Clone)]
pub enum Reply {
    Page(MoviePage),
    Status(u16),
    Decode,
}

/// Which endpoint a `FakeSource` was asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Search(String),
    Discover,
}

impl Call {
    pub fn search(query: &str) -> Self {
        Call::Search(query.to_string())
    }
}

/// Answers every query with one movie named after it unless a reply was
/// registered. Replies and delays for discover are keyed by the empty query.
#[derive(Default)]
pub struct FakeSource {
    replies: HashMap<String, Reply>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<Call>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, query: &str, reply: Reply) -> Self {
        self.replies.insert(query.to_string(), reply);
        self
    }

    pub fn delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    async fn answer(&self, call: Call) -> Result<MoviePage, FetchError> {
        let query = match &call {
            Call::Search(q) => q.clone(),
            Call::Discover => String::new(),
        };
        self.calls.lock().push(call);
        if let Some(delay) = self.delays.get(&query) {
            tokio::time::sleep(*delay).await;
        }
        match self.replies.get(&query).cloned() {
            Some(Reply::Page(page)) => Ok(page),
            Some(Reply::Status(code)) => Err(FetchError::Status(code)),
            Some(Reply::Decode) => Err(FetchError::Decode(
                serde_json::from_str::<MoviePage>("not json").unwrap_err(),
            )),
            None => {
                let title = if query.is_empty() { "Popular" } else { query.as_str() };
                Ok(MoviePage::with_results(movies(&[(1, title)])))
            }
        }
    }
}

#[async_trait]
impl MovieSource for FakeSource {
    async fn search(&self, query: &str) -> Result<MoviePage, FetchError> {
        self.answer(Call::search(query)).await
    }

    async fn discover(&self) -> Result<MoviePage, FetchError> {
        self.answer(Call::Discover).await
    }
}

#[derive(Default)]
pub struct FakeStore {
    trending: Vec<TrendingEntry>,
    fail_top: bool,
    fail_increment: bool,
    increments: Mutex<Vec<(String, i64)>>,
    top_limits: Mutex<Vec<usize>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trending(mut self, trending: Vec<TrendingEntry>) -> Self {
        self.trending = trending;
        self
    }

    pub fn failing_top(mut self) -> Self {
        self.fail_top = true;
        self
    }

    pub fn failing_increments(mut self) -> Self {
        self.fail_increment = true;
        self
    }

    pub fn increments(&self) -> Vec<(String, i64)> {
        self.increments.lock().clone()
    }

    pub fn top_limits(&self) -> Vec<usize> {
        self.top_limits.lock().clone()
    }
}

#[async_trait]
impl SearchCountStore for FakeStore {
    async fn increment(&self, search_term: &str, movie: &MovieSummary) -> StoreResult<()> {
        if self.fail_increment {
            return Err(StoreError::Status(500, "boom".to_string()));
        }
        self.increments
            .lock()
            .push((search_term.to_string(), movie.id));
        Ok(())
    }

    async fn top(&self, limit: usize) -> StoreResult<Vec<TrendingEntry>> {
        self.top_limits.lock().push(limit);
        if self.fail_top {
            return Err(StoreError::Status(503, "unavailable".to_string()));
        }
        Ok(self.trending.iter().take(limit).cloned().collect())
    }
}

pub fn movies(items: &[(i64, &str)]) -> Vec<MovieSummary> {
    items
        .iter()
        .map(|(id, title)| MovieSummary::new(*id, title))
        .collect()
}

pub fn entry(term: &str, count: i64) -> TrendingEntry {
    TrendingEntry {
        record_id: format!("rec-{}", term),
        search_term: term.to_string(),
        title: term.to_uppercase(),
        poster_url: format!("https://img.example/{}.jpg", term),
        movie_id: count,
        search_count: count,
    }
}
