use serde::{Deserialize, Serialize};

use crate::tmdb::{poster_url, MovieSummary};

/// One ranked row of the trending list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct TrendingEntry {
    pub record_id: String,
    pub search_term: String,
    pub title: String,
    pub poster_url: String,
    pub movie_id: i64,
    pub search_count: i64,
}

/// Fields written when a search term is recorded for the first time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSearchRecord {
    pub search_term: String,
    pub movie_id: i64,
    pub title: String,
    pub poster_url: String,
}

impl NewSearchRecord {
    pub fn new(search_term: &str, movie: &MovieSummary, image_base: &str) -> Self {
        Self {
            search_term: search_term.to_string(),
            movie_id: movie.id,
            title: movie.title.clone(),
            poster_url: poster_url(image_base, movie.poster_path.as_deref()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Backend returned status {0}: {1}")]
    Status(u16, String),
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
