use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use super::model::*;
use super::repo::*;
use crate::tmdb::MovieSummary;

/// Self-hosted search-count backend.
pub struct SqliteStore {
    pool: SqlitePool,
    image_base: String,
}

impl SqliteStore {
    pub async fn new(db_path: &str, image_base: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(db_path)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self {
            pool,
            image_base: image_base.to_string(),
        };

        store.init_schema().await?;

        info!("Search count database initialized at {}", db_path);

        Ok(store)
    }

    async fn init_schema(&self) -> StoreResult<()> {
        let schema = include_str!("schema.sql");
        sqlx::raw_sql(schema).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SearchCountStore for SqliteStore {
    async fn increment(&self, search_term: &str, movie: &MovieSummary) -> StoreResult<()> {
        let record = NewSearchRecord::new(search_term, movie, &self.image_base);
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO search_counts
             (id, search_term, count, movie_id, title, poster_url, created, updated)
             VALUES (?, ?, 1, ?, ?, ?, ?, ?)
             ON CONFLICT(search_term) DO UPDATE SET
                count = count + 1,
                updated = excluded.updated",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(&record.search_term)
        .bind(record.movie_id)
        .bind(&record.title)
        .bind(&record.poster_url)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(search_term = %search_term, "Search count incremented");
        Ok(())
    }

    async fn top(&self, limit: usize) -> StoreResult<Vec<TrendingEntry>> {
        let entries = sqlx::query_as::<_, TrendingEntry>(
            "SELECT id AS record_id, search_term, title, poster_url, movie_id, count AS search_count
             FROM search_counts
             ORDER BY count DESC, updated DESC
             LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
