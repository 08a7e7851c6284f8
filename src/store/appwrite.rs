use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::model::*;
use super::repo::*;
use crate::config::AppwriteConfig;
use crate::tmdb::MovieSummary;

/// Search counts kept in an Appwrite collection, one document per search term.
///
/// Documents carry `searchTerm`, `count`, `movie_id`, `title` and `poster_url`.
pub struct AppwriteStore {
    client: reqwest::Client,
    documents_url: String,
    project_id: String,
    api_key: Option<String>,
    image_base: String,
}

#[derive(Debug, Deserialize)]
struct SearchDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "searchTerm")]
    search_term: String,
    #[serde(default)]
    count: i64,
    #[serde(default)]
    movie_id: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    poster_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<SearchDocument>,
}

impl From<SearchDocument> for TrendingEntry {
    fn from(doc: SearchDocument) -> Self {
        TrendingEntry {
            record_id: doc.id,
            search_term: doc.search_term,
            title: doc.title.unwrap_or_default(),
            poster_url: doc.poster_url.unwrap_or_default(),
            movie_id: doc.movie_id,
            search_count: doc.count,
        }
    }
}

impl AppwriteStore {
    pub fn new(config: &AppwriteConfig, image_base: &str) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let documents_url = format!(
            "{}/databases/{}/collections/{}/documents",
            config.endpoint.trim_end_matches('/'),
            urlencoding::encode(&config.database_id),
            urlencoding::encode(&config.collection_id),
        );

        Ok(Self {
            client,
            documents_url,
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
            image_base: image_base.to_string(),
        })
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, url)
            .header("X-Appwrite-Project", &self.project_id);
        if let Some(ref key) = self.api_key {
            builder = builder.header("X-Appwrite-Key", key);
        }
        builder
    }

    async fn list(&self, queries: &[serde_json::Value]) -> StoreResult<Vec<SearchDocument>> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_string()))
            .collect();

        let response = self
            .request(reqwest::Method::GET, &self.documents_url)
            .query(&params)
            .send()
            .await?;
        let body = check(response).await?;
        let list: DocumentList = serde_json::from_slice(&body)?;
        Ok(list.documents)
    }

    async fn find_by_term(&self, search_term: &str) -> StoreResult<Option<SearchDocument>> {
        let docs = self
            .list(&[
                json!({"method": "equal", "attribute": "searchTerm", "values": [search_term]}),
                json!({"method": "limit", "values": [1]}),
            ])
            .await?;
        Ok(docs.into_iter().next())
    }
}

async fn check(response: reqwest::Response) -> StoreResult<Vec<u8>> {
    let status = response.status();
    let body = response.bytes().await?.to_vec();
    if !status.is_success() {
        let text = String::from_utf8_lossy(&body).into_owned();
        return Err(StoreError::Status(status.as_u16(), text));
    }
    Ok(body)
}

#[async_trait]
impl SearchCountStore for AppwriteStore {
    async fn increment(&self, search_term: &str, movie: &MovieSummary) -> StoreResult<()> {
        match self.find_by_term(search_term).await? {
            Some(doc) => {
                let url = format!("{}/{}", self.documents_url, urlencoding::encode(&doc.id));
                let response = self
                    .request(reqwest::Method::PATCH, &url)
                    .json(&json!({"data": {"count": doc.count + 1}}))
                    .send()
                    .await?;
                check(response).await?;
                debug!(search_term = %search_term, count = doc.count + 1, "Search count updated");
            }
            None => {
                let record = NewSearchRecord::new(search_term, movie, &self.image_base);
                let response = self
                    .request(reqwest::Method::POST, &self.documents_url)
                    .json(&json!({
                        "documentId": uuid::Uuid::new_v4().simple().to_string(),
                        "data": {
                            "searchTerm": record.search_term,
                            "count": 1,
                            "movie_id": record.movie_id,
                            "title": record.title,
                            "poster_url": record.poster_url,
                        }
                    }))
                    .send()
                    .await?;
                check(response).await?;
                debug!(search_term = %search_term, "Search count created");
            }
        }
        Ok(())
    }

    async fn top(&self, limit: usize) -> StoreResult<Vec<TrendingEntry>> {
        let docs = self
            .list(&[
                json!({"method": "orderDesc", "attribute": "count"}),
                json!({"method": "limit", "values": [limit]}),
            ])
            .await?;
        Ok(docs.into_iter().map(TrendingEntry::from).collect())
    }
}
