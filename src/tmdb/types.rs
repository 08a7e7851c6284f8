use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// A missing or null value becomes the type's default, so one sparse item
// cannot fail the whole page.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One movie as returned by the metadata API. Fields the card needs are typed,
/// everything else is carried through untouched in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MovieSummary {
    pub fn new(id: i64, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            poster_path: None,
            popularity: None,
            vote_average: None,
            original_language: None,
            release_date: None,
            overview: None,
            extra: Map::new(),
        }
    }

    /// Year part of `release_date`, if there is one.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }
}

/// Envelope of the search and discover endpoints.
///
/// `Response: "False"` marks an API-level failure delivered with a 2xx status;
/// `Error` then carries the reason.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MoviePage {
    #[serde(rename = "Response", default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

impl MoviePage {
    pub fn with_results(results: Vec<MovieSummary>) -> Self {
        Self {
            response: None,
            error: None,
            results,
        }
    }

    pub fn is_api_failure(&self) -> bool {
        self.response.as_deref() == Some("False")
    }
}

/// Full poster URL for a TMDB `poster_path`.
pub fn poster_url(image_base: &str, poster_path: Option<&str>) -> Option<String> {
    let path = poster_path.filter(|p| !p.is_empty())?;
    Some(format!("{}{}", image_base.trim_end_matches('/'), path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_keeps_unknown_fields() {
        let page: MoviePage = serde_json::from_str(
            r#"{"page":1,"results":[{"id":27205,"title":"Inception","poster_path":"/x.jpg",
                "vote_average":8.4,"release_date":"2010-07-15","adult":false}]}"#,
        )
        .unwrap();
        assert!(!page.is_api_failure());
        let movie = &page.results[0];
        assert_eq!(movie.id, 27205);
        assert_eq!(movie.release_year(), Some("2010"));
        assert_eq!(movie.extra.get("adult"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_decode_sparse_items() {
        let page: MoviePage = serde_json::from_str(
            r#"{"results":[{"id":1,"title":"Ok"},{"id":2,"title":null},{"title":"No id"},
                {"id":null,"title":"Null id"}]}"#,
        )
        .unwrap();
        assert_eq!(page.results.len(), 4);
        assert_eq!(page.results[0].title, "Ok");
        assert_eq!(page.results[1].id, 2);
        assert_eq!(page.results[1].title, "");
        assert_eq!(page.results[2].id, 0);
        assert_eq!(page.results[2].title, "No id");
        assert_eq!(page.results[3].id, 0);
        assert!(page.results[3].extra.is_empty());
    }

    #[test]
    fn test_decode_api_failure() {
        let page: MoviePage =
            serde_json::from_str(r#"{"Response":"False","Error":"Movie not found!"}"#).unwrap();
        assert!(page.is_api_failure());
        assert_eq!(page.error.as_deref(), Some("Movie not found!"));
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_poster_url() {
        assert_eq!(
            poster_url("https://image.tmdb.org/t/p/w500/", Some("/abc.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(poster_url("https://image.tmdb.org/t/p/w500", None), None);
        assert_eq!(poster_url("https://image.tmdb.org/t/p/w500", Some("")), None);
    }

    #[test]
    fn test_release_year_missing() {
        let mut movie = MovieSummary::new(1, "Untitled");
        assert_eq!(movie.release_year(), None);
        movie.release_date = Some(String::new());
        assert_eq!(movie.release_year(), None);
    }
}
