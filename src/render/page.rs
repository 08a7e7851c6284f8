use html_escape::encode_text;

use super::components::{movie_card, search_box, spinner, trending_section};
use crate::orchestrator::PageSnapshot;

// Pushes input to the debounced search endpoint and refreshes the results
// section; all state lives server side.
const CLIENT_SCRIPT: &str = r#"<script>
const input = document.getElementById('search');
input.addEventListener('input', () => {
  fetch('/api/search', {method: 'PUT', headers: {'content-type': 'application/json'},
    body: JSON.stringify({term: input.value})});
});
setInterval(async () => {
  const res = await fetch('/results');
  if (res.ok) document.getElementById('results').outerHTML = await res.text();
}, 750);
</script>"#;

/// The results section: spinner, error text, "no matches" line or the cards.
pub fn results_section(snapshot: &PageSnapshot, image_base: &str) -> String {
    let body = if snapshot.search.is_loading {
        spinner()
    } else if snapshot.has_error() {
        format!(
            r#"<p class="text-red-500">{}</p>"#,
            encode_text(&snapshot.search.error_message)
        )
    } else if snapshot.no_matches() {
        r#"<p class="no-results">No movies found.</p>"#.to_string()
    } else {
        let cards: String = snapshot
            .movies
            .iter()
            .map(|m| movie_card(m, image_base))
            .collect();
        format!("<ul>{}</ul>", cards)
    };

    format!(
        r#"<section id="results" class="all-movies"><h2>Popular Movies</h2>{}</section>"#,
        body
    )
}

pub fn page(snapshot: &PageSnapshot, image_base: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            r#"<html lang="en"><head><meta charset="utf-8" />"#,
            r#"<meta name="viewport" content="width=device-width, initial-scale=1" />"#,
            "<title>Movies</title></head><body>",
            r#"<main><div class="pattern"></div><div class="wrapper"><header>"#,
            r#"<img src="/hero.png" alt="Hero Banner" />"#,
            r#"<h1>Find <span class="text-gradient">Movies</span> You'll Enjoy Without the Hassle</h1>"#,
            "{search}</header>{trending}{results}</div></main>{script}</body></html>"
        ),
        search = search_box(&snapshot.search.raw_term),
        trending = trending_section(&snapshot.trending),
        results = results_section(snapshot, image_base),
        script = CLIENT_SCRIPT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::SearchState;
    use crate::testutil::{entry, movies};

    const IMG: &str = "https://img.example/w500";

    #[test]
    fn test_loading_shows_spinner_only() {
        let snapshot = PageSnapshot {
            search: SearchState {
                is_loading: true,
                error_message: "stale".to_string(),
                ..SearchState::default()
            },
            movies: movies(&[(1, "Heat")]),
            ..PageSnapshot::default()
        };
        let html = results_section(&snapshot, IMG);
        assert!(html.contains("Loading..."));
        assert!(!html.contains("Heat"));
        assert!(!html.contains("text-red-500"));
    }

    #[test]
    fn test_error_replaces_cards() {
        let snapshot = PageSnapshot {
            search: SearchState {
                error_message: "Invalid <key>".to_string(),
                ..SearchState::default()
            },
            movies: movies(&[(1, "Heat")]),
            results_loaded: true,
            ..PageSnapshot::default()
        };
        let html = results_section(&snapshot, IMG);
        assert!(html.contains(r#"<p class="text-red-500">Invalid &lt;key&gt;</p>"#));
        assert!(!html.contains("movie-card"));
    }

    #[test]
    fn test_cards_rendered() {
        let snapshot = PageSnapshot {
            movies: movies(&[(1, "Heat"), (2, "Ronin")]),
            results_loaded: true,
            ..PageSnapshot::default()
        };
        let html = results_section(&snapshot, IMG);
        assert_eq!(html.matches(r#"class="movie-card""#).count(), 2);
        assert!(html.contains("<h2>Popular Movies</h2>"));
    }

    #[test]
    fn test_no_matches_distinct_from_error() {
        let snapshot = PageSnapshot {
            search: SearchState {
                debounced_term: "qwxz".to_string(),
                ..SearchState::default()
            },
            results_loaded: true,
            ..PageSnapshot::default()
        };
        let html = results_section(&snapshot, IMG);
        assert!(html.contains("No movies found."));
        assert!(!html.contains("text-red-500"));
    }

    #[test]
    fn test_heading_same_for_search_results() {
        let snapshot = PageSnapshot {
            search: SearchState {
                raw_term: "heat".to_string(),
                debounced_term: "heat".to_string(),
                ..SearchState::default()
            },
            movies: movies(&[(1, "Heat")]),
            results_loaded: true,
            ..PageSnapshot::default()
        };
        let html = results_section(&snapshot, IMG);
        assert!(html.contains("<h2>Popular Movies</h2>"));
    }

    #[test]
    fn test_page_trending_only_when_present() {
        let mut snapshot = PageSnapshot::default();
        assert!(!page(&snapshot, IMG).contains("Trending Movies"));

        snapshot.trending = vec![entry("dune", 4)];
        let html = page(&snapshot, IMG);
        assert!(html.contains("Trending Movies"));
        assert!(html.contains(r#"id="search""#));
    }
}
