use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

use crate::store::TrendingEntry;
use crate::tmdb::{poster_url, MovieSummary};

const NO_POSTER: &str = "/no-movie.png";

pub fn search_box(raw_term: &str) -> String {
    format!(
        concat!(
            r#"<div class="search"><div>"#,
            r#"<img src="/search.svg" alt="search" />"#,
            r#"<input id="search" type="text" placeholder="Search through thousands of movies" value="{}" autocomplete="off" />"#,
            r#"</div></div>"#
        ),
        encode_double_quoted_attribute(raw_term)
    )
}

pub fn spinner() -> String {
    r#"<div role="status" class="spinner"><span class="sr-only">Loading...</span></div>"#.to_string()
}

pub fn movie_card(movie: &MovieSummary, image_base: &str) -> String {
    let poster = poster_url(image_base, movie.poster_path.as_deref())
        .unwrap_or_else(|| NO_POSTER.to_string());
    let rating = movie
        .vote_average
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "N/A".to_string());
    let language = movie.original_language.as_deref().unwrap_or("N/A");
    let year = movie.release_year().unwrap_or("N/A");

    format!(
        concat!(
            r#"<li class="movie-card">"#,
            r#"<img src="{poster}" alt="{alt}" />"#,
            r#"<div class="mt-4"><h3>{title}</h3>"#,
            r#"<div class="content">"#,
            r#"<div class="rating"><img src="/star.svg" alt="Star Icon" /><p>{rating}</p></div>"#,
            r#"<span>&bull;</span><p class="lang">{language}</p>"#,
            r#"<span>&bull;</span><p class="year">{year}</p>"#,
            r#"</div></div></li>"#
        ),
        poster = encode_double_quoted_attribute(&poster),
        alt = encode_double_quoted_attribute(&movie.title),
        title = encode_text(&movie.title),
        rating = rating,
        language = encode_text(language),
        year = encode_text(year),
    )
}

/// Empty when there is nothing to rank.
pub fn trending_section(entries: &[TrendingEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut out = String::from(r#"<section class="trending"><h2>Trending Movies</h2><ul>"#);
    for (index, entry) in entries.iter().enumerate() {
        let poster = if entry.poster_url.is_empty() {
            NO_POSTER
        } else {
            entry.poster_url.as_str()
        };
        let _ = write!(
            out,
            r#"<li data-id="{}"><p>{}</p><img src="{}" title="{}" /></li>"#,
            encode_double_quoted_attribute(&entry.record_id),
            index + 1,
            encode_double_quoted_attribute(poster),
            encode_double_quoted_attribute(&entry.title),
        );
    }
    out.push_str("</ul></section>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::entry;

    #[test]
    fn test_search_box_escapes_value() {
        let html = search_box(r#""><script>"#);
        assert!(html.contains(r#"value="&quot;&gt;&lt;script&gt;""#));
    }

    #[test]
    fn test_movie_card_fields() {
        let mut movie = MovieSummary::new(1, "Alien & Co");
        movie.poster_path = Some("/a.jpg".to_string());
        movie.vote_average = Some(8.456);
        movie.original_language = Some("en".to_string());
        movie.release_date = Some("1979-05-25".to_string());

        let html = movie_card(&movie, "https://img.example/w500");
        assert!(html.contains(r#"src="https://img.example/w500/a.jpg""#));
        assert!(html.contains("<h3>Alien &amp; Co</h3>"));
        assert!(html.contains("<p>8.5</p>"));
        assert!(html.contains(r#"<p class="lang">en</p>"#));
        assert!(html.contains(r#"<p class="year">1979</p>"#));
    }

    #[test]
    fn test_movie_card_placeholders() {
        let html = movie_card(&MovieSummary::new(2, "Unknown"), "https://img.example/w500");
        assert!(html.contains(r#"src="/no-movie.png""#));
        assert!(html.contains("<p>N/A</p>"));
        assert!(html.contains(r#"<p class="year">N/A</p>"#));
    }

    #[test]
    fn test_trending_ranks() {
        let html = trending_section(&[entry("dune", 9), entry("heat", 3)]);
        assert!(html.contains("<h2>Trending Movies</h2>"));
        let first = html.find("<p>1</p>").unwrap();
        let second = html.find("<p>2</p>").unwrap();
        assert!(first < second);
        assert!(html.contains(r#"title="DUNE""#));
    }

    #[test]
    fn test_trending_empty() {
        assert_eq!(trending_section(&[]), "");
    }
}
