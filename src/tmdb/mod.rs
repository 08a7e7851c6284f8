mod client;
mod types;

pub use client::{FetchError, MovieSource, TmdbClient};
pub use types::{poster_url, MoviePage, MovieSummary};
