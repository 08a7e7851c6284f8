use axum::{extract::State, http::StatusCode, response::Html, Json};

use super::types::*;
use crate::render;
use crate::server::AppState;
use crate::store::TrendingEntry;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.orchestrator.snapshot();
    Html(render::page(&snapshot, &state.config.tmdb.image_base_url))
}

pub async fn results(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.orchestrator.snapshot();
    Html(render::results_section(&snapshot, &state.config.tmdb.image_base_url))
}

pub async fn put_search(
    State(state): State<AppState>,
    Json(input): Json<SearchInput>,
) -> StatusCode {
    state.orchestrator.set_search_term(&input.term);
    StatusCode::ACCEPTED
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let snapshot = state.orchestrator.snapshot();
    let no_matches = snapshot.no_matches();

    Json(StateResponse {
        search: snapshot.search,
        movies: snapshot.movies,
        trending: snapshot.trending,
        no_matches,
    })
}

pub async fn get_trending(State(state): State<AppState>) -> Json<Vec<TrendingEntry>> {
    Json(state.orchestrator.snapshot().trending)
}
