use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movies/search", get(search_movies))
        .route("/movies/category/:category", get(category_movies))
        .route("/movies/:id", get(movie_by_id))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

/// Category shelves map to a fixed vocabulary of catalog search terms.
fn search_term_for(category: &str) -> &'static str {
    match category {
        "trending" => "avengers",
        "action" => "action",
        "scifi" => "star",
        "comedy" => "comedy",
        "drama" => "drama",
        _ => "movie",
    }
}

#[instrument(skip(state))]
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, AppError> {
    let body = state
        .catalog
        .search(&params.query)
        .await
        .map_err(AppError::Catalog)?;
    Ok(Json(body))
}

#[instrument(skip(state))]
pub async fn category_movies(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Value>, AppError> {
    let body = state
        .catalog
        .search_movies(search_term_for(&category))
        .await
        .map_err(AppError::Catalog)?;
    Ok(Json(body))
}

#[instrument(skip(state))]
pub async fn movie_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let body = state
        .catalog
        .fetch_by_id(&id)
        .await
        .map_err(AppError::CatalogLookup)?;
    Ok(Json(body))
}
