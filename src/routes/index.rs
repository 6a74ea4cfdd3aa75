use axum::{extract::State, Json};
use serde::Serialize;

use crate::{error::AppResult, state::AppState};

#[derive(Debug, Serialize)]
pub struct RebuildResponse {
    pub movies: usize,
}

/// Reloads the dataset and swaps in a fresh index
pub async fn rebuild(State(state): State<AppState>) -> AppResult<Json<RebuildResponse>> {
    let movies = state.rebuild().await?;
    Ok(Json(RebuildResponse { movies }))
}
