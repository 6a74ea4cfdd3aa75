use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TitlesResponse {
    pub titles: Vec<String>,
}

/// Every addressable title, in corpus order
pub async fn list(State(state): State<AppState>) -> Json<TitlesResponse> {
    let index = state.index().await;
    Json(TitlesResponse {
        titles: index.titles().map(str::to_string).collect(),
    })
}
