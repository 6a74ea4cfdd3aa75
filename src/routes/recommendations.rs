use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    models::{MovieInfo, ScoredTitle},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub title: String,
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub title: String,
    pub recommendations: Vec<ScoredTitle>,
}

#[derive(Debug, Serialize)]
pub struct DetailedRecommendation {
    #[serde(flatten)]
    pub scored: ScoredTitle,
    pub info: Option<MovieInfo>,
}

#[derive(Debug, Serialize)]
pub struct DetailedResponse {
    pub title: String,
    pub recommendations: Vec<DetailedRecommendation>,
}

/// Handler for plain recommendations
pub async fn recommend(
    State(state): State<AppState>,
    query: Result<Query<RecommendQuery>, QueryRejection>,
) -> AppResult<Json<RecommendResponse>> {
    let Query(params) = query?;
    let k = params.k.unwrap_or(state.default_k());
    let recommendations = state.index().await.recommend_scored(&params.title, k)?;

    tracing::info!(title = %params.title, k, "Served recommendations");

    Ok(Json(RecommendResponse {
        title: params.title,
        recommendations,
    }))
}

/// Handler for recommendations with OMDb metadata attached
pub async fn recommend_with_details(
    State(state): State<AppState>,
    query: Result<Query<RecommendQuery>, QueryRejection>,
) -> AppResult<Json<DetailedResponse>> {
    let Query(params) = query?;
    let enrichment = state.enrichment()?;
    let k = state.detailed_k(params.k)?;
    let scored = state.index().await.recommend_scored(&params.title, k)?;

    let titles: Vec<String> = scored.iter().map(|s| s.title.clone()).collect();
    let infos = enrichment.enrich_all(&titles).await;

    let recommendations = scored
        .into_iter()
        .zip(infos)
        .map(|(scored, info)| DetailedRecommendation { scored, info })
        .collect();

    Ok(Json(DetailedResponse {
        title: params.title,
        recommendations,
    }))
}
