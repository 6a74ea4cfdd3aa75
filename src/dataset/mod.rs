//! TMDB dataset ingestion.

mod tmdb;

pub use tmdb::{load_movies, load_movies_from_readers};

use crate::{
    engine::{IndexBuilder, RecommendationIndex, SimilarityStrategy},
    error::AppResult,
    models::RawMovie,
};
use std::path::Path;

/// Normalizes every joined row and builds a snapshot
pub fn build_index(rows: &[RawMovie], strategy: SimilarityStrategy) -> AppResult<RecommendationIndex> {
    let mut builder = IndexBuilder::new(strategy);
    for raw in rows {
        builder.add_raw(raw)?;
    }
    builder.build()
}

/// Loads both exports and builds a snapshot; blocking
pub fn load_index(
    movies_path: impl AsRef<Path>,
    credits_path: impl AsRef<Path>,
    strategy: SimilarityStrategy,
) -> AppResult<RecommendationIndex> {
    let rows = load_movies(movies_path, credits_path)?;
    build_index(&rows, strategy)
}
