//! Content-based movie recommendations over TMDB metadata, served over HTTP.

pub mod cache;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use engine::{IndexBuilder, RecommendationIndex, SimilarityStrategy};
pub use error::{AppError, AppResult};
