use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display metadata for a recommended title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieInfo {
    pub poster: Option<String>,
    pub plot: String,
    pub year: String,
    pub genre: String,
    pub director: String,
    pub actors: String,
}

/// Outcome of a metadata lookup; negative answers are cached as well
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "info", rename_all = "snake_case")]
pub enum MovieLookup {
    Found(MovieInfo),
    NotFound,
}

impl MovieLookup {
    pub fn into_info(self) -> Option<MovieInfo> {
        match self {
            MovieLookup::Found(info) => Some(info),
            MovieLookup::NotFound => None,
        }
    }
}

/// Cached lookup with the time it was fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLookup {
    pub lookup: MovieLookup,
    pub cached_at: DateTime<Utc>,
}

impl CachedLookup {
    pub fn now(lookup: MovieLookup) -> Self {
        Self {
            lookup,
            cached_at: Utc::now(),
        }
    }
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// Raw response from `GET /?t={title}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbResponse {
    pub response: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
}

const OMDB_MISSING: &str = "N/A";

impl From<OmdbResponse> for MovieLookup {
    fn from(response: OmdbResponse) -> Self {
        if response.response != "True" {
            return MovieLookup::NotFound;
        }

        MovieLookup::Found(MovieInfo {
            poster: response
                .poster
                .filter(|p| !p.is_empty() && p != OMDB_MISSING),
            plot: response.plot.unwrap_or_default(),
            year: response.year.unwrap_or_default(),
            genre: response.genre.unwrap_or_default(),
            director: response.director.unwrap_or_default(),
            actors: response.actors.unwrap_or_default(),
        })
    }
}
