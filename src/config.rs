use serde::Deserialize;
use std::path::PathBuf;

use crate::engine::SimilarityStrategy;

/// Which backend stores enrichment lookups
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    Redis,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OMDb API key; enrichment is disabled when absent
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// TMDB movies export (id, title, overview, genres, keywords)
    #[serde(default = "default_movies_csv")]
    pub movies_csv: PathBuf,

    /// TMDB credits export (movie_id, title, cast, crew)
    #[serde(default = "default_credits_csv")]
    pub credits_csv: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of recommendations returned when the request does not say
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    /// Largest `k` accepted on the details route
    #[serde(default = "default_max_detailed_recommendations")]
    pub max_detailed_recommendations: usize,

    #[serde(default)]
    pub similarity_strategy: SimilarityStrategy,

    #[serde(default = "default_cache_backend")]
    pub cache_backend: CacheBackend,

    /// Maximum cached titles; unbounded when absent
    #[serde(default)]
    pub cache_capacity: Option<u64>,

    /// TTL for Redis entries
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Per-request timeout for metadata lookups
    #[serde(default = "default_enrichment_timeout_ms")]
    pub enrichment_timeout_ms: u64,

    /// Retries after the first failed metadata lookup
    #[serde(default = "default_enrichment_max_retries")]
    pub enrichment_max_retries: u32,

    /// Metadata lookups allowed in flight at once
    #[serde(default = "default_enrichment_concurrency")]
    pub enrichment_concurrency: usize,
}

fn default_omdb_api_url() -> String {
    "http://www.omdbapi.com".to_string()
}

fn default_movies_csv() -> PathBuf {
    PathBuf::from("data/tmdb_5000_movies.csv")
}

fn default_credits_csv() -> PathBuf {
    PathBuf::from("data/tmdb_5000_credits.csv")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_recommendations() -> usize {
    10
}

fn default_max_detailed_recommendations() -> usize {
    50
}

fn default_cache_backend() -> CacheBackend {
    CacheBackend::Memory
}

fn default_cache_ttl_secs() -> u64 {
    86400
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_enrichment_timeout_ms() -> u64 {
    5000
}

fn default_enrichment_max_retries() -> u32 {
    2
}

fn default_enrichment_concurrency() -> usize {
    4
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config.omdb_api_key, None);
        assert_eq!(config.omdb_api_url, "http://www.omdbapi.com");
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_recommendations, 10);
        assert_eq!(config.similarity_strategy, SimilarityStrategy::Eager);
        assert_eq!(config.cache_backend, CacheBackend::Memory);
        assert_eq!(config.cache_capacity, None);
        assert_eq!(config.enrichment_max_retries, 2);
        assert_eq!(config.enrichment_concurrency, 4);
        assert_eq!(config.max_detailed_recommendations, 50);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("OMDB_API_KEY", "secret"),
            ("PORT", "8080"),
            ("SIMILARITY_STRATEGY", "lazy"),
            ("CACHE_BACKEND", "redis"),
            ("CACHE_CAPACITY", "500"),
            ("MOVIES_CSV", "/tmp/movies.csv"),
            ("ENRICHMENT_CONCURRENCY", "8"),
            ("MAX_DETAILED_RECOMMENDATIONS", "20"),
        ]))
        .unwrap();

        assert_eq!(config.omdb_api_key.as_deref(), Some("secret"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.similarity_strategy, SimilarityStrategy::Lazy);
        assert_eq!(config.cache_backend, CacheBackend::Redis);
        assert_eq!(config.cache_capacity, Some(500));
        assert_eq!(config.movies_csv, PathBuf::from("/tmp/movies.csv"));
        assert_eq!(config.enrichment_concurrency, 8);
        assert_eq!(config.max_detailed_recommendations, 20);
    }

    #[test]
    fn test_invalid_strategy_is_rejected() {
        let result = Config::from_vars(vars(&[("SIMILARITY_STRATEGY", "fuzzy")]));
        assert!(result.is_err());
    }
}
