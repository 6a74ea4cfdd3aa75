use std::{path::PathBuf, sync::Arc};

use tokio::sync::RwLock;

use crate::{
    dataset,
    engine::{RecommendationIndex, SimilarityStrategy, DEFAULT_K},
    error::{AppError, AppResult},
    services::EnrichmentService,
};

/// Where a rebuild reloads the corpus from
#[derive(Debug, Clone)]
pub struct DatasetSource {
    pub movies_csv: PathBuf,
    pub credits_csv: PathBuf,
    pub strategy: SimilarityStrategy,
}

impl DatasetSource {
    /// Loads and builds a fresh snapshot on a blocking thread
    pub async fn load(&self) -> AppResult<RecommendationIndex> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || {
            dataset::load_index(&source.movies_csv, &source.credits_csv, source.strategy)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Index build task failed: {}", e)))?
    }
}

/// Largest `k` the details route accepts unless configured otherwise
pub const DEFAULT_MAX_DETAILED_K: usize = 50;

/// Shared application state
///
/// The index is swapped whole; readers clone the `Arc` and never observe a
/// partially built snapshot.
#[derive(Clone)]
pub struct AppState {
    index: Arc<RwLock<Arc<RecommendationIndex>>>,
    enrichment: Option<EnrichmentService>,
    source: Option<DatasetSource>,
    default_k: usize,
    max_detailed_k: usize,
}

impl AppState {
    pub fn new(index: RecommendationIndex) -> Self {
        Self {
            index: Arc::new(RwLock::new(Arc::new(index))),
            enrichment: None,
            source: None,
            default_k: DEFAULT_K,
            max_detailed_k: DEFAULT_MAX_DETAILED_K,
        }
    }

    pub fn with_enrichment(mut self, enrichment: EnrichmentService) -> Self {
        self.enrichment = Some(enrichment);
        self
    }

    pub fn with_source(mut self, source: DatasetSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_default_k(mut self, k: usize) -> Self {
        self.default_k = k;
        self
    }

    pub fn with_max_detailed_k(mut self, k: usize) -> Self {
        self.max_detailed_k = k;
        self
    }

    /// Current snapshot
    pub async fn index(&self) -> Arc<RecommendationIndex> {
        self.index.read().await.clone()
    }

    pub fn enrichment(&self) -> AppResult<&EnrichmentService> {
        self.enrichment
            .as_ref()
            .ok_or_else(|| AppError::Unavailable("metadata enrichment is not configured".to_string()))
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }

    /// Requested `k` for an enriched response; each result costs a lookup
    pub fn detailed_k(&self, requested: Option<usize>) -> AppResult<usize> {
        let k = requested.unwrap_or(self.default_k);
        if k > self.max_detailed_k {
            return Err(AppError::InvalidInput(format!(
                "k must be at most {} when details are requested",
                self.max_detailed_k
            )));
        }
        Ok(k)
    }

    /// Rebuilds from the dataset source and swaps the new snapshot in
    ///
    /// On failure the previous snapshot keeps serving.
    pub async fn rebuild(&self) -> AppResult<usize> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| AppError::Unavailable("no dataset source to rebuild from".to_string()))?;

        let index = source.load().await?;
        let movies = index.len();
        *self.index.write().await = Arc::new(index);

        tracing::info!(movies, "Swapped in rebuilt index");
        Ok(movies)
    }
}
