//! Recommendation index: the immutable snapshot queried per request.

use std::collections::HashMap;

use super::{
    similarity::{Similarities, SimilarityStrategy},
    vector_space::VectorSpaceBuilder,
};
use crate::{
    error::{AppError, AppResult},
    models::{CorpusEntry, MovieRecord, RawMovie, ScoredTitle, TagDocument},
};

/// Number of neighbors returned when the caller does not ask for a count
pub const DEFAULT_K: usize = 10;

/// Collects corpus entries; the only way to a [`RecommendationIndex`]
#[derive(Debug)]
pub struct IndexBuilder {
    strategy: SimilarityStrategy,
    entries: Vec<CorpusEntry>,
}

impl IndexBuilder {
    pub fn new(strategy: SimilarityStrategy) -> Self {
        Self {
            strategy,
            entries: Vec::new(),
        }
    }

    pub fn add_record(&mut self, record: &MovieRecord) {
        self.entries.push(CorpusEntry {
            id: record.id,
            title: record.title.clone(),
            tags: TagDocument::from(record),
        });
    }

    /// Normalizes a joined row and appends it
    pub fn add_raw(&mut self, raw: &RawMovie) -> AppResult<()> {
        let record = MovieRecord::from_raw(raw)?;
        self.add_record(&record);
        Ok(())
    }

    /// Appends an already-normalized document
    pub fn add_document(&mut self, id: i64, title: impl Into<String>, tags: TagDocument) {
        self.entries.push(CorpusEntry {
            id,
            title: title.into(),
            tags,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> AppResult<RecommendationIndex> {
        let mut vectors = VectorSpaceBuilder::new();
        for entry in &self.entries {
            vectors.add_document(&entry.tags);
        }
        let space = vectors.build()?;
        let vocabulary = space.terms().len();

        let mut positions = HashMap::with_capacity(self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            positions.entry(entry.title.clone()).or_insert(i);
        }

        let similarities = Similarities::new(space, self.strategy);

        tracing::info!(
            movies = self.entries.len(),
            vocabulary,
            strategy = ?self.strategy,
            "Built recommendation index"
        );

        Ok(RecommendationIndex {
            entries: self.entries,
            positions,
            similarities,
        })
    }
}

/// Read-only snapshot; safe to share behind an `Arc`
#[derive(Debug)]
pub struct RecommendationIndex {
    entries: Vec<CorpusEntry>,
    /// First corpus position of each title
    positions: HashMap<String, usize>,
    similarities: Similarities,
}

impl RecommendationIndex {
    /// Titles of the `k` most similar movies, best first
    pub fn recommend(&self, title: &str, k: usize) -> AppResult<Vec<String>> {
        Ok(self
            .recommend_scored(title, k)?
            .into_iter()
            .map(|scored| scored.title)
            .collect())
    }

    /// Like [`recommend`](Self::recommend) but with ids and scores
    pub fn recommend_scored(&self, title: &str, k: usize) -> AppResult<Vec<ScoredTitle>> {
        let idx = self
            .position(title)
            .ok_or_else(|| AppError::NotFound(title.to_string()))?;
        let row = self
            .similarities
            .row(idx)
            .ok_or_else(|| AppError::Internal(format!("missing similarity row {}", idx)))?;

        let mut candidates: Vec<(usize, f64)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|(j, _)| *j != idx)
            .collect();
        candidates.sort_by(|(i, a), (j, b)| b.total_cmp(a).then(i.cmp(j)));
        candidates.truncate(k);

        tracing::debug!(title, k, returned = candidates.len(), "Ranked neighbors");

        Ok(candidates
            .into_iter()
            .map(|(j, score)| {
                let entry = &self.entries[j];
                ScoredTitle {
                    title: entry.title.clone(),
                    movie_id: entry.id,
                    score,
                }
            })
            .collect())
    }

    /// Corpus position of the first movie with this exact title
    pub fn position(&self, title: &str) -> Option<usize> {
        self.positions.get(title).copied()
    }

    /// All titles in corpus order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
