//! TF-IDF vector space over a corpus of tag documents.
//!
//! Building is two-phase: [`VectorSpaceBuilder`] collects documents and
//! [`VectorSpaceBuilder::build`] consumes it into a read-only [`VectorSpace`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::stopwords::is_stop_word;
use crate::{
    error::{AppError, AppResult},
    models::TagDocument,
};

/// L2-normalized sparse vector, column indices strictly increasing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    /// Dot product by merge-join over the sorted indices
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut a, mut b) = (0, 0);
        let mut sum = 0.0;
        while a < self.indices.len() && b < other.indices.len() {
            match self.indices[a].cmp(&other.indices[b]) {
                std::cmp::Ordering::Less => a += 1,
                std::cmp::Ordering::Greater => b += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[a] * other.values[b];
                    a += 1;
                    b += 1;
                }
            }
        }
        sum
    }
}

/// Accepts documents in corpus order; no query interface
#[derive(Debug, Default)]
pub struct VectorSpaceBuilder {
    documents: Vec<Vec<String>>,
}

impl VectorSpaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, document: &TagDocument) {
        let tokens = document
            .tokens()
            .filter(|t| !is_stop_word(t))
            .map(str::to_string)
            .collect();
        self.documents.push(tokens);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn build(self) -> AppResult<VectorSpace> {
        if self.documents.is_empty() {
            return Err(AppError::EmptyCorpus);
        }

        let n = self.documents.len();

        // Document frequency per term; BTreeMap gives lexicographic columns
        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &self.documents {
            let distinct: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in distinct {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let mut vocabulary = HashMap::with_capacity(df.len());
        let mut terms = Vec::with_capacity(df.len());
        let mut idf = Vec::with_capacity(df.len());
        for (column, (term, count)) in df.iter().enumerate() {
            vocabulary.insert(term.to_string(), column);
            terms.push(term.to_string());
            idf.push(smooth_idf(n, *count));
        }

        let vectors = self
            .documents
            .iter()
            .map(|tokens| weigh(tokens, &vocabulary, &idf))
            .collect();

        tracing::debug!(documents = n, vocabulary = terms.len(), "Built vector space");

        Ok(VectorSpace {
            vocabulary,
            terms,
            idf,
            vectors,
        })
    }
}

/// ln((1 + n) / (1 + df)) + 1
fn smooth_idf(n: usize, df: usize) -> f64 {
    ((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0
}

fn weigh(tokens: &[String], vocabulary: &HashMap<String, usize>, idf: &[f64]) -> SparseVector {
    let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
    for token in tokens {
        if let Some(&column) = vocabulary.get(token) {
            *counts.entry(column).or_insert(0.0) += 1.0;
        }
    }

    let (indices, mut values): (Vec<usize>, Vec<f64>) = counts
        .into_iter()
        .map(|(column, tf)| (column, tf * idf[column]))
        .unzip();

    let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        values.iter_mut().for_each(|v| *v /= norm);
    }

    SparseVector { indices, values }
}

/// Vocabulary, IDF weights and one vector per corpus position
#[derive(Debug, Clone)]
pub struct VectorSpace {
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f64>,
    vectors: Vec<SparseVector>,
}

impl VectorSpace {
    /// Column of a term, if it survived stopword removal
    #[cfg(test)]
    fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Terms in column order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    pub fn vector(&self, position: usize) -> Option<&SparseVector> {
        self.vectors.get(position)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn space(docs: &[&str]) -> VectorSpace {
        let mut builder = VectorSpaceBuilder::new();
        for doc in docs {
            builder.add_document(&TagDocument::new(doc));
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_empty_corpus_is_rejected() {
        let err = VectorSpaceBuilder::new().build().unwrap_err();
        assert!(matches!(err, AppError::EmptyCorpus));
    }

    #[test]
    fn test_vocabulary_is_lexicographic_and_drops_stopwords() {
        let space = space(&["zombie the action", "action of heist"]);
        assert_eq!(space.terms(), &["action", "heist", "zombie"]);
        assert_eq!(space.column("heist"), Some(1));
        assert_eq!(space.column("the"), None);
    }

    #[test]
    fn test_idf_values() {
        let space = space(&["action heist", "action drama", "action"]);
        let action = space.column("action").unwrap();
        let heist = space.column("heist").unwrap();
        // df(action) = 3 of 3, df(heist) = 1 of 3
        assert!((space.idf()[action] - 1.0).abs() < EPS);
        assert!((space.idf()[heist] - (2.0f64.ln() + 1.0)).abs() < EPS);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let space = space(&["action action heist", "drama romance", "action"]);
        for v in space.vectors() {
            let norm: f64 = v.values().iter().map(|x| x * x).sum();
            assert!((norm - 1.0).abs() < EPS);
            assert!(v.indices().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_term_frequency_is_raw_count() {
        let space = space(&["heist heist drama", "comedy"]);
        let v = space.vector(0).unwrap();
        let heist = space.column("heist").unwrap();
        let drama = space.column("drama").unwrap();
        let weight = |col| v.indices().iter().position(|&c| c == col).map(|i| v.values()[i]);
        // equal idf, so the ratio is the count ratio
        let ratio = weight(heist).unwrap() / weight(drama).unwrap();
        assert!((ratio - 2.0).abs() < EPS);
    }

    #[test]
    fn test_stopword_only_document_is_zero_vector() {
        let space = space(&["the of and", "action"]);
        assert!(space.vector(0).unwrap().is_zero());
        assert!(!space.vector(1).unwrap().is_zero());
    }

    #[test]
    fn test_build_is_deterministic() {
        let docs = ["action adventure cameron", "drama romance cameron", "action"];
        let a = space(&docs);
        let b = space(&docs);
        assert_eq!(a.terms(), b.terms());
        for (x, y) in a.vectors().iter().zip(b.vectors()) {
            assert_eq!(x.indices(), y.indices());
            for (p, q) in x.values().iter().zip(y.values()) {
                assert!((p - q).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_dot_of_disjoint_vectors_is_zero() {
        let space = space(&["action", "drama"]);
        let v = space.vectors();
        assert_eq!(v[0].dot(&v[1]), 0.0);
        assert!((v[0].dot(&v[0]) - 1.0).abs() < EPS);
    }
}
