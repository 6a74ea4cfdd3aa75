//! Pairwise cosine similarity between corpus vectors.

use std::borrow::Cow;

use serde::Deserialize;

use super::vector_space::VectorSpace;

/// How similarity rows are produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityStrategy {
    /// Dense N x N matrix computed once at build time
    #[default]
    Eager,
    /// Rows computed per query from the vectors
    Lazy,
}

/// Dense symmetric matrix, row-major
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Computes the upper triangle and mirrors it
    pub fn compute(space: &VectorSpace) -> Self {
        let vectors = space.vectors();
        let n = vectors.len();
        let mut values = vec![0.0; n * n];

        for i in 0..n {
            values[i * n + i] = self_similarity(space, i);
            for j in (i + 1)..n {
                let score = vectors[i].dot(&vectors[j]);
                values[i * n + j] = score;
                values[j * n + i] = score;
            }
        }

        Self { n, values }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        (i < self.n && j < self.n).then(|| self.values[i * self.n + j])
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        (i < self.n).then(|| &self.values[i * self.n..(i + 1) * self.n])
    }
}

/// 1.0 for a non-zero vector, 0.0 for a zero vector
fn self_similarity(space: &VectorSpace, i: usize) -> f64 {
    match space.vector(i) {
        Some(v) if !v.is_zero() => 1.0,
        _ => 0.0,
    }
}

/// Source of similarity rows, owned by the recommendation index
#[derive(Debug, Clone)]
pub enum Similarities {
    Eager(SimilarityMatrix),
    Lazy(VectorSpace),
}

impl Similarities {
    pub fn new(space: VectorSpace, strategy: SimilarityStrategy) -> Self {
        match strategy {
            SimilarityStrategy::Eager => Similarities::Eager(SimilarityMatrix::compute(&space)),
            SimilarityStrategy::Lazy => Similarities::Lazy(space),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Similarities::Eager(matrix) => matrix.len(),
            Similarities::Lazy(space) => space.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row `i` of the similarity matrix; both strategies agree exactly
    pub fn row(&self, i: usize) -> Option<Cow<'_, [f64]>> {
        match self {
            Similarities::Eager(matrix) => matrix.row(i).map(Cow::Borrowed),
            Similarities::Lazy(space) => {
                let query = space.vector(i)?;
                let row = space
                    .vectors()
                    .iter()
                    .enumerate()
                    .map(|(j, v)| {
                        if j == i {
                            self_similarity(space, i)
                        } else if j < i {
                            // same operand order as the eager upper triangle
                            v.dot(query)
                        } else {
                            query.dot(v)
                        }
                    })
                    .collect();
                Some(Cow::Owned(row))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::vector_space::VectorSpaceBuilder, models::TagDocument};

    fn space(docs: &[&str]) -> VectorSpace {
        let mut builder = VectorSpaceBuilder::new();
        for doc in docs {
            builder.add_document(&TagDocument::new(doc));
        }
        builder.build().unwrap()
    }

    fn corpus() -> VectorSpace {
        space(&[
            "action adventure cameron",
            "action adventure cameron",
            "romance drama",
            "the of",
            "action drama nolan",
        ])
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let matrix = SimilarityMatrix::compute(&corpus());
        for i in 0..matrix.len() {
            for j in 0..matrix.len() {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
    }

    #[test]
    fn test_diagonal() {
        let matrix = SimilarityMatrix::compute(&corpus());
        assert_eq!(matrix.get(0, 0), Some(1.0));
        assert_eq!(matrix.get(2, 2), Some(1.0));
        // stopword-only document
        assert_eq!(matrix.get(3, 3), Some(0.0));
    }

    #[test]
    fn test_values_in_unit_interval() {
        let matrix = SimilarityMatrix::compute(&corpus());
        for i in 0..matrix.len() {
            for &score in matrix.row(i).unwrap() {
                assert!((0.0..=1.0 + 1e-12).contains(&score));
            }
        }
        assert!((matrix.get(0, 1).unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(matrix.get(0, 2), Some(0.0));
    }

    #[test]
    fn test_out_of_range() {
        let matrix = SimilarityMatrix::compute(&corpus());
        assert_eq!(matrix.get(5, 0), None);
        assert!(matrix.row(5).is_none());
    }

    #[test]
    fn test_lazy_rows_match_eager() {
        let eager = Similarities::new(corpus(), SimilarityStrategy::Eager);
        let lazy = Similarities::new(corpus(), SimilarityStrategy::Lazy);
        assert!(matches!(lazy, Similarities::Lazy(_)));
        assert_eq!(eager.len(), lazy.len());
        for i in 0..eager.len() {
            assert_eq!(eager.row(i).unwrap(), lazy.row(i).unwrap());
        }
        assert!(lazy.row(eager.len()).is_none());
    }

    #[test]
    fn test_strategy_deserializes_lowercase() {
        let s: SimilarityStrategy = serde_json::from_str("\"lazy\"").unwrap();
        assert_eq!(s, SimilarityStrategy::Lazy);
        assert_eq!(SimilarityStrategy::default(), SimilarityStrategy::Eager);
    }
}
