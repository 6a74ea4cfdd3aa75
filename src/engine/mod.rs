//! Content-based recommendation core.
//!
//! Tag normalization feeds a TF-IDF vector space, whose pairwise cosine
//! similarities are ranked per query by [`RecommendationIndex`].

mod index;
mod similarity;
mod stopwords;
mod tags;
mod vector_space;

pub use index::{IndexBuilder, RecommendationIndex, DEFAULT_K};
pub use similarity::{Similarities, SimilarityMatrix, SimilarityStrategy};
pub use vector_space::{SparseVector, VectorSpace, VectorSpaceBuilder};
