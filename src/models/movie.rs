use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One movie after the movies and credits exports have been joined on title
///
/// The four attribute fields are still serialized collections of objects
/// (`[{"id": 28, "name": "Action"}, ...]`); the tag normalizer turns them into
/// a [`MovieRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    pub genres: String,
    pub keywords: String,
    pub cast: String,
    pub crew: String,
}

/// Strongly-typed movie metadata, validated at ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: i64,
    pub title: String,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    /// Top-billed cast in credited order, at most three
    pub cast: Vec<String>,
    /// Directors only
    pub crew: Vec<String>,
}

/// Lowercase, single-space-joined bag of tags for one movie
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagDocument(String);

impl TagDocument {
    /// Builds a document from already-normalized text (lowercased here regardless)
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace-separated tokens in document order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }
}

impl Display for TagDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Corpus entry: position in the corpus is the canonical index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusEntry {
    pub id: i64,
    pub title: String,
    pub tags: TagDocument,
}

/// A ranked neighbor of the query title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTitle {
    pub title: String,
    pub movie_id: i64,
    pub score: f64,
}
