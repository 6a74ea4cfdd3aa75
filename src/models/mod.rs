mod enrichment;
mod movie;

pub use enrichment::{CachedLookup, MovieInfo, MovieLookup, OmdbResponse};
pub use movie::{CorpusEntry, MovieRecord, RawMovie, ScoredTitle, TagDocument};
