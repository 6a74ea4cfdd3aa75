pub mod enrichment;
pub mod providers;

pub use enrichment::EnrichmentService;
pub use providers::{MetadataProvider, OmdbProvider};
