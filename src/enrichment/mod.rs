//! Song enrichment: video lookups plus the memo cache in front of them.

mod cache;
mod enricher;

pub use cache::{cache_key, CachedVideo, EnrichmentCache};
pub use enricher::{EnrichmentClient, EnrichmentOutcome};
