//! Video-search provider abstraction layer.
//!
//! Song enrichment only needs "best single hit for a query"; the trait keeps
//! that surface small so tests can swap in fakes.

mod provider;
mod youtube;

pub use provider::{SearchError, VideoHit, VideoSearchProvider};
pub use youtube::YouTubeSearchClient;
