//! Moodtune Library
//!
//! Mood-based music recommendation pipeline: a questionnaire profile goes to
//! a text-generation API for song and well-being tip suggestions, and each
//! suggested song is enriched with a playable video link and thumbnail from a
//! video-search API.

pub mod config;
pub mod enrichment;
pub mod profile;
pub mod recommend;
pub mod textgen;
pub mod videosearch;

// Re-export commonly used types for convenience
pub use enrichment::{EnrichmentCache, EnrichmentClient};
pub use profile::{Emotion, UserProfile};
pub use recommend::{PipelineResult, RecommendationClient, RecommendationPipeline};
pub use textgen::{GenerationOptions, TextGenProvider};
pub use videosearch::VideoSearchProvider;
