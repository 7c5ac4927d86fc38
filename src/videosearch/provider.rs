//! Video-search provider trait definition.

use async_trait::async_trait;
use thiserror::Error;

/// A single video search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoHit {
    pub video_id: String,
    /// Title as returned by the search service, which may differ from the
    /// queried song title.
    pub title: String,
    /// Canonical watch URL.
    pub watch_url: String,
    /// Best-available thumbnail URL.
    pub thumbnail_url: String,
}

/// Errors that can occur when interacting with a video-search provider.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Trait for video-search providers.
#[async_trait]
pub trait VideoSearchProvider: Send + Sync {
    /// Get the provider's name (e.g., "youtube").
    fn name(&self) -> &str;

    /// Search for the single best video match for a query.
    ///
    /// `Ok(None)` means the search succeeded but found nothing; that is a
    /// normal result, not an error.
    async fn search_one(&self, query: &str) -> Result<Option<VideoHit>, SearchError>;
}
