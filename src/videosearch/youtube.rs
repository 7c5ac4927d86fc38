//! YouTube Data API v3 search client.
//!
//! Requests are spaced out so a batch of song lookups does not burst the
//! quota-metered endpoint.

use super::provider::{SearchError, VideoHit, VideoSearchProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3/search";
const REQUEST_SPACING: Duration = Duration::from_millis(200); // 5 req/sec
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// YouTube music category used to restrict search results.
const MUSIC_CATEGORY_ID: &str = "10";

pub struct YouTubeSearchClient {
    client: Client,
    api_key: String,
    last_request: Mutex<Instant>,
}

impl YouTubeSearchClient {
    pub fn new(api_key: &str) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SearchError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            last_request: Mutex::new(Instant::now() - REQUEST_SPACING),
        })
    }

    async fn space_requests(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < REQUEST_SPACING {
            tokio::time::sleep(REQUEST_SPACING - elapsed).await;
        }
        *last = Instant::now();
    }
}

#[async_trait]
impl VideoSearchProvider for YouTubeSearchClient {
    fn name(&self) -> &str {
        "youtube"
    }

    async fn search_one(&self, query: &str) -> Result<Option<VideoHit>, SearchError> {
        self.space_requests().await;

        let url = format!(
            "{}?part=snippet&q={}&type=video&videoCategoryId={}&maxResults=1&key={}",
            YOUTUBE_API_BASE,
            urlencoding::encode(query),
            MUSIC_CATEGORY_ID,
            self.api_key
        );

        debug!(query = %query, "Searching YouTube");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else {
                SearchError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            SearchError::InvalidResponse(format!("Failed to parse search response: {}", e))
        })?;

        let items = body.items.unwrap_or_default();
        Ok(items.into_iter().find_map(hit_from_item))
    }
}

/// Convert a raw search item into a hit, skipping items without a video id.
fn hit_from_item(item: SearchItem) -> Option<VideoHit> {
    let video_id = item.id.and_then(|id| id.video_id)?;
    let snippet = item.snippet?;
    let thumbnail_url = best_thumbnail(snippet.thumbnails.as_ref())?;

    Some(VideoHit {
        watch_url: format!("https://www.youtube.com/watch?v={}", video_id),
        video_id,
        title: snippet.title.unwrap_or_default(),
        thumbnail_url,
    })
}

/// Pick the best-available thumbnail: high, then medium, then default.
fn best_thumbnail(thumbnails: Option<&Thumbnails>) -> Option<String> {
    let thumbnails = thumbnails?;
    [&thumbnails.high, &thumbnails.medium, &thumbnails.default]
        .into_iter()
        .find_map(|tier| tier.as_ref().map(|t| t.url.clone()))
}

// YouTube API types

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<SearchItemId>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}
