//! Batch enrichment of song recommendations with video lookups.

use super::cache::{cache_key, CachedVideo, EnrichmentCache};
use crate::recommend::{EnrichedSong, SongRecommendation};
use crate::videosearch::VideoSearchProvider;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of an enrichment batch.
///
/// Songs whose lookup failed are dropped, not null-filled; each drop leaves
/// a human-readable warning behind.
#[derive(Debug, Default)]
pub struct EnrichmentOutcome {
    pub songs: Vec<EnrichedSong>,
    pub warnings: Vec<String>,
}

/// Enrichment client: resolves each recommended song to a playable video,
/// consulting and updating the cache.
pub struct EnrichmentClient {
    search: Arc<dyn VideoSearchProvider>,
    cache: EnrichmentCache,
}

impl EnrichmentClient {
    pub fn new(search: Arc<dyn VideoSearchProvider>, cache: EnrichmentCache) -> Self {
        Self { search, cache }
    }

    /// Enrich a batch of songs, best effort in input order.
    ///
    /// Per song: cache hit short-circuits the network call and the current
    /// request's description is overlaid on the cached value. A failed or
    /// empty lookup drops that song and the batch continues.
    pub async fn enrich(&mut self, songs: &[SongRecommendation]) -> EnrichmentOutcome {
        let mut outcome = EnrichmentOutcome::default();

        for song in songs {
            let key = cache_key(&song.title, &song.artist);

            if let Some(cached) = self.cache.get(&key) {
                debug!(title = %song.title, artist = %song.artist, "Enrichment cache hit");
                outcome.songs.push(enriched(song, cached));
                continue;
            }

            let query = format!("{} {} official audio", song.title, song.artist);
            match self.search.search_one(&query).await {
                Ok(Some(hit)) => {
                    let cached = CachedVideo {
                        video_title: hit.title,
                        thumbnail_url: hit.thumbnail_url,
                        video_link: hit.watch_url,
                    };
                    outcome.songs.push(enriched(song, &cached));
                    self.cache.insert(key, cached);
                }
                Ok(None) => {
                    info!(title = %song.title, artist = %song.artist, "No video match found");
                    outcome.warnings.push(format!(
                        "No video match found for \"{} - {}\"",
                        song.title, song.artist
                    ));
                }
                Err(e) => {
                    warn!(
                        title = %song.title,
                        artist = %song.artist,
                        error = %e,
                        "Video lookup failed"
                    );
                    outcome.warnings.push(format!(
                        "Video lookup failed for \"{} - {}\": {}",
                        song.title, song.artist, e
                    ));
                }
            }
        }

        outcome
    }
}

fn enriched(song: &SongRecommendation, cached: &CachedVideo) -> EnrichedSong {
    EnrichedSong {
        title: song.title.clone(),
        artist: song.artist.clone(),
        description: song.description.clone(),
        video_title: cached.video_title.clone(),
        thumbnail_url: cached.thumbnail_url.clone(),
        video_link: cached.video_link.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::videosearch::{SearchError, VideoHit};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fake search provider: answers from a fixed script, counting calls.
    struct ScriptedSearch {
        calls: AtomicUsize,
        miss_queries: Vec<String>,
        fail_queries: Vec<String>,
    }

    impl ScriptedSearch {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                miss_queries: Vec::new(),
                fail_queries: Vec::new(),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VideoSearchProvider for ScriptedSearch {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn search_one(&self, query: &str) -> Result<Option<VideoHit>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_queries.iter().any(|q| query.contains(q.as_str())) {
                return Err(SearchError::Connection("socket closed".to_string()));
            }
            if self.miss_queries.iter().any(|q| query.contains(q.as_str())) {
                return Ok(None);
            }
            Ok(Some(VideoHit {
                video_id: "vid".to_string(),
                title: format!("{} (Official Audio)", query),
                watch_url: "https://www.youtube.com/watch?v=vid".to_string(),
                thumbnail_url: "high.jpg".to_string(),
            }))
        }
    }

    fn song(title: &str, artist: &str, description: &str) -> SongRecommendation {
        SongRecommendation {
            title: title.to_string(),
            artist: artist.to_string(),
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_enrich_populates_video_fields() {
        let search = Arc::new(ScriptedSearch::new());
        let mut client = EnrichmentClient::new(search.clone(), EnrichmentCache::new(16));

        let outcome = client.enrich(&[song("So What", "Miles Davis", "calm")]).await;

        assert_eq!(outcome.songs.len(), 1);
        assert_eq!(outcome.warnings.len(), 0);
        let enriched = &outcome.songs[0];
        assert_eq!(enriched.title, "So What");
        assert_eq!(enriched.description, "calm");
        assert_eq!(enriched.video_link, "https://www.youtube.com/watch?v=vid");
        assert_eq!(enriched.thumbnail_url, "high.jpg");
        assert_eq!(search.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network_and_overlays_description() {
        let search = Arc::new(ScriptedSearch::new());
        let mut client = EnrichmentClient::new(search.clone(), EnrichmentCache::new(16));

        client.enrich(&[song("So What", "Miles Davis", "first mood")]).await;
        assert_eq!(search.call_count(), 1);

        // Same song, different casing and a new per-request description.
        let outcome = client
            .enrich(&[song("so what", "MILES DAVIS", "second mood")])
            .await;

        assert_eq!(search.call_count(), 1);
        assert_eq!(outcome.songs.len(), 1);
        assert_eq!(outcome.songs[0].description, "second mood");
        assert_eq!(
            outcome.songs[0].video_link,
            "https://www.youtube.com/watch?v=vid"
        );
    }

    #[tokio::test]
    async fn test_no_match_drops_song_and_continues() {
        let mut search = ScriptedSearch::new();
        search.miss_queries.push("Nonexistent".to_string());
        let search = Arc::new(search);
        let mut client = EnrichmentClient::new(search.clone(), EnrichmentCache::new(16));

        let outcome = client
            .enrich(&[
                song("Nonexistent", "Nobody", ""),
                song("So What", "Miles Davis", ""),
            ])
            .await;

        assert_eq!(outcome.songs.len(), 1);
        assert_eq!(outcome.songs[0].title, "So What");
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("No video match"));
        assert_eq!(search.call_count(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_abort_batch() {
        let mut search = ScriptedSearch::new();
        search.fail_queries.push("Broken".to_string());
        let search = Arc::new(search);
        let mut client = EnrichmentClient::new(search.clone(), EnrichmentCache::new(16));

        let outcome = client
            .enrich(&[
                song("Broken", "Link", ""),
                song("So What", "Miles Davis", ""),
            ])
            .await;

        assert_eq!(outcome.songs.len(), 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("Video lookup failed"));
    }

    #[tokio::test]
    async fn test_failed_lookup_is_not_cached() {
        let mut search = ScriptedSearch::new();
        search.miss_queries.push("Nonexistent".to_string());
        let search = Arc::new(search);
        let mut client = EnrichmentClient::new(search.clone(), EnrichmentCache::new(16));

        client.enrich(&[song("Nonexistent", "Nobody", "")]).await;
        client.enrich(&[song("Nonexistent", "Nobody", "")]).await;

        // Both runs hit the network: a miss never enters the cache.
        assert_eq!(search.call_count(), 2);
    }
}
