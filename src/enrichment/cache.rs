//! In-memory cache of resolved video lookups.
//!
//! Keyed by normalized title+artist. The value deliberately excludes the
//! per-request description: a song's video does not change between requests,
//! its mood rationale does.

use std::collections::{HashMap, VecDeque};

/// A resolved video lookup, sans description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedVideo {
    pub video_title: String,
    pub thumbnail_url: String,
    pub video_link: String,
}

/// Build the cache key for a title/artist pair.
pub fn cache_key(title: &str, artist: &str) -> String {
    format!("{}|{}", normalize(title), normalize(artist))
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Capacity-bounded memo of video lookups.
///
/// Constructed once per process and handed to the enrichment client; when the
/// capacity is reached the oldest-inserted entry is evicted. Re-inserting an
/// existing key refreshes the value without consuming capacity.
#[derive(Debug)]
pub struct EnrichmentCache {
    entries: HashMap<String, CachedVideo>,
    insertion_order: VecDeque<String>,
    capacity: usize,
}

impl EnrichmentCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CachedVideo> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, video: CachedVideo) {
        if self.entries.contains_key(&key) {
            self.entries.insert(key, video);
            return;
        }
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.insertion_order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.insertion_order.push_back(key.clone());
        self.entries.insert(key, video);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(tag: &str) -> CachedVideo {
        CachedVideo {
            video_title: format!("{} title", tag),
            thumbnail_url: format!("{}.jpg", tag),
            video_link: format!("https://www.youtube.com/watch?v={}", tag),
        }
    }

    #[test]
    fn test_key_normalization() {
        assert_eq!(cache_key("So What", "Miles Davis"), "so what|miles davis");
        assert_eq!(
            cache_key("  So What ", "MILES DAVIS"),
            cache_key("so what", "miles davis")
        );
    }

    #[test]
    fn test_get_and_insert() {
        let mut cache = EnrichmentCache::new(8);
        let key = cache_key("So What", "Miles Davis");
        assert!(cache.get(&key).is_none());

        cache.insert(key.clone(), video("a"));
        assert_eq!(cache.get(&key), Some(&video("a")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction_drops_oldest() {
        let mut cache = EnrichmentCache::new(2);
        cache.insert("one".to_string(), video("1"));
        cache.insert("two".to_string(), video("2"));
        cache.insert("three".to_string(), video("3"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("one").is_none());
        assert!(cache.get("two").is_some());
        assert!(cache.get("three").is_some());
    }

    #[test]
    fn test_reinsert_same_key_does_not_evict() {
        let mut cache = EnrichmentCache::new(2);
        cache.insert("one".to_string(), video("1"));
        cache.insert("two".to_string(), video("2"));
        cache.insert("one".to_string(), video("1b"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("one"), Some(&video("1b")));
        assert!(cache.get("two").is_some());
    }

    #[test]
    fn test_zero_capacity_still_holds_one_entry() {
        let mut cache = EnrichmentCache::new(0);
        cache.insert("one".to_string(), video("1"));
        assert_eq!(cache.len(), 1);
    }
}
