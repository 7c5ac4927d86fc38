//! Data models for the recommendation domain.

use serde::{Deserialize, Serialize};

/// A song suggested by the text-generation capability.
///
/// Immutable once parsed; enrichment produces a separate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecommendation {
    pub title: String,
    pub artist: String,
    /// One-sentence mood rationale. Empty when the model omitted it.
    #[serde(default)]
    pub description: String,
}

/// A well-being tip, produced only for low-mood or distress requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TherapyTip {
    /// Short heading, upper-cased by convention.
    pub title: String,
    pub body: String,
}

/// A song recommendation with its resolved video lookup attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedSong {
    pub title: String,
    pub artist: String,
    pub description: String,
    /// Title as returned by the video search, which may differ from the
    /// recommended title.
    pub video_title: String,
    pub thumbnail_url: String,
    pub video_link: String,
}

/// What the text-generation round produced, before enrichment.
#[derive(Debug, Clone, Default)]
pub struct Recommendations {
    pub tips: Vec<TherapyTip>,
    pub songs: Vec<SongRecommendation>,
}

/// Final output of a pipeline run.
///
/// Recoverable failures never abort the run; they surface here as
/// human-readable warnings alongside whatever partial results survived.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineResult {
    pub tips: Vec<TherapyTip>,
    pub songs: Vec<EnrichedSong>,
    pub warnings: Vec<String>,
}

/// Bounded cursor over an ordered tip list.
///
/// Next/prev transitions clamp to `[0, len - 1]`; an empty list pins the
/// cursor at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipCursor {
    index: usize,
    len: usize,
}

impl TipCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Advance the cursor, clamped to the last entry.
    pub fn next(&mut self) -> usize {
        if self.index + 1 < self.len {
            self.index += 1;
        }
        self.index
    }

    /// Step the cursor back, clamped to the first entry.
    pub fn prev(&mut self) -> usize {
        self.index = self.index.saturating_sub(1);
        self.index
    }
}
