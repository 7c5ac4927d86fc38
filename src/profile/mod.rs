//! User questionnaire profile and emotion labels.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How often the user reports experiencing mood swings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoodSwings {
    Rarely,
    Sometimes,
    Often,
    Always,
}

impl fmt::Display for MoodSwings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MoodSwings::Rarely => "Rarely",
            MoodSwings::Sometimes => "Sometimes",
            MoodSwings::Often => "Often",
            MoodSwings::Always => "Always",
        };
        write!(f, "{}", s)
    }
}

/// Emotion label attached to a request.
///
/// Comes from an upstream detector when one is wired in; defaults to
/// `Unknown` otherwise. `Unknown` never counts as distress by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Fear,
    Disgust,
    Neutral,
    Surprise,
    #[default]
    Unknown,
}

impl Emotion {
    /// Emotions that indicate the user may benefit from well-being tips.
    pub fn is_distress(&self) -> bool {
        matches!(
            self,
            Emotion::Sad | Emotion::Angry | Emotion::Fear | Emotion::Disgust
        )
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fear => "fear",
            Emotion::Disgust => "disgust",
            Emotion::Neutral => "neutral",
            Emotion::Surprise => "surprise",
            Emotion::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Emotion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Ok(Emotion::Happy),
            "sad" => Ok(Emotion::Sad),
            "angry" => Ok(Emotion::Angry),
            "fear" => Ok(Emotion::Fear),
            "disgust" => Ok(Emotion::Disgust),
            "neutral" => Ok(Emotion::Neutral),
            "surprise" => Ok(Emotion::Surprise),
            "unknown" => Ok(Emotion::Unknown),
            other => bail!("Unrecognized emotion label: {}", other),
        }
    }
}

/// Questionnaire answers describing the user's current mood and preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Self-reported happiness on a 1 (very unhappy) to 10 (very happy) scale.
    pub mood_level: u8,
    pub mood_swings: MoodSwings,
    /// Activity the user finds comforting when feeling low.
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub favorite_genre: String,
    #[serde(default)]
    pub favorite_artists: Vec<String>,
    /// Optional follow-up answers, collected only on the low-mood branch
    /// (`mood_level <= 4`). Blank answers are dropped before they get here.
    #[serde(default)]
    pub extra_info: BTreeMap<String, String>,
}

impl UserProfile {
    /// Check the profile invariants.
    ///
    /// `mood_level` must be within [1, 10] and `extra_info` may only be
    /// populated when the low-mood branch was taken.
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.mood_level) {
            bail!(
                "mood_level must be between 1 and 10, got {}",
                self.mood_level
            );
        }
        if self.mood_level > 4 && !self.extra_info.is_empty() {
            bail!("extra_info is only collected when mood_level is 4 or lower");
        }
        Ok(())
    }

    /// Whether well-being tips should be generated for this request.
    ///
    /// True when the detected emotion is a distress emotion or the
    /// self-reported mood is low. `Unknown` never triggers this by itself.
    pub fn needs_therapy(&self, emotion: Emotion) -> bool {
        emotion.is_distress() || self.mood_level <= 4
    }
}
