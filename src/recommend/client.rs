//! Recommendation client: gated generation calls plus tolerant parsing.

use crate::profile::{Emotion, UserProfile};
use crate::recommend::models::Recommendations;
use crate::recommend::parse::{parse_songs, parse_tips};
use crate::recommend::prompt;
use crate::textgen::{GenerationError, GenerationOptions, GenerationOutcome, TextGenProvider};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Client for the text-generation capability.
///
/// Issues one call for songs and, only when the request needs therapy, one
/// more for tips. A blocked or empty reply degrades to an empty list for
/// that kind; a transport/auth/quota failure is a real error and is
/// propagated for the caller to report.
pub struct RecommendationClient {
    provider: Arc<dyn TextGenProvider>,
    options: GenerationOptions,
}

impl RecommendationClient {
    pub fn new(provider: Arc<dyn TextGenProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    /// Generate tips and songs for a profile.
    pub async fn generate(
        &self,
        profile: &UserProfile,
        emotion: Emotion,
    ) -> Result<Recommendations, GenerationError> {
        let prompts = prompt::build_prompts(profile, emotion);

        debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            needs_therapy = prompts.tips.is_some(),
            "Generating recommendations"
        );

        let songs = match self.call("songs", &prompts.songs).await? {
            Some(raw) => parse_songs(&raw),
            None => Vec::new(),
        };
        info!("Parsed {} song recommendation(s)", songs.len());

        let tips = match &prompts.tips {
            Some(tip_prompt) => {
                let tips = match self.call("tips", tip_prompt).await? {
                    Some(raw) => parse_tips(&raw),
                    None => Vec::new(),
                };
                info!("Parsed {} well-being tip(s)", tips.len());
                tips
            }
            None => Vec::new(),
        };

        Ok(Recommendations { tips, songs })
    }

    /// One generation round trip. `Ok(None)` is the soft-failure path:
    /// blocked content or an empty reply, to be treated as "no results".
    async fn call(&self, kind: &str, prompt: &str) -> Result<Option<String>, GenerationError> {
        match self.provider.generate(prompt, &self.options).await? {
            GenerationOutcome::Text(text) if !text.trim().is_empty() => Ok(Some(text)),
            GenerationOutcome::Text(_) => {
                info!(kind, "Generation returned empty text");
                Ok(None)
            }
            GenerationOutcome::Blocked { reason } => {
                warn!(kind, reason = %reason, "Generation was blocked");
                Ok(None)
            }
        }
    }
}
