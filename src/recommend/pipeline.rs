//! Pipeline orchestration: generate, then enrich, then report.

use crate::enrichment::EnrichmentClient;
use crate::profile::{Emotion, UserProfile};
use crate::recommend::client::RecommendationClient;
use crate::recommend::models::PipelineResult;
use tracing::{info, warn};

/// Orchestrates one recommendation request end to end.
///
/// Recoverable failures never escape this boundary: generation and
/// enrichment problems degrade into empty or partial results with
/// caller-visible warning strings.
pub struct RecommendationPipeline {
    client: RecommendationClient,
    enricher: EnrichmentClient,
}

impl RecommendationPipeline {
    pub fn new(client: RecommendationClient, enricher: EnrichmentClient) -> Self {
        Self { client, enricher }
    }

    pub async fn run(&mut self, profile: &UserProfile, emotion: Emotion) -> PipelineResult {
        info!(
            emotion = %emotion,
            mood_level = profile.mood_level,
            needs_therapy = profile.needs_therapy(emotion),
            "Starting recommendation run"
        );

        let recommendations = match self.client.generate(profile, emotion).await {
            Ok(recs) => recs,
            Err(e) => {
                warn!(error = %e, "Recommendation generation failed");
                return PipelineResult {
                    tips: Vec::new(),
                    songs: Vec::new(),
                    warnings: vec![format!("Recommendation generation failed: {}", e)],
                };
            }
        };

        if recommendations.songs.is_empty() {
            info!("No song recommendations to enrich");
            return PipelineResult {
                tips: recommendations.tips,
                songs: Vec::new(),
                warnings: vec!["No song recommendations were generated".to_string()],
            };
        }

        let recommended = recommendations.songs.len();
        let outcome = self.enricher.enrich(&recommendations.songs).await;
        let mut warnings = outcome.warnings;

        if outcome.songs.is_empty() {
            warn!("Could not resolve a video for any of the {} recommended songs", recommended);
            warnings.push("Could not resolve a video for any recommended song".to_string());
        } else if outcome.songs.len() < recommended {
            info!(
                "Resolved videos for {} of {} recommended songs",
                outcome.songs.len(),
                recommended
            );
            warnings.push(format!(
                "Resolved videos for {} of {} recommended songs",
                outcome.songs.len(),
                recommended
            ));
        }

        PipelineResult {
            tips: recommendations.tips,
            songs: outcome.songs,
            warnings,
        }
    }
}
