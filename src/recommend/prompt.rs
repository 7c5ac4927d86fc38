//! Prompt construction for the text-generation capability.
//!
//! Both prompts demand a strict machine-parseable reply (line format or a
//! JSON array with fixed keys) because everything downstream is parsed, not
//! displayed raw.

use crate::profile::{Emotion, UserProfile};
use crate::recommend::parse::{MAX_SONGS, MAX_TIPS};

/// The pair of prompts for one request. The tip prompt exists only when the
/// request needs therapy.
#[derive(Debug, Clone)]
pub struct Prompts {
    pub songs: String,
    pub tips: Option<String>,
}

/// Build the prompts for a profile and detected emotion.
pub fn build_prompts(profile: &UserProfile, emotion: Emotion) -> Prompts {
    Prompts {
        songs: song_prompt(profile, emotion),
        tips: profile
            .needs_therapy(emotion)
            .then(|| therapy_prompt(profile, emotion)),
    }
}

/// Render the user profile block shared by both prompts.
fn render_profile(profile: &UserProfile, emotion: Emotion) -> String {
    let mut block = format!(
        "Detected Emotion: {}\n\
         Self-Reported Happiness (1-10): {}\n\
         Mood Swings Frequency: {}\n\
         Preferred Low-Mood Activity: {}\n\
         Favorite Music Genre: {}\n\
         Favorite Artists: {}\n",
        emotion,
        profile.mood_level,
        profile.mood_swings,
        profile.activity,
        profile.favorite_genre,
        favorite_artists_line(profile),
    );

    if !profile.extra_info.is_empty() {
        block.push_str("Additional Context Provided:\n");
        for (key, value) in &profile.extra_info {
            if !value.trim().is_empty() {
                block.push_str(&format!("- {}: {}\n", title_case_key(key), value));
            }
        }
    }

    block
}

fn favorite_artists_line(profile: &UserProfile) -> String {
    if profile.favorite_artists.is_empty() {
        "None specified".to_string()
    } else {
        profile.favorite_artists.join(", ")
    }
}

/// "stress_cause" -> "Stress Cause"
fn title_case_key(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn song_prompt(profile: &UserProfile, emotion: Emotion) -> String {
    format!(
        "Based on the following user profile:\n\
         {profile_block}\n\
         Generate exactly {count} diverse song recommendations that match the user's \
         current emotion ({emotion}) and music preferences.\n\
         \n\
         - Prioritize songs by their favorite artists ({artists}) whenever a suitable \
         match for the mood exists; the user's named artists come before generic genre picks.\n\
         - If the favorite artists do not fit the mood, or none were provided, pick songs \
         from their favorite genre ({genre}) or close genres that match the emotion.\n\
         - Only suggest real songs available on major streaming platforms.\n\
         - Aim for variety within the mood.\n\
         \n\
         Reply with exactly {count} lines in the strict format:\n\
         Title - Artist\n\
         One song per line. No numbering, no commentary, nothing before or after the list.",
        profile_block = render_profile(profile, emotion),
        count = MAX_SONGS,
        emotion = emotion,
        artists = favorite_artists_line(profile),
        genre = profile.favorite_genre,
    )
}

fn therapy_prompt(profile: &UserProfile, emotion: Emotion) -> String {
    format!(
        "Based on the following user profile:\n\
         {profile_block}\n\
         The user seems to be going through challenging emotions ({emotion}) or reported \
         low happiness ({mood}). Provide exactly {count} distinct, actionable well-being \
         tips tailored to their situation. Focus on practical techniques such as \
         mindfulness, journaling, gentle exercise, connecting with others, or reframing \
         thoughts, and suggest professional help where the context warrants it. Phrase \
         the tips gently and supportively.\n\
         \n\
         Reply as a numbered list in the strict format:\n\
         1. Heading: tip text\n\
         One tip per line, a two-or-three-word heading before the colon. Nothing before \
         or after the list.",
        profile_block = render_profile(profile, emotion),
        emotion = emotion,
        mood = profile.mood_level,
        count = MAX_TIPS,
    )
}
