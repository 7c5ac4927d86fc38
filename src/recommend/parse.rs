//! Tolerant parsing of model output into typed records.
//!
//! The model is asked for a strict format but is not trusted to honor it.
//! Parsing therefore tries JSON candidates first (each top-level `[...]`
//! block extracted by bracket-depth scanning and parsed in isolation), then
//! falls back to line-based parsing. Unparseable input degrades to an empty
//! list, never an error.

use crate::recommend::models::{SongRecommendation, TherapyTip};
use serde::Deserialize;

/// Songs requested and kept per response.
pub const MAX_SONGS: usize = 10;
/// Tips requested and kept per response.
pub const MAX_TIPS: usize = 5;

const FALLBACK_TIP_HEADING: &str = "WELL-BEING TIP";

/// Parse song recommendations out of a raw model reply.
pub fn parse_songs(raw: &str) -> Vec<SongRecommendation> {
    for candidate in extract_json_arrays(raw) {
        if let Some(songs) = songs_from_json(candidate) {
            return songs;
        }
    }
    songs_from_lines(raw)
}

/// Parse well-being tips out of a raw model reply.
pub fn parse_tips(raw: &str) -> Vec<TherapyTip> {
    for candidate in extract_json_arrays(raw) {
        if let Some(tips) = tips_from_json(candidate) {
            return tips;
        }
    }
    tips_from_lines(raw)
}

/// Extract every top-level `[...]` block from the text.
///
/// Bracket-depth scan: two separate arrays in one blob come back as two
/// independent candidates. String literals inside a candidate are honored so
/// brackets within them don't count.
fn extract_json_arrays(raw: &str) -> Vec<&str> {
    let mut candidates = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in raw.char_indices() {
        if depth == 0 {
            if c == '[' {
                depth = 1;
                start = i;
                in_string = false;
                escaped = false;
            }
            continue;
        }
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    candidates.push(&raw[start..i + 1]);
                }
            }
            _ => {}
        }
    }

    candidates
}

#[derive(Debug, Deserialize)]
struct RawSongRecord {
    title: String,
    artist: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct RawTipRecord {
    tip: String,
}

/// Try a candidate block as a song array. None when it isn't one.
fn songs_from_json(candidate: &str) -> Option<Vec<SongRecommendation>> {
    let records: Vec<RawSongRecord> = serde_json::from_str(candidate).ok()?;
    if records.is_empty() {
        return None;
    }
    let songs: Vec<SongRecommendation> = records
        .into_iter()
        .filter_map(|r| {
            let title = r.title.trim().to_string();
            let artist = r.artist.trim().to_string();
            if title.is_empty() || artist.is_empty() {
                return None;
            }
            Some(SongRecommendation {
                title,
                artist,
                description: r.description.trim().to_string(),
            })
        })
        .take(MAX_SONGS)
        .collect();
    (!songs.is_empty()).then_some(songs)
}

/// Try a candidate block as a tip array. None when it isn't one.
fn tips_from_json(candidate: &str) -> Option<Vec<TherapyTip>> {
    let records: Vec<RawTipRecord> = serde_json::from_str(candidate).ok()?;
    let tips: Vec<TherapyTip> = records
        .into_iter()
        .filter(|r| !r.tip.trim().is_empty())
        .map(|r| tip_from_text(r.tip.trim()))
        .take(MAX_TIPS)
        .collect();
    (!tips.is_empty()).then_some(tips)
}

/// Line-based song fallback: `Title - Artist`, split on the first separator.
fn songs_from_lines(raw: &str) -> Vec<SongRecommendation> {
    raw.lines()
        .map(strip_decoration)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (title, artist) = line.split_once(" - ")?;
            let title = title.trim();
            let artist = artist.trim();
            if title.is_empty() || artist.is_empty() {
                return None;
            }
            Some(SongRecommendation {
                title: title.to_string(),
                artist: artist.to_string(),
                description: String::new(),
            })
        })
        .take(MAX_SONGS)
        .collect()
}

/// Line-based tip fallback: numbered or bulleted lines only.
fn tips_from_lines(raw: &str) -> Vec<TherapyTip> {
    raw.lines()
        .filter_map(|line| {
            let line = line.trim();
            let listed = line
                .chars()
                .next()
                .map(|c| c.is_ascii_digit() || matches!(c, '-' | '*' | '•'))
                .unwrap_or(false);
            if !listed {
                return None;
            }
            let text = strip_decoration(line);
            (!text.is_empty()).then(|| tip_from_text(text))
        })
        .take(MAX_TIPS)
        .collect()
}

/// Split `Heading: body` into an upper-cased heading and body; lines without
/// a usable heading get a fixed one.
fn tip_from_text(text: &str) -> TherapyTip {
    match text.split_once(':') {
        Some((heading, body)) if !heading.trim().is_empty() && !body.trim().is_empty() => {
            TherapyTip {
                title: heading.trim().to_uppercase(),
                body: body.trim().to_string(),
            }
        }
        _ => TherapyTip {
            title: FALLBACK_TIP_HEADING.to_string(),
            body: text.to_string(),
        },
    }
}

/// Strip bullet, numbering, and markdown-bold decoration from a line.
fn strip_decoration(line: &str) -> &str {
    let mut s = line.trim();
    if let Some(rest) = strip_number_prefix(s) {
        s = rest.trim_start();
    }
    while let Some(rest) = s
        .strip_prefix("* ")
        .or_else(|| s.strip_prefix("- "))
        .or_else(|| s.strip_prefix("• "))
    {
        s = rest.trim_start();
    }
    s.trim_start_matches("**").trim_end_matches("**").trim()
}

fn strip_number_prefix(s: &str) -> Option<&str> {
    let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &s[digits..];
    rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_well_formed_lines_in_order() {
        let raw = (1..=10)
            .map(|i| format!("Song {} - Artist {}", i, i))
            .collect::<Vec<_>>()
            .join("\n");

        let songs = parse_songs(&raw);
        assert_eq!(songs.len(), 10);
        assert_eq!(songs[0].title, "Song 1");
        assert_eq!(songs[0].artist, "Artist 1");
        assert_eq!(songs[9].title, "Song 10");
    }

    #[test]
    fn test_split_on_first_separator_only() {
        let songs = parse_songs("Scenes From an Italian Restaurant - Part Two - Billy Joel");
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "Scenes From an Italian Restaurant");
        assert_eq!(songs[0].artist, "Part Two - Billy Joel");
    }

    #[test]
    fn test_decoration_stripped_and_blanks_dropped() {
        let raw = "\n**So What - Miles Davis**\n\n- Naima - John Coltrane\n1. Take Five - Dave Brubeck\nnot a song line\n";
        let songs = parse_songs(raw);
        assert_eq!(songs.len(), 3);
        assert_eq!(songs[0].title, "So What");
        assert_eq!(songs[1].title, "Naima");
        assert_eq!(songs[2].title, "Take Five");
    }

    #[test]
    fn test_songs_truncated_to_ten() {
        let raw = (1..=14)
            .map(|i| format!("Song {} - Artist", i))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_songs(&raw).len(), 10);
    }

    #[test]
    fn test_json_songs_with_descriptions() {
        let raw = r#"Here are your songs:
        [
            {"title": "So What", "artist": "Miles Davis", "description": "A calm modal classic."},
            {"title": "Naima", "artist": "John Coltrane"}
        ]
        Enjoy!"#;

        let songs = parse_songs(raw);
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].description, "A calm modal classic.");
        assert_eq!(songs[1].description, "");
    }

    #[test]
    fn test_two_embedded_arrays_classified_independently() {
        let raw = r#"Sure! Songs first:
        [{"title": "So What", "artist": "Miles Davis", "description": "calm"}]
        and some tips:
        [{"tip": "Gentle Walks: take a short walk outside."}, {"tip": "Journaling: write three lines."}]
        Hope this helps."#;

        let songs = parse_songs(raw);
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].artist, "Miles Davis");

        let tips = parse_tips(raw);
        assert_eq!(tips.len(), 2);
        assert_eq!(tips[0].title, "GENTLE WALKS");
        assert_eq!(tips[0].body, "take a short walk outside.");
    }

    #[test]
    fn test_tips_array_first_does_not_confuse_song_parse() {
        let raw = r#"[{"tip": "Breathe: slowly."}]
        [{"title": "So What", "artist": "Miles Davis"}]"#;

        let songs = parse_songs(raw);
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "So What");
    }

    #[test]
    fn test_garbage_returns_empty_without_panicking() {
        for raw in ["", "   \n  ", "%$@!! {{{{ ]] [", "[1, 2, 3]", "[\"a\", \"b\"]"] {
            assert!(parse_songs(raw).is_empty(), "songs not empty for {:?}", raw);
            assert!(parse_tips(raw).is_empty(), "tips not empty for {:?}", raw);
        }
    }

    #[test]
    fn test_unterminated_array_falls_back_to_lines() {
        let raw = "[ broken json\nSo What - Miles Davis";
        let songs = parse_songs(raw);
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "So What");
    }

    #[test]
    fn test_brackets_inside_strings_do_not_split_candidates() {
        let raw = r#"[{"title": "Song [Live]", "artist": "Band"}]"#;
        let songs = parse_songs(raw);
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "Song [Live]");
    }

    #[test]
    fn test_numbered_tips_lines() {
        let raw = "1. Mindful Breathing: take five slow breaths.\n2. Reach Out: call someone you trust.\n3. no heading here\nplain prose is ignored";
        let tips = parse_tips(raw);
        assert_eq!(tips.len(), 3);
        assert_eq!(tips[0].title, "MINDFUL BREATHING");
        assert_eq!(tips[0].body, "take five slow breaths.");
        assert_eq!(tips[2].title, FALLBACK_TIP_HEADING);
        assert_eq!(tips[2].body, "no heading here");
    }

    #[test]
    fn test_tips_truncated_to_five() {
        let raw = (1..=8)
            .map(|i| format!("{}. Tip {}: body {}", i, i, i))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_tips(&raw).len(), 5);
    }

    #[test]
    fn test_extract_json_arrays_finds_separate_blocks() {
        let raw = r#"text [1, 2] more ["a", "b [x]"] tail"#;
        let arrays = extract_json_arrays(raw);
        assert_eq!(arrays, vec!["[1, 2]", r#"["a", "b [x]"]"#]);
    }

    #[test]
    fn test_extract_json_arrays_nested() {
        let arrays = extract_json_arrays("[[1, 2], [3]]");
        assert_eq!(arrays, vec!["[[1, 2], [3]]"]);
    }
}
