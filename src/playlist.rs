//! Clip request preparation for the playlist generator
//!
//! The playlist generator is an external collaborator that produces one
//! music clip per request. Segments sharing a pace and genre can reuse the
//! same clip, so requests are deduplicated on that key, preserving segment
//! order. Prompt and tag strings are assembled here so callers hand the
//! generator a complete request.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;

use crate::models::{Genre, Segment};

/// How much longer than the segment itself a generated clip should run,
/// leaving headroom for crossfades
const CLIP_LENGTH_FACTOR: Decimal = dec!(1.5);

/// One music generation request, keyed by (pace, genre)
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRequest {
    pub pace_seconds_per_km: Decimal,
    pub genre: Genre,
    pub tempo_bpm: u16,
    pub prompt: String,
    pub tags: String,
}

/// Deduplicate segments into generation requests. Two segments with the
/// same pace and genre share one clip; order follows the first occurrence.
pub fn clip_requests(segments: &[Segment]) -> Vec<ClipRequest> {
    let mut seen: HashSet<(Decimal, Genre)> = HashSet::new();
    let mut requests = Vec::new();

    for segment in segments {
        let key = (segment.pace_seconds_per_km, segment.genre);
        if !seen.insert(key) {
            continue;
        }
        requests.push(ClipRequest {
            pace_seconds_per_km: segment.pace_seconds_per_km,
            genre: segment.genre,
            tempo_bpm: segment.tempo_bpm,
            prompt: build_prompt(segment),
            tags: build_tags(segment),
        });
    }

    requests
}

/// Format a pace in seconds per kilometer as "m:ss"
pub fn format_pace(pace_seconds_per_km: Decimal) -> String {
    let total_seconds = pace_seconds_per_km.round().to_i64().unwrap_or(0).max(0);
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

fn build_prompt(segment: &Segment) -> String {
    let mut prompt = format!(
        "A {} song with {} BPM tempo for running. The song should be energetic \
         and motivating for a runner maintaining {} per kilometer pace.",
        segment.genre,
        segment.tempo_bpm,
        format_pace(segment.pace_seconds_per_km),
    );
    if let Some(duration) = segment.duration_seconds {
        let clip_seconds = (duration * CLIP_LENGTH_FACTOR).round();
        prompt.push_str(&format!(
            " The song should be around {} seconds long.",
            clip_seconds.normalize()
        ));
    }
    prompt
}

fn build_tags(segment: &Segment) -> String {
    format!(
        "{}, {} bpm, energetic, running, motivational",
        segment.genre, segment.tempo_bpm
    )
}
