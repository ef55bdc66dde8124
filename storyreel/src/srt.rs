//! SRT subtitle conversion utilities.
//!
//! Converts render cues into SRT subtitles. In highlight mode the current
//! word is wrapped in `<b>` tags, which most players honor.

use srtlib::{Subtitle, Timestamp};
use storyreel_core::types::RenderCue;

/// Convert RenderCues to SRT Subtitles.
pub fn to_subtitles(cues: &[RenderCue]) -> Vec<Subtitle> {
    cues.iter()
        .zip(1..)
        .map(|(c, i)| create_subtitle(c, i))
        .collect()
}

fn create_subtitle(cue: &RenderCue, index: usize) -> Subtitle {
    Subtitle::new(
        index,
        secs_to_timestamp(cue.start()),
        secs_to_timestamp(cue.end()),
        cue_text(cue),
    )
}

fn cue_text(cue: &RenderCue) -> String {
    match cue.highlight_index {
        None => cue.segment.text.clone(),
        Some(highlight) => cue
            .segment
            .words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                if i == highlight {
                    format!("<b>{w}</b>")
                } else {
                    w.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Convert seconds to SRT Timestamp
fn secs_to_timestamp(secs: f32) -> Timestamp {
    Timestamp::from_milliseconds((secs.max(0.0) * 1000.0).round() as u32)
}

/// Format subtitles as SRT file content.
pub fn display_subtitles(subtitles: &[Subtitle]) -> String {
    subtitles
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Display preview of subtitles (first and last entries).
pub fn preview_subtitles(subtitles: &[Subtitle], head_count: usize, tail_count: usize) -> String {
    let total = subtitles.len();

    if total <= head_count + tail_count {
        display_subtitles(subtitles)
    } else {
        let mut out = Vec::new();
        out.extend(subtitles[..head_count].iter().map(|s| s.to_string()));
        out.push("...".to_string());
        out.extend(subtitles[total - tail_count..].iter().map(|s| s.to_string()));
        out.join("\n\n")
    }
}
