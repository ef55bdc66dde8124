//! Story segmentation - splits multi-story text into narration units.

use crate::error::{Error, Result};
use crate::types::NarrationUnit;

/// Lines whose trimmed content starts with this token delimit stories.
pub const HEADING: &str = "STORY";

/// Split `source` into narration units.
///
/// Each unit is the newline-joined, trimmed, non-empty lines between two
/// heading lines (or a heading and end of input). Text before the first
/// heading is discarded and units without content are dropped.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] if no unit has content.
pub fn parse_stories(source: &str) -> Result<Vec<NarrationUnit>> {
    let mut units = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in source.lines().map(str::trim) {
        if line.starts_with(HEADING) {
            flush(&mut units, current.replace(Vec::new()));
        } else if let Some(lines) = current.as_mut()
            && !line.is_empty()
        {
            lines.push(line);
        }
    }
    flush(&mut units, current);

    if units.is_empty() {
        return Err(Error::EmptyInput);
    }

    tracing::debug!(count = units.len(), "parsed narration units");

    Ok(units)
}

fn flush(units: &mut Vec<NarrationUnit>, lines: Option<Vec<&str>>) {
    if let Some(lines) = lines
        && !lines.is_empty()
    {
        units.push(NarrationUnit::new(lines.join("\n")));
    }
}

/// Join units back into source text with numbered heading lines.
///
/// `parse_stories(&join_stories(&units))` reproduces `units`.
pub fn join_stories(units: &[NarrationUnit]) -> String {
    units
        .iter()
        .zip(1..)
        .map(|(unit, i)| format!("{HEADING} {i}\n{}\n", unit.text))
        .collect()
}
