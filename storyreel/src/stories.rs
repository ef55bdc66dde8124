//! Stories subcommand - list the narration units of a stories file.

use eyre::{Result, WrapErr};
use std::path::PathBuf;
use storyreel_core::story::parse_stories;
use storyreel_core::types::NarrationUnit;

const PREVIEW_CHARS: usize = 60;

/// CLI arguments for listing stories.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Stories file, one `STORY` heading per story
    pub path: PathBuf,
}

pub fn execute(args: Args) -> Result<()> {
    let source = std::fs::read_to_string(&args.path)
        .wrap_err_with(|| format!("failed to read stories: {:?}", args.path.display()))?;

    let units = parse_stories(&source)?;

    tracing::debug!(stories = units.len(), "parsed stories");

    for (unit, number) in units.iter().zip(1..) {
        println!("{}", summary_line(number, unit));
    }

    Ok(())
}

/// `  1   128 words  First line of the story...`
fn summary_line(number: usize, unit: &NarrationUnit) -> String {
    let first = unit.lines().next().unwrap_or_default();

    let preview = if first.chars().count() > PREVIEW_CHARS {
        let cut: String = first.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut.trim_end())
    } else {
        first.to_string()
    };

    format!("{number:>3} {:>5} words  {preview}", unit.word_count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_short_story() {
        let unit = NarrationUnit::new("Hello there\nSecond line");
        assert_eq!(summary_line(1, &unit), "  1     4 words  Hello there");
    }

    #[test]
    fn truncates_long_first_line() {
        let unit = NarrationUnit::new("word ".repeat(30).trim_end());

        let line = summary_line(12, &unit);

        assert!(line.starts_with(" 12    30 words  word word"));
        assert!(line.ends_with("..."));
        assert!(line.chars().count() < 90);
    }
}
