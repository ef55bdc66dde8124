//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use eyre::Result;
use storyreel_core::layout::Layout;
use storyreel_core::pacing::Pacing;
use storyreel_core::segment::Segmenter;

#[derive(Debug, Parser)]
#[command(name = "reel")]
#[command(about = "Turn text stories into captioned vertical videos")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render one captioned video per story
    Make(crate::make::Args),

    /// Generate a caption track for one narration
    Cap(crate::cap::Args),

    /// List the stories found in a source file
    Stories(crate::stories::Args),
}

/// Caption engine and style flags shared by subcommands.
#[derive(clap::Args, Debug)]
pub struct CaptionArgs {
    #[command(flatten, next_help_heading = "Pacing")]
    pub pacing: Pacing,

    #[command(flatten, next_help_heading = "Segmentation")]
    pub segmenter: Segmenter,

    #[command(flatten, next_help_heading = "Layout")]
    pub layout: Layout,

    #[command(flatten, next_help_heading = "Style")]
    pub style: crate::ass::StyleArgs,
}

/// Execute CLI command - separated for testing.
pub fn run_cli(cli: Cli) -> Result<()> {
    tracing::debug!(?cli, "parsed arguments");

    match cli.command {
        Commands::Make(args) => crate::make::execute(args.try_into()?),
        Commands::Cap(args) => crate::cap::execute(args.try_into()?),
        Commands::Stories(args) => crate::stories::execute(args),
    }
}
