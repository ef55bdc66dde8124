//! Configuration types for resolved CLI arguments.
//!
//! Args structs (for CLI parsing) stay in cli.rs and the subcommand modules.

use crate::ass::AssStyle;
use crate::cli::CaptionArgs;
use eyre::{Result, WrapErr};
use storyreel_core::pipeline::CaptionSettings;

/// Resolved caption engine settings and style.
///
/// Converted from CaptionArgs via TryFrom, which rejects inconsistent
/// engine flags before any work starts.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionConfig {
    pub settings: CaptionSettings,
    pub style: AssStyle,
}

impl TryFrom<CaptionArgs> for CaptionConfig {
    type Error = eyre::Error;

    fn try_from(args: CaptionArgs) -> Result<Self> {
        let settings = CaptionSettings {
            pacing: args.pacing,
            segmenter: args.segmenter,
            layout: args.layout,
        };
        settings.validate().wrap_err("invalid caption settings")?;

        let style = AssStyle::try_from(args.style).wrap_err("invalid caption style")?;

        Ok(Self { settings, style })
    }
}
