//! storyreel-core: caption timing and layout engine for narrated story videos.
//!
//! Turns narration text plus an audio duration (or word timestamps from a
//! transcriber) into a track of caption cues ready for compositing.
//!
//! # Architecture
//!
//! Four pure stages, leaves first:
//!
//! - [`story`]: splits multi-story text into [`types::NarrationUnit`]s
//! - [`pacing`]: plans per-word timing when no real timestamps exist
//! - [`segment`]: groups timed words into [`types::CaptionSegment`]s
//! - [`layout`]: maps segments or words to [`types::RenderCue`]s
//!
//! [`pipeline::StoryPipeline`] chains the stages per story and keeps a batch
//! going when a single story fails.
//!
//! Speech synthesis, transcription and video compositing stay outside the
//! core behind the seams in [`traits`].
//!
//! # Quick Start
//!
//! ```
//! use storyreel_core::layout::{Layout, LayoutMode};
//! use storyreel_core::pacing::Pacing;
//! use storyreel_core::segment::Segmenter;
//!
//! # fn main() -> storyreel_core::error::Result<()> {
//! let units = storyreel_core::story::parse_stories("STORY\nOnce upon a time")?;
//!
//! // 2.0s of narration, no word timestamps available
//! let timeline = Pacing::default().plan(2.0, &units[0].text, Vec::new())?;
//!
//! let layout = Layout::new(LayoutMode::Segments, 5);
//! let cues = layout.cues(&timeline, &Segmenter::default())?;
//! assert!(!cues.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod layout;
pub mod pacing;
pub mod pipeline;
pub mod segment;
pub mod story;
pub mod traits;
pub mod types;
