//! ASS (Advanced SubStation Alpha) caption track generation.
//!
//! Produces the subtitle file ffmpeg burns into the final video. Highlight
//! cues color their current word; plain cues render as-is.

use eyre::{Result, ensure};
use std::fmt::Write;
use storyreel_core::types::RenderCue;

/// Vertical caption placement.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Position {
    Top,
    #[default]
    Center,
    Bottom,
}

impl Position {
    /// ASS numpad alignment (horizontally centered).
    fn alignment(self) -> u8 {
        match self {
            Position::Top => 8,
            Position::Center => 5,
            Position::Bottom => 2,
        }
    }
}

/// Caption style flags. Colors are `RRGGBB` hex, with or without `#`.
#[derive(clap::Args, Clone, Debug, PartialEq)]
pub struct StyleArgs {
    /// Caption font family
    #[arg(long, default_value = "Arial")]
    pub font: String,

    /// Font size in pixels at the output resolution
    #[arg(long, default_value_t = 96)]
    pub font_size: u32,

    /// Text color
    #[arg(long, default_value = "FFFFFF")]
    pub text_color: String,

    /// Color of the highlighted word
    #[arg(long, default_value = "FFD400")]
    pub highlight_color: String,

    /// Outline color
    #[arg(long, default_value = "000000")]
    pub outline_color: String,

    /// Outline width in pixels
    #[arg(long, default_value_t = 5)]
    pub outline: u32,

    /// Caption placement
    #[arg(long, value_enum, default_value_t = Position::Center)]
    pub position: Position,

    /// Vertical margin in pixels
    #[arg(long, default_value_t = 200)]
    pub margin: u32,

    /// Fade-in in milliseconds
    #[arg(long, default_value_t = 80)]
    pub fade_in: u32,

    /// Fade-out in milliseconds
    #[arg(long, default_value_t = 80)]
    pub fade_out: u32,
}

impl Default for StyleArgs {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            font_size: 96,
            text_color: "FFFFFF".to_string(),
            highlight_color: "FFD400".to_string(),
            outline_color: "000000".to_string(),
            outline: 5,
            position: Position::Center,
            margin: 200,
            fade_in: 80,
            fade_out: 80,
        }
    }
}

/// Resolved style with colors in ASS `&H00BBGGRR` form.
#[derive(Clone, Debug, PartialEq)]
pub struct AssStyle {
    pub font: String,
    pub font_size: u32,
    pub text_color: String,
    pub highlight_color: String,
    pub outline_color: String,
    pub outline: u32,
    pub alignment: u8,
    pub margin: u32,
    pub fade_in: u32,
    pub fade_out: u32,
}

impl TryFrom<StyleArgs> for AssStyle {
    type Error = eyre::Error;

    fn try_from(args: StyleArgs) -> Result<Self> {
        ensure!(args.font_size > 0, "font size must be positive");

        Ok(Self {
            font: args.font,
            font_size: args.font_size,
            text_color: ass_color(&args.text_color)?,
            highlight_color: ass_color(&args.highlight_color)?,
            outline_color: ass_color(&args.outline_color)?,
            outline: args.outline,
            alignment: args.position.alignment(),
            margin: args.margin,
            fade_in: args.fade_in,
            fade_out: args.fade_out,
        })
    }
}

impl AssStyle {
    fn to_style_line(&self) -> String {
        format!(
            "Style: Default,{font},{size},{primary},{primary},{outline},&H80000000,-1,0,0,0,100,100,0,0,1,{outline_w},0,{align},60,60,{mv},1",
            font = self.font,
            size = self.font_size,
            primary = self.text_color,
            outline = self.outline_color,
            outline_w = self.outline,
            align = self.alignment,
            mv = self.margin,
        )
    }
}

/// Convert `RRGGBB` (optionally `#`-prefixed) to ASS `&H00BBGGRR`.
pub fn ass_color(hex: &str) -> Result<String> {
    let hex = hex.trim_start_matches('#');
    ensure!(
        hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        "invalid color {hex:?}, expected RRGGBB"
    );

    let (r, g, b) = (&hex[0..2], &hex[2..4], &hex[4..6]);
    Ok(format!("&H00{b}{g}{r}").to_uppercase())
}

/// Generate a complete ASS file for `cues` at `play_res` (width, height).
pub fn generate_ass_file(cues: &[RenderCue], style: &AssStyle, play_res: (u32, u32)) -> String {
    let mut output = String::new();

    // Writing to a String is infallible
    let _ = write_ass(&mut output, cues, style, play_res);

    output
}

fn write_ass(
    out: &mut String,
    cues: &[RenderCue],
    style: &AssStyle,
    play_res: (u32, u32),
) -> std::fmt::Result {
    writeln!(out, "[Script Info]")?;
    writeln!(out, "ScriptType: v4.00+")?;
    writeln!(out, "PlayResX: {}", play_res.0)?;
    writeln!(out, "PlayResY: {}", play_res.1)?;
    writeln!(out, "WrapStyle: 0")?;
    writeln!(out, "ScaledBorderAndShadow: yes")?;
    writeln!(out)?;

    writeln!(out, "[V4+ Styles]")?;
    writeln!(
        out,
        "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding"
    )?;
    writeln!(out, "{}", style.to_style_line())?;
    writeln!(out)?;

    writeln!(out, "[Events]")?;
    writeln!(
        out,
        "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text"
    )?;

    for cue in cues {
        writeln!(
            out,
            "Dialogue: 0,{start},{end},Default,,0,0,0,,{fade}{text}",
            start = format_ass_timestamp(cue.start()),
            end = format_ass_timestamp(cue.end()),
            fade = fade_tag(cue, style),
            text = cue_text(cue, style),
        )?;
    }

    Ok(())
}

/// Fade tag for a cue.
///
/// Highlight cues of one line are shown back to back, so only the first word
/// fades in and only the last word fades out.
fn fade_tag(cue: &RenderCue, style: &AssStyle) -> String {
    let (fade_in, fade_out) = match cue.highlight_index {
        None => (style.fade_in, style.fade_out),
        Some(i) => {
            let last = cue.segment.words.len().saturating_sub(1);
            (
                if i == 0 { style.fade_in } else { 0 },
                if i == last { style.fade_out } else { 0 },
            )
        }
    };

    if fade_in == 0 && fade_out == 0 {
        String::new()
    } else {
        format!("{{\\fad({fade_in},{fade_out})}}")
    }
}

fn cue_text(cue: &RenderCue, style: &AssStyle) -> String {
    let Some(highlight) = cue.highlight_index else {
        return escape_ass_text(&cue.segment.text);
    };

    let mut text = String::new();
    for (i, word) in cue.segment.words.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        if i == highlight {
            text.push_str(&format!(
                "{{\\1c{}&}}{}{{\\1c{}&}}",
                style.highlight_color,
                escape_ass_text(word),
                style.text_color
            ));
        } else {
            text.push_str(&escape_ass_text(word));
        }
    }
    text
}

/// Format seconds as ASS timestamp `H:MM:SS.cc`.
fn format_ass_timestamp(secs: f32) -> String {
    let total_cs = (f64::from(secs.max(0.0)) * 100.0).round() as u64;
    let cs = total_cs % 100;
    let total_secs = total_cs / 100;
    let s = total_secs % 60;
    let m = (total_secs / 60) % 60;
    let h = total_secs / 3600;
    format!("{h}:{m:02}:{s:02}.{cs:02}")
}

/// Braces open override blocks in ASS; newlines become hard breaks.
fn escape_ass_text(text: &str) -> String {
    text.replace('{', "(")
        .replace('}', ")")
        .replace('\n', "\\N")
}
