// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use crate::engine::RainConfig;
use crate::error::{require_range, RainError};
use crate::glyphs::{charset_from_str, parse_char_ranges, GlyphAlphabet, PRESETS};
use crate::paint::Rgb;
use crate::palette::ColorMode;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  rainfield --fps 60 --cell-px 14 --fade 0.05 --reset-gate 0.975 --step 1 --color 00FF41 --charset auto";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        DEFAULT_PARAMS_USAGE.replacen(
            "DEFAULT PARAMS USAGE:",
            "\x1b[1;36mDEFAULT PARAMS USAGE:\x1b[0m",
            1,
        )
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

pub fn locale_is_utf8(lang: &str) -> bool {
    lang.to_ascii_uppercase().contains("UTF")
}

/// Character-type locale by POSIX precedence: `LC_ALL`, `LC_CTYPE`, `LANG`.
/// The first non-empty value wins.
pub fn effective_locale<'a>(
    lc_all: Option<&'a str>,
    lc_ctype: Option<&'a str>,
    lang: Option<&'a str>,
) -> &'a str {
    [lc_all, lc_ctype, lang]
        .into_iter()
        .flatten()
        .find(|v| !v.is_empty())
        .unwrap_or("")
}

pub fn detect_color_mode(colorterm: &str, term: &str) -> ColorMode {
    let colorterm = colorterm.to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }
    let term = term.to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }
    ColorMode::Color16
}

#[derive(Parser, Debug, Clone)]
#[command(name = "rainfield", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "ANIMATION",
        help = "Display refresh rate to pace frames at (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "cell-px",
        default_value_t = 14,
        help_heading = "ANIMATION",
        help = "Glyph cell size in virtual pixels (min 4 max 64)"
    )]
    pub cell_px: u32,

    #[arg(
        long = "fade",
        default_value_t = 0.05,
        help_heading = "ANIMATION",
        help = "Opacity of the per-frame black overlay (min 0.001 max 1)"
    )]
    pub fade: f32,

    #[arg(
        long = "reset-gate",
        default_value_t = 0.975,
        help_heading = "ANIMATION",
        help = "Off-screen columns restart when a random draw exceeds this (min 0 max 1)"
    )]
    pub reset_gate: f64,

    #[arg(
        long = "step",
        default_value_t = 1.0,
        help_heading = "ANIMATION",
        help = "Rows fallen per frame (min 0.01 max 16)"
    )]
    pub step: f64,

    #[arg(
        long = "seed",
        help_heading = "ANIMATION",
        help = "Seed the random source for a repeatable run"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 'c',
        long = "color",
        default_value = "00FF41",
        help_heading = "APPEARANCE",
        help = "Glyph color as RRGGBB hex"
    )]
    pub color: String,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: detected from COLORTERM/TERM"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "charset",
        default_value = "auto",
        help_heading = "CHARSET",
        help = "Charset preset (see --list-charsets)"
    )]
    pub charset: String,

    #[arg(
        long = "chars",
        help_heading = "CHARSET",
        help = "Extra hex codepoint ranges: LOW,HIGH[,LOW,HIGH...]"
    )]
    pub chars: Option<String>,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Write diagnostics to this file (filter with RUST_LOG)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "perf-stats",
        help_heading = "GENERAL",
        help = "Print a frame summary on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "list-charsets",
        help_heading = "HELP",
        help = "List available charset presets and exit"
    )]
    pub list_charsets: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

impl Args {
    pub fn rain_config(&self) -> Result<RainConfig, RainError> {
        Ok(RainConfig {
            glyph_cell_px: require_range("--cell-px", self.cell_px as f64, 4.0, 64.0)? as u32,
            trail_alpha: require_range("--fade", self.fade as f64, 0.001, 1.0)? as f32,
            glyph_color: Rgb::from_hex(&self.color)?,
            reset_threshold: require_range("--reset-gate", self.reset_gate, 0.0, 1.0)?,
            descent_step: require_range("--step", self.step, 0.01, 16.0)?,
        })
    }

    pub fn target_fps(&self) -> Result<f64, RainError> {
        require_range("--fps", self.fps, 1.0, 240.0)
    }

    /// `None` when the run has no time limit.
    pub fn duration_secs(&self) -> Result<Option<f64>, RainError> {
        match self.duration {
            Some(s) if !s.is_finite() => Err(RainError::out_of_range("--duration", s, 0.1, 86400.0)),
            Some(s) if s > 0.0 => require_range("--duration", s, 0.1, 86400.0).map(Some),
            _ => Ok(None),
        }
    }

    /// `None` leaves the choice to terminal detection.
    pub fn forced_color_mode(&self) -> Result<Option<ColorMode>, RainError> {
        let Some(m) = self.colormode else {
            return Ok(None);
        };
        let mode = match m {
            0 => ColorMode::Mono,
            16 => ColorMode::Color16,
            8 | 256 => ColorMode::Color256,
            24 | 32 => ColorMode::TrueColor,
            _ => return Err(RainError::out_of_range("--colormode", m as f64, 0.0, 32.0)),
        };
        Ok(Some(mode))
    }

    pub fn alphabet(&self, utf8: bool) -> Result<GlyphAlphabet, RainError> {
        let charset = charset_from_str(&self.charset, utf8)?;
        let ranges = match &self.chars {
            Some(spec) => parse_char_ranges(spec)?,
            None => Vec::new(),
        };
        Ok(GlyphAlphabet::from_charset(charset, &ranges))
    }
}

pub fn print_list_charsets() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE CHARSET PRESETS:\x1b[0m");
    } else {
        println!("AVAILABLE CHARSET PRESETS:");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    for (name, desc) in PRESETS {
        println!("{:<12} {}", name, desc);
    }
}
