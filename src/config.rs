// Copyright (c) 2026 rezky_nightky

use std::fmt::Display;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::color::ColorMode;
use crate::schedule::Intervals;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  raingrid --cell-width 2 --spawn-ms 600 --fall-ms 200 --reset-ms 3600 --color-bg black";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("failed to apply {name} {value} (min {min} max {max})")]
    OutOfRange {
        name: &'static str,
        value: String,
        min: String,
        max: String,
    },
    #[error("failed to apply {name} {value} (must be a finite number)")]
    NotFinite { name: &'static str, value: f64 },
    #[error("invalid --colormode: {0} (allowed: 0,16,8,256,24,32)")]
    ColorMode(u16),
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "raingrid",
    version,
    about = "Colored droplets falling down a terminal grid",
    before_help = DEFAULT_PARAMS_USAGE
)]
pub struct Args {
    #[arg(
        long = "rows",
        help_heading = "GRID",
        help = "Fixed grid rows (min 1 max 1000). Default: terminal height"
    )]
    pub rows: Option<u16>,

    #[arg(
        long = "cols",
        help_heading = "GRID",
        help = "Fixed grid columns (min 1 max 1000). Default: terminal width / cell width"
    )]
    pub cols: Option<u16>,

    #[arg(
        short = 'w',
        long = "cell-width",
        default_value_t = 2,
        help_heading = "GRID",
        help = "Terminal columns per grid cell (min 1 max 8)"
    )]
    pub cell_width: u16,

    #[arg(
        long = "spawn-ms",
        default_value_t = 600,
        help_heading = "TIMING",
        help = "Milliseconds between droplet waves (min 10 max 60000)"
    )]
    pub spawn_ms: u64,

    #[arg(
        long = "fall-ms",
        default_value_t = 200,
        help_heading = "TIMING",
        help = "Milliseconds between one-row falls (min 10 max 60000)"
    )]
    pub fall_ms: u64,

    #[arg(
        long = "reset-ms",
        default_value_t = 3600,
        help_heading = "TIMING",
        help = "Milliseconds between column occupancy resets (min 10 max 600000)"
    )]
    pub reset_ms: u64,

    #[arg(
        long = "duration",
        help_heading = "TIMING",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background of empty cells (black, default-background)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the random source for a repeatable rain"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 'v',
        long = "verbose",
        help_heading = "GENERAL",
        help = "Log settings and a run summary to stderr"
    )]
    pub verbose: bool,

    #[arg(
        short = 'i',
        long = "info",
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub rows: Option<u16>,
    pub cols: Option<u16>,
    pub cell_width: u16,
    pub intervals: Intervals,
    pub color_mode: ColorMode,
    pub color_bg: ColorBg,
    pub seed: Option<u64>,
    pub duration: Option<Duration>,
    pub verbose: bool,
}

fn require_range<T>(name: &'static str, v: T, min: T, max: T) -> Result<T, ConfigError>
where
    T: PartialOrd + Display + Copy,
{
    if v < min || v > max {
        return Err(ConfigError::OutOfRange {
            name,
            value: v.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(v)
}

fn color_mode_from_arg(forced: Option<u16>) -> Result<ColorMode, ConfigError> {
    match forced {
        None => Ok(ColorMode::detect()),
        Some(0) => Ok(ColorMode::Mono),
        Some(16) => Ok(ColorMode::Color16),
        Some(8 | 256) => Ok(ColorMode::Color256),
        Some(24 | 32) => Ok(ColorMode::TrueColor),
        Some(other) => Err(ConfigError::ColorMode(other)),
    }
}

fn duration_from_arg(secs: Option<f64>) -> Result<Option<Duration>, ConfigError> {
    let Some(s) = secs else {
        return Ok(None);
    };
    if !s.is_finite() {
        return Err(ConfigError::NotFinite {
            name: "--duration",
            value: s,
        });
    }
    if s <= 0.0 {
        return Ok(None);
    }
    let s = require_range("--duration", s, 0.1, 86400.0)?;
    Ok(Some(Duration::from_secs_f64(s)))
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let rows = args
            .rows
            .map(|r| require_range("--rows", r, 1, 1000))
            .transpose()?;
        let cols = args
            .cols
            .map(|c| require_range("--cols", c, 1, 1000))
            .transpose()?;
        let cell_width = require_range("--cell-width", args.cell_width, 1, 8)?;

        let intervals = Intervals {
            spawn: Duration::from_millis(require_range("--spawn-ms", args.spawn_ms, 10, 60000)?),
            fall: Duration::from_millis(require_range("--fall-ms", args.fall_ms, 10, 60000)?),
            reset: Duration::from_millis(require_range("--reset-ms", args.reset_ms, 10, 600000)?),
        };

        Ok(Self {
            rows,
            cols,
            cell_width,
            intervals,
            color_mode: color_mode_from_arg(args.colormode)?,
            color_bg: args.color_bg,
            seed: args.seed,
            duration: duration_from_arg(args.duration)?,
            verbose: args.verbose,
        })
    }

    /// Grid dimensions `(rows, cols)` for a terminal of `term_w` x `term_h`.
    pub fn grid_size(&self, term_w: u16, term_h: u16) -> (u16, u16) {
        let rows = self.rows.unwrap_or(term_h);
        let cols = self.cols.unwrap_or(term_w / self.cell_width.max(1));
        (rows, cols)
    }

    /// Interval orderings that still run but pace the rain oddly.
    pub fn interval_warnings(&self) -> Vec<String> {
        let Intervals { spawn, fall, reset } = self.intervals;
        let mut out = Vec::new();
        if fall >= spawn {
            out.push(format!(
                "--fall-ms {} is not shorter than --spawn-ms {}; waves will overlap",
                fall.as_millis(),
                spawn.as_millis()
            ));
        }
        if reset <= spawn {
            out.push(format!(
                "--reset-ms {} is not longer than --spawn-ms {}; columns free up before every wave",
                reset.as_millis(),
                spawn.as_millis()
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(argv: &[&str]) -> Result<Settings, ConfigError> {
        let mut full = vec!["raingrid"];
        full.extend_from_slice(argv);
        let args = Args::try_parse_from(full).unwrap();
        Settings::from_args(&args)
    }

    #[test]
    fn defaults_match_reference_pacing() {
        let s = settings(&["--colormode", "24"]).unwrap();
        assert_eq!(s.intervals, Intervals::default());
        assert_eq!(s.cell_width, 2);
        assert_eq!(s.color_mode, ColorMode::TrueColor);
        assert_eq!(s.color_bg, ColorBg::Black);
        assert_eq!(s.duration, None);
        assert!(s.interval_warnings().is_empty());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = settings(&["--fall-ms", "5"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to apply --fall-ms 5 (min 10 max 60000)"
        );
        assert!(matches!(
            settings(&["--cell-width", "0"]),
            Err(ConfigError::OutOfRange { name: "--cell-width", .. })
        ));
        assert!(settings(&["--rows", "0"]).is_err());
    }

    #[test]
    fn colormode_aliases() {
        assert_eq!(settings(&["--colormode", "0"]).unwrap().color_mode, ColorMode::Mono);
        assert_eq!(settings(&["--colormode", "16"]).unwrap().color_mode, ColorMode::Color16);
        assert_eq!(settings(&["--colormode", "256"]).unwrap().color_mode, ColorMode::Color256);
        assert_eq!(settings(&["--colormode", "32"]).unwrap().color_mode, ColorMode::TrueColor);
        assert_eq!(settings(&["--colormode", "7"]), Err(ConfigError::ColorMode(7)));
    }

    #[test]
    fn non_positive_duration_disables_limit() {
        assert_eq!(settings(&["--duration", "0"]).unwrap().duration, None);
        assert_eq!(
            settings(&["--duration", "1.5"]).unwrap().duration,
            Some(Duration::from_millis(1500))
        );
        assert!(settings(&["--duration", "0.01"]).is_err());
    }

    #[test]
    fn grid_size_follows_terminal_unless_fixed() {
        let s = settings(&["--cell-width", "3"]).unwrap();
        assert_eq!(s.grid_size(80, 24), (24, 26));

        let s = settings(&["--rows", "10", "--cols", "12"]).unwrap();
        assert_eq!(s.grid_size(80, 24), (10, 12));
        assert_eq!(s.grid_size(20, 5), (10, 12));
    }

    #[test]
    fn odd_interval_orderings_warn() {
        let s = settings(&["--fall-ms", "700", "--reset-ms", "500"]).unwrap();
        assert_eq!(s.interval_warnings().len(), 2);
    }
}
