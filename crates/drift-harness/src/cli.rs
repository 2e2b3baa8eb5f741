#![forbid(unsafe_code)]

//! Command-line argument parsing for the harness binary.
//!
//! Parses args manually, `--flag=value` style.

use std::path::PathBuf;

use drift_core::{ThemeMode, Viewport};
use drift_render::MAX_SURFACE_DIMENSION;

use crate::error::HarnessError;
use crate::scenario::Scenario;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
drift-harness - headless runner for the drift backdrop

USAGE:
    drift-harness [OPTIONS]

OPTIONS:
    --name=NAME          Scenario name used in logs (default: default)
    --width=N            Viewport width in pixels, at most 8192 (default: 1280)
    --height=N           Viewport height in pixels, at most 8192 (default: 720)
    --theme=THEME        Starting theme: 'dark' (default) or 'light'
    --ticks=N            Number of ticks to run (default: 120)
    --frame-ms=N         Simulated milliseconds per tick (default: 16)
    --toggle-at=TICK     Flip the theme at TICK
    --resize-at=TICK:WxH Resize the viewport at TICK
    --sweep              Move the pointer along a fixed curve
    --realtime           Run on the wall clock, sleeping --frame-ms per tick
    --seed=N             RNG seed (default: 0, or the config file's seed)
    --config=FILE        Engine options as JSON
    --out=FILE           Write the JSONL frame log to FILE instead of stdout
    --ppm=FILE           Write the final frame as a binary PPM
    --golden=DIR         Check checksums against DIR/tests/golden/NAME.checksums
    --log-json           Emit diagnostics as JSON on stderr
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    DRIFT_LOG            Diagnostic filter (default: info)
    BLESS=1              With --golden, rewrite the golden file instead";

/// Parsed options for a run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Opts {
    pub scenario: Scenario,
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub ppm: Option<PathBuf>,
    pub golden: Option<PathBuf>,
    pub realtime: bool,
    pub log_json: bool,
}

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Cli {
    Run(Opts),
    Help,
    Version,
}

impl Cli {
    /// Parse arguments, excluding the program name.
    pub fn parse_from<I, S>(args: I) -> Result<Self, HarnessError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut opts = Opts::default();
        let mut width = opts.scenario.viewport.width;
        let mut height = opts.scenario.viewport.height;

        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(Cli::Help),
                "--version" | "-V" => return Ok(Cli::Version),
                "--sweep" => opts.scenario.pointer_sweep = true,
                "--log-json" => opts.log_json = true,
                "--realtime" => opts.realtime = true,
                other => {
                    if let Some(val) = other.strip_prefix("--name=") {
                        opts.scenario.name = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--width=") {
                        width = parse_num("--width", val)?;
                    } else if let Some(val) = other.strip_prefix("--height=") {
                        height = parse_num("--height", val)?;
                    } else if let Some(val) = other.strip_prefix("--theme=") {
                        opts.scenario.theme = val.parse::<ThemeMode>().map_err(|e| {
                            HarnessError::Usage(format!("Invalid --theme value: {e}"))
                        })?;
                    } else if let Some(val) = other.strip_prefix("--ticks=") {
                        opts.scenario.ticks = parse_num("--ticks", val)?;
                    } else if let Some(val) = other.strip_prefix("--frame-ms=") {
                        opts.scenario.frame_ms = parse_num("--frame-ms", val)?;
                    } else if let Some(val) = other.strip_prefix("--toggle-at=") {
                        opts.scenario.toggle_theme_at = Some(parse_num("--toggle-at", val)?);
                    } else if let Some(val) = other.strip_prefix("--resize-at=") {
                        opts.scenario.resize_at = Some(parse_resize(val)?);
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        opts.seed = Some(parse_num("--seed", val)?);
                    } else if let Some(val) = other.strip_prefix("--config=") {
                        opts.config = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--out=") {
                        opts.out = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--ppm=") {
                        opts.ppm = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--golden=") {
                        opts.golden = Some(PathBuf::from(val));
                    } else {
                        return Err(HarnessError::Usage(format!(
                            "Unknown argument: {other}\nRun with --help for usage information."
                        )));
                    }
                }
            }
        }

        opts.scenario.viewport = checked_viewport("--width/--height", width, height)?;
        if let Some((tick, vp)) = opts.scenario.resize_at {
            let vp = checked_viewport("--resize-at", vp.width, vp.height)?;
            opts.scenario.resize_at = Some((tick, vp));
        }
        Ok(Cli::Run(opts))
    }
}

fn parse_num<T: std::str::FromStr>(flag: &str, val: &str) -> Result<T, HarnessError> {
    val.parse()
        .map_err(|_| HarnessError::Usage(format!("Invalid {flag} value: {val}")))
}

fn checked_viewport(flag: &str, width: u32, height: u32) -> Result<Viewport, HarnessError> {
    if width > MAX_SURFACE_DIMENSION || height > MAX_SURFACE_DIMENSION {
        return Err(HarnessError::Usage(format!(
            "Invalid {flag} value: {width}x{height} exceeds {MAX_SURFACE_DIMENSION} pixels per side"
        )));
    }
    Ok(Viewport::new(width, height))
}

/// `TICK:WxH`
fn parse_resize(val: &str) -> Result<(u32, Viewport), HarnessError> {
    let bad = || HarnessError::Usage(format!("Invalid --resize-at value: {val} (expected TICK:WxH)"));
    let (tick, dims) = val.split_once(':').ok_or_else(bad)?;
    let (w, h) = dims.split_once(['x', 'X']).ok_or_else(bad)?;
    let tick = tick.parse().map_err(|_| bad())?;
    let w = w.parse().map_err(|_| bad())?;
    let h = h.parse().map_err(|_| bad())?;
    Ok((tick, Viewport::new(w, h)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_opts(args: &[&str]) -> Opts {
        match Cli::parse_from(args).unwrap() {
            Cli::Run(opts) => opts,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn defaults() {
        let opts = run_opts(&[]);
        assert_eq!(opts, Opts::default());
        assert_eq!(opts.scenario.viewport, Viewport::new(1280, 720));
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(Cli::parse_from(["--ticks=3", "-h"]).unwrap(), Cli::Help);
        assert_eq!(Cli::parse_from(["--version"]).unwrap(), Cli::Version);
    }

    #[test]
    fn all_flags() {
        let opts = run_opts(&[
            "--name=toggle",
            "--width=640",
            "--height=480",
            "--theme=light",
            "--ticks=30",
            "--frame-ms=20",
            "--toggle-at=5",
            "--resize-at=10:320x200",
            "--sweep",
            "--seed=42",
            "--config=opts.json",
            "--out=log.jsonl",
            "--ppm=frame.ppm",
            "--golden=.",
            "--log-json",
            "--realtime",
        ]);
        let s = &opts.scenario;
        assert_eq!(s.name, "toggle");
        assert_eq!(s.viewport, Viewport::new(640, 480));
        assert_eq!(s.theme, ThemeMode::Light);
        assert_eq!((s.ticks, s.frame_ms), (30, 20));
        assert_eq!(s.toggle_theme_at, Some(5));
        assert_eq!(s.resize_at, Some((10, Viewport::new(320, 200))));
        assert!(s.pointer_sweep);
        assert_eq!(opts.seed, Some(42));
        assert_eq!(opts.config, Some(PathBuf::from("opts.json")));
        assert_eq!(opts.out, Some(PathBuf::from("log.jsonl")));
        assert_eq!(opts.ppm, Some(PathBuf::from("frame.ppm")));
        assert_eq!(opts.golden, Some(PathBuf::from(".")));
        assert!(opts.log_json);
        assert!(opts.realtime);
    }

    #[test]
    fn rejects_bad_values() {
        for args in [
            &["--width=wide"][..],
            &["--theme=sepia"],
            &["--resize-at=10"],
            &["--resize-at=10:320"],
            &["--resize-at=x:1x1"],
            &["--bogus"],
            &["--width=100000"],
            &["--height=8193"],
            &["--resize-at=3:100000x100000"],
        ] {
            let err = Cli::parse_from(args).unwrap_err();
            assert!(matches!(err, HarnessError::Usage(_)), "{args:?}");
        }
    }
}
