#![forbid(unsafe_code)]

//! Frame logging, golden checksum files, and PPM snapshots.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use drift_render::{PackedRgba, Surface};
use drift_runtime::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// One painted frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub t_ms: f64,
    pub mode: String,
    pub items: usize,
    pub width: u32,
    pub height: u32,
    pub rebuilt: bool,
    pub checksum: String,
}

/// Lines of a run log, tagged by `"event"`.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum LogLine<'a> {
    Start {
        scenario: &'a str,
        width: u32,
        height: u32,
        theme: &'a str,
        ticks: u32,
        config: &'a EngineConfig,
    },
    Frame(&'a FrameRecord),
    Complete {
        frames: usize,
        final_mode: &'a str,
        final_items: usize,
        checksums: &'a [String],
    },
}

/// JSONL event logger for scenario runs.
#[derive(Debug)]
pub struct FrameLog<W: Write> {
    writer: Option<W>,
    checksums: Vec<String>,
}

impl<W: Write> FrameLog<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
            checksums: Vec::new(),
        }
    }

    pub fn log_start(
        &mut self,
        scenario: &str,
        width: u32,
        height: u32,
        theme: &str,
        ticks: u32,
        config: &EngineConfig,
    ) -> Result<(), serde_json::Error> {
        self.write_line(&LogLine::Start {
            scenario,
            width,
            height,
            theme,
            ticks,
            config,
        })
    }

    pub fn log_frame(&mut self, record: &FrameRecord) -> Result<(), serde_json::Error> {
        self.checksums.push(record.checksum.clone());
        self.write_line(&LogLine::Frame(record))
    }

    pub fn log_complete(&mut self, final_mode: &str, final_items: usize) -> Result<(), serde_json::Error> {
        let line = LogLine::Complete {
            frames: self.checksums.len(),
            final_mode,
            final_items,
            checksums: &self.checksums,
        };
        if let Some(writer) = self.writer.as_mut() {
            serde_json::to_writer(&mut *writer, &line)?;
            writer.write_all(b"\n").map_err(serde_json::Error::io)?;
            writer.flush().map_err(serde_json::Error::io)?;
        }
        Ok(())
    }

    /// Checksums of every frame logged so far.
    pub fn checksums(&self) -> &[String] {
        &self.checksums
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> Option<W> {
        self.writer
    }

    fn write_line(&mut self, line: &LogLine<'_>) -> Result<(), serde_json::Error> {
        if let Some(writer) = self.writer.as_mut() {
            serde_json::to_writer(&mut *writer, line)?;
            writer.write_all(b"\n").map_err(serde_json::Error::io)?;
        }
        Ok(())
    }
}

impl FrameLog<io::Sink> {
    /// Logger that only collects checksums.
    pub fn noop() -> Self {
        Self {
            writer: None,
            checksums: Vec::new(),
        }
    }
}

/// Write `surface` as a binary PPM (P6), compositing over `background`.
pub fn write_ppm<W: Write>(surface: &Surface, background: PackedRgba, out: &mut W) -> io::Result<()> {
    let background = background.with_alpha(255);
    write!(out, "P6\n{} {}\n255\n", surface.width(), surface.height())?;
    let mut row = Vec::with_capacity(surface.width() as usize * 3);
    for line in surface.pixels().chunks(surface.width().max(1) as usize) {
        row.clear();
        for p in line {
            let c = p.over(background);
            row.extend_from_slice(&[c.r(), c.g(), c.b()]);
        }
        out.write_all(&row)?;
    }
    out.flush()
}

// Golden File Management
// ============================================================================

/// Outcome of a golden comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoldenOutcome {
    Pass,
    Fail,
}

/// Path to golden checksums file for a scenario.
pub fn golden_checksum_path(base_dir: &Path, scenario_name: &str) -> PathBuf {
    base_dir
        .join("tests")
        .join("golden")
        .join(format!("{scenario_name}.checksums"))
}

/// Load expected checksums from a golden file. A missing file means no
/// expectations yet.
pub fn load_golden_checksums(path: &Path) -> io::Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content
            .lines()
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| l.trim().to_string())
            .collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Save checksums to a golden file.
pub fn save_golden_checksums(path: &Path, checksums: &[String]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = format!(
        "# Golden checksums - do not edit manually\n{}\n",
        checksums.join("\n")
    );
    fs::write(path, content)
}

/// Check if we should update golden files (BLESS mode).
pub fn is_bless_mode() -> bool {
    std::env::var("BLESS").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Verify checksums against expected values, reporting the first mismatch.
pub fn verify_checksums(actual: &[String], expected: &[String]) -> (GoldenOutcome, Option<usize>) {
    if expected.is_empty() {
        return (GoldenOutcome::Pass, None);
    }

    if actual.len() != expected.len() {
        return (GoldenOutcome::Fail, None);
    }

    match actual.iter().zip(expected).position(|(a, e)| a != e) {
        Some(i) => (GoldenOutcome::Fail, Some(i)),
        None => (GoldenOutcome::Pass, None),
    }
}

/// Compare a run against its golden file, or rewrite the file in BLESS mode.
///
/// A missing golden file passes, so a first run never fails.
pub fn check_golden(
    base_dir: &Path,
    scenario: &str,
    checksums: &[String],
    bless: bool,
) -> Result<(), HarnessError> {
    let path = golden_checksum_path(base_dir, scenario);
    if bless {
        save_golden_checksums(&path, checksums)?;
        tracing::info!(path = %path.display(), frames = checksums.len(), "blessed golden checksums");
        return Ok(());
    }
    let expected = load_golden_checksums(&path)?;
    match verify_checksums(checksums, &expected) {
        (GoldenOutcome::Pass, _) => Ok(()),
        (GoldenOutcome::Fail, frame) => Err(HarnessError::GoldenMismatch {
            scenario: scenario.to_string(),
            frame,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::Viewport;

    fn record(frame: u64, checksum: &str) -> FrameRecord {
        FrameRecord {
            frame,
            t_ms: frame as f64 * 16.0,
            mode: "antigravity".into(),
            items: 80,
            width: 4,
            height: 2,
            rebuilt: false,
            checksum: checksum.into(),
        }
    }

    #[test]
    fn log_lines_are_tagged_json() {
        let mut log = FrameLog::new(Vec::new());
        log.log_start("s", 4, 2, "dark", 2, &EngineConfig::default())
            .unwrap();
        log.log_frame(&record(1, "a")).unwrap();
        log.log_frame(&record(2, "b")).unwrap();
        log.log_complete("antigravity", 80).unwrap();
        assert_eq!(log.checksums(), ["a".to_string(), "b".to_string()]);

        let bytes = log.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["event"], "start");
        assert_eq!(lines[0]["config"]["settle_delay_ms"], 100);
        assert_eq!(lines[1]["event"], "frame");
        assert_eq!(lines[1]["checksum"], "a");
        assert_eq!(lines[3]["event"], "complete");
        assert_eq!(lines[3]["frames"], 2);
    }

    #[test]
    fn frame_line_round_trips_into_record() {
        let mut log = FrameLog::new(Vec::new());
        let rec = record(7, "fnv1a64:0000000000000000");
        log.log_frame(&rec).unwrap();
        let text = String::from_utf8(log.into_inner().unwrap()).unwrap();
        let parsed: FrameRecord = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed, rec);
    }

    #[test]
    fn noop_log_still_collects() {
        let mut log = FrameLog::noop();
        log.log_frame(&record(1, "x")).unwrap();
        log.log_complete("ether-mesh", 0).unwrap();
        assert_eq!(log.checksums().len(), 1);
    }

    #[test]
    fn ppm_header_and_payload() {
        let mut surface = Surface::new(Viewport::new(3, 2));
        surface.clear(PackedRgba::rgba(255, 0, 0, 255));
        let mut out = Vec::new();
        write_ppm(&surface, PackedRgba::BLACK, &mut out).unwrap();
        let header = b"P6\n3 2\n255\n";
        assert!(out.starts_with(header));
        assert_eq!(out.len(), header.len() + 3 * 2 * 3);
        assert_eq!(&out[header.len()..header.len() + 3], &[255, 0, 0]);
    }

    #[test]
    fn ppm_composites_transparency_over_background() {
        let surface = Surface::new(Viewport::new(1, 1));
        let mut out = Vec::new();
        write_ppm(&surface, PackedRgba::rgb(10, 20, 30), &mut out).unwrap();
        assert_eq!(&out[out.len() - 3..], &[10, 20, 30]);
    }

    #[test]
    fn verify_checksums_cases() {
        let a = vec!["x".to_string(), "y".to_string()];
        assert_eq!(verify_checksums(&a, &[]), (GoldenOutcome::Pass, None));
        assert_eq!(verify_checksums(&a, &a), (GoldenOutcome::Pass, None));
        assert_eq!(
            verify_checksums(&a, &["x".to_string(), "z".to_string()]),
            (GoldenOutcome::Fail, Some(1))
        );
        assert_eq!(verify_checksums(&a, &a[..1]), (GoldenOutcome::Fail, None));
    }

    #[test]
    fn golden_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = golden_checksum_path(dir.path(), "demo");
        assert_eq!(load_golden_checksums(&path).unwrap(), Vec::<String>::new());
        let sums = vec!["a".to_string(), "b".to_string()];
        save_golden_checksums(&path, &sums).unwrap();
        assert_eq!(load_golden_checksums(&path).unwrap(), sums);
    }

    #[test]
    fn check_golden_blesses_then_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let sums = vec!["a".to_string(), "b".to_string()];
        check_golden(dir.path(), "s", &sums, false).unwrap();
        check_golden(dir.path(), "s", &sums, true).unwrap();
        check_golden(dir.path(), "s", &sums, false).unwrap();

        let changed = vec!["a".to_string(), "c".to_string()];
        let err = check_golden(dir.path(), "s", &changed, false).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::GoldenMismatch { frame: Some(1), .. }
        ));
        assert!(err.to_string().contains("frame 2"));
    }
}
