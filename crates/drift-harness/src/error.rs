#![forbid(unsafe_code)]

use std::fmt;
use std::io;

use drift_runtime::{ConfigError, EngineError};

/// Everything that can stop a harness run.
#[derive(Debug)]
pub enum HarnessError {
    Io(io::Error),
    Json(serde_json::Error),
    Config(ConfigError),
    Engine(EngineError),
    /// Bad command-line usage.
    Usage(String),
    /// Checksums differ from the golden file; `frame` is the first mismatch
    /// when the lengths agree.
    GoldenMismatch {
        scenario: String,
        frame: Option<usize>,
    },
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Config(e) => write!(f, "{e}"),
            Self::Engine(e) => write!(f, "engine error: {e}"),
            Self::Usage(msg) => write!(f, "{msg}"),
            Self::GoldenMismatch {
                scenario,
                frame: Some(i),
            } => write!(f, "scenario {scenario}: checksum mismatch at frame {}", i + 1),
            Self::GoldenMismatch {
                scenario,
                frame: None,
            } => write!(f, "scenario {scenario}: frame count differs from golden file"),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Engine(e) => Some(e),
            Self::Usage(_) | Self::GoldenMismatch { .. } => None,
        }
    }
}

impl From<io::Error> for HarnessError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<ConfigError> for HarnessError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<EngineError> for HarnessError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}
