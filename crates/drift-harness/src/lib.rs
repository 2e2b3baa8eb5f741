#![forbid(unsafe_code)]

//! Headless harness for the drift backdrop.
//!
//! Runs scripted [`Scenario`]s against a deterministic engine and records one
//! JSONL line per frame with an FNV-1a surface checksum, so visual changes
//! show up as checksum diffs without any browser in the loop.

pub mod cli;
pub mod error;
pub mod golden;
pub mod scenario;

pub use error::HarnessError;
pub use golden::{FrameLog, FrameRecord};
pub use scenario::{RunSummary, Scenario};
