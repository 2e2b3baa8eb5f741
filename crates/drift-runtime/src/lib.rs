#![forbid(unsafe_code)]

//! Host-driven animation engine.
//!
//! The [`Engine`] owns every piece of mutable state: the pixel surface, the
//! pointer tracker, the live scene, the RNG and the clock. Hosts push
//! [`drift_core::Event`]s between ticks and call [`Engine::step`] once per
//! animation frame; nothing here blocks or spawns threads.

pub mod clock;
pub mod config;
pub mod engine;
pub mod schedule;

pub use clock::{Clock, DeterministicClock, SystemClock};
pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, EngineError, StepResult};
pub use schedule::{Rebuild, RebuildReason, RebuildSchedule};
