#![forbid(unsafe_code)]

//! The animation driver.
//!
//! # Lifecycle
//!
//! 1. [`Engine::new`] / [`Engine::with_clock`]: validate config, seed the RNG.
//! 2. [`Engine::start`]: hand over the surface and theme; builds the first scene.
//! 3. [`Engine::push_event`] between ticks, then [`Engine::step`] once per frame.
//! 4. [`Engine::stop`]: stop ticking and take the surface back.
//!
//! Each step drains queued events, applies any rebuild that is due, samples
//! the pointer, advances physics, and repaints the surface, in that order.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use drift_core::{Event, PointerTracker, ThemeMode, ThemeSignal, Viewport};
use drift_fx::{PointerSample, Scene};
use drift_render::{PackedRgba, Surface};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::clock::{Clock, DeterministicClock};
use crate::config::{ConfigError, EngineConfig};
use crate::schedule::{Rebuild, RebuildReason, RebuildSchedule};

/// Result of a single [`Engine::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Whether the engine is running.
    pub running: bool,
    /// Whether a frame was painted during this step.
    pub rendered: bool,
    /// Whether the scene was rebuilt during this step.
    pub rebuilt: bool,
    /// Number of queued events drained during this step.
    pub events_processed: u32,
    /// Frames painted since construction.
    pub frame_idx: u64,
}

/// Lifecycle errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// No drawing surface was provided at startup.
    SurfaceUnavailable,
    /// The theme signal had no value at startup.
    ThemeUnavailable,
    /// The operation needs a started engine.
    NotStarted,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceUnavailable => write!(f, "drawing surface unavailable"),
            Self::ThemeUnavailable => write!(f, "theme signal unavailable"),
            Self::NotStarted => write!(f, "engine not started"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Owns all simulation state and drives it one tick at a time.
#[derive(Debug)]
pub struct Engine<C: Clock = DeterministicClock> {
    config: EngineConfig,
    clock: C,
    rng: StdRng,
    clear_color: PackedRgba,
    surface: Option<Surface>,
    scene: Option<Scene>,
    pointer: PointerTracker,
    schedule: RebuildSchedule,
    events: VecDeque<Event>,
    running: bool,
    frame_idx: u64,
}

impl Engine<DeterministicClock> {
    /// Engine on a host-driven clock starting at zero.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, DeterministicClock::new())
    }

    /// Set the clock to an absolute time.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Set the clock from a host timestamp in milliseconds.
    pub fn set_time_ms(&mut self, now_ms: f64) {
        self.clock.set_ms(now_ms);
    }

    /// Advance the clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }
}

impl<C: Clock> Engine<C> {
    /// Engine on a caller-supplied clock.
    pub fn with_clock(config: EngineConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let clear_color = config.clear_color()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            schedule: RebuildSchedule::new(config.settle_delay()),
            config,
            clock,
            rng,
            clear_color,
            surface: None,
            scene: None,
            pointer: PointerTracker::new(Viewport::default()),
            events: VecDeque::new(),
            running: false,
            frame_idx: 0,
        })
    }

    /// Build the first scene and begin ticking.
    ///
    /// Refuses to start, leaving the engine idle, when either the surface or
    /// the theme is unavailable. Starting a running engine restarts it.
    pub fn start<T: ThemeSignal + ?Sized>(
        &mut self,
        surface: Option<Surface>,
        theme: &T,
    ) -> Result<(), EngineError> {
        let Some(surface) = surface else {
            tracing::warn!("engine start refused: no drawing surface");
            return Err(EngineError::SurfaceUnavailable);
        };
        let Some(theme) = theme.current_theme() else {
            tracing::warn!("engine start refused: theme signal unavailable");
            return Err(EngineError::ThemeUnavailable);
        };

        let viewport = surface.viewport();
        self.pointer = PointerTracker::new(viewport);
        self.schedule.clear();
        self.events.clear();
        self.scene = Some(Scene::build(theme, viewport, &mut self.rng));
        self.surface = Some(surface);
        self.running = true;
        self.log_rebuild(RebuildReason::Start);
        Ok(())
    }

    /// Stop ticking, drop the scene and pending work, and hand the surface
    /// back to the host.
    pub fn stop(&mut self) -> Option<Surface> {
        if self.running {
            tracing::info!(frames = self.frame_idx, "engine stopped");
        }
        self.running = false;
        self.scene = None;
        self.schedule.clear();
        self.events.clear();
        self.surface.take()
    }

    /// Rebuild the scene with the current theme and viewport at the next
    /// tick boundary.
    pub fn reinitialize(&mut self) -> Result<(), EngineError> {
        if !self.running {
            return Err(EngineError::NotStarted);
        }
        self.schedule.request_manual();
        Ok(())
    }

    /// Queue an event for the next [`step`](Self::step). Events sent to a
    /// stopped engine are dropped.
    pub fn push_event(&mut self, event: Event) {
        if !self.running {
            tracing::trace!(?event, "event dropped: engine not running");
            return;
        }
        self.events.push_back(event);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.push_event(Event::PointerMove { x, y });
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.push_event(Event::Resize { width, height });
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.push_event(Event::ThemeChanged(theme));
    }

    /// Run one tick.
    ///
    /// A stopped engine returns an idle result without touching any state.
    pub fn step(&mut self) -> StepResult {
        if !self.running {
            return self.idle_result();
        }

        let now = self.clock.now();
        let mut events_processed: u32 = 0;
        while let Some(event) = self.events.pop_front() {
            events_processed = events_processed.saturating_add(1);
            self.handle_event(event, now);
        }

        let rebuilt = match self.schedule.take_due(now) {
            Some(rebuild) => {
                self.apply_rebuild(rebuild);
                true
            }
            None => false,
        };

        let t_ms = self.clock.now_ms();
        let (Some(scene), Some(surface)) = (self.scene.as_mut(), self.surface.as_mut()) else {
            return self.idle_result();
        };
        self.pointer.begin_tick();
        let pointer = PointerSample::from(&self.pointer);
        scene.step(&pointer, t_ms, &mut self.rng);
        scene.render(surface, self.clear_color);
        self.frame_idx += 1;

        tracing::trace!(
            frame = self.frame_idx,
            events = events_processed,
            rebuilt,
            t_ms,
            "engine tick"
        );

        StepResult {
            running: true,
            rendered: true,
            rebuilt,
            events_processed,
            frame_idx: self.frame_idx,
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub const fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// The surface last painted, while the engine holds one.
    #[must_use]
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Theme of the live scene.
    #[must_use]
    pub fn theme(&self) -> Option<ThemeMode> {
        self.scene.as_ref().map(Scene::theme)
    }

    /// Theme waiting for its settle delay.
    #[must_use]
    pub fn pending_theme(&self) -> Option<ThemeMode> {
        self.schedule.pending_theme()
    }

    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.surface.as_ref().map(Surface::viewport)
    }

    #[must_use]
    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    #[must_use]
    pub const fn clear_color(&self) -> PackedRgba {
        self.clear_color
    }

    // --- Private helpers ---

    fn idle_result(&self) -> StepResult {
        StepResult {
            running: self.running,
            rendered: false,
            rebuilt: false,
            events_processed: 0,
            frame_idx: self.frame_idx,
        }
    }

    fn handle_event(&mut self, event: Event, now: Duration) {
        match event {
            Event::PointerMove { x, y } => self.pointer.set_position(x, y),
            Event::Resize { width, height } => {
                let viewport = Surface::clamp_viewport(Viewport::new(width, height));
                if let Some(surface) = self.surface.as_mut() {
                    surface.resize(viewport);
                }
                self.pointer.recenter(viewport);
                self.schedule.request_resize();
                tracing::debug!(width, height, "resize queued");
            }
            Event::ThemeChanged(theme) => {
                self.schedule.request_theme(theme, now);
                tracing::debug!(
                    theme = theme.name(),
                    settle_ms = self.config.settle_delay_ms,
                    "theme change queued"
                );
            }
        }
    }

    fn apply_rebuild(&mut self, rebuild: Rebuild) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let viewport = self
            .surface
            .as_ref()
            .map_or(scene.viewport(), Surface::viewport);
        let theme = rebuild.theme.unwrap_or(scene.theme());
        scene.rebuild(theme, viewport, &mut self.rng);
        self.log_rebuild(rebuild.reason);
    }

    fn log_rebuild(&self, reason: RebuildReason) {
        if let Some(scene) = &self.scene {
            let viewport = scene.viewport();
            tracing::info!(
                reason = reason.name(),
                mode = scene.field().mode_name(),
                items = scene.field().len(),
                width = viewport.width,
                height = viewport.height,
                "scene built"
            );
        }
    }
}
