#![forbid(unsafe_code)]

//! Scripted headless runs.

use std::io::Write;
use std::time::Duration;

use drift_core::{ThemeMode, Viewport};
use drift_render::Surface;
use drift_runtime::{Clock, Engine, EngineConfig, SystemClock};

use crate::error::HarnessError;
use crate::golden::{FrameLog, FrameRecord};

/// A scripted run: viewport, starting theme, tick count, and the inputs fed
/// in along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub viewport: Viewport,
    pub theme: ThemeMode,
    pub ticks: u32,
    pub frame_ms: u64,
    /// Tick at which the theme is flipped.
    pub toggle_theme_at: Option<u32>,
    /// Tick at which the viewport changes.
    pub resize_at: Option<(u32, Viewport)>,
    /// Move the pointer along a fixed curve every tick.
    pub pointer_sweep: bool,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "default".into(),
            viewport: Viewport::new(1280, 720),
            theme: ThemeMode::Dark,
            ticks: 120,
            frame_ms: 16,
            toggle_theme_at: None,
            resize_at: None,
            pointer_sweep: false,
        }
    }
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub scenario: String,
    pub frames: u64,
    pub checksums: Vec<String>,
    pub final_mode: String,
    pub final_items: usize,
    /// The surface handed back by the engine on stop.
    pub last_surface: Option<Surface>,
}

impl Scenario {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Pointer position for `tick` when sweeping.
    #[must_use]
    pub fn sweep_position(&self, tick: u32) -> (f64, f64) {
        let t = f64::from(tick);
        let (w, h) = (self.viewport.width_f64(), self.viewport.height_f64());
        (
            w * (0.5 + 0.4 * (t * 0.05).cos()),
            h * (0.5 + 0.4 * (t * 0.07).sin()),
        )
    }

    /// Drive an engine through the script on simulated time, logging every
    /// painted frame. Each tick advances the clock by exactly `frame_ms`.
    pub fn run<W: Write>(
        &self,
        config: &EngineConfig,
        log: &mut FrameLog<W>,
    ) -> Result<RunSummary, HarnessError> {
        let mut engine = Engine::new(config.clone())?;
        let dt = Duration::from_millis(self.frame_ms);
        self.drive(&mut engine, config, log, |engine| engine.advance_time(dt))
    }

    /// Same script on the wall clock, sleeping `frame_ms` between ticks.
    /// Frame timing (and so the mesh drift) is no longer reproducible.
    pub fn run_realtime<W: Write>(
        &self,
        config: &EngineConfig,
        log: &mut FrameLog<W>,
    ) -> Result<RunSummary, HarnessError> {
        let mut engine = Engine::with_clock(config.clone(), SystemClock::new())?;
        let dt = Duration::from_millis(self.frame_ms);
        self.drive(&mut engine, config, log, |_| std::thread::sleep(dt))
    }

    fn drive<C: Clock, W: Write>(
        &self,
        engine: &mut Engine<C>,
        config: &EngineConfig,
        log: &mut FrameLog<W>,
        mut end_tick: impl FnMut(&mut Engine<C>),
    ) -> Result<RunSummary, HarnessError> {
        engine.start(Some(Surface::new(self.viewport)), &self.theme)?;
        log.log_start(
            &self.name,
            self.viewport.width,
            self.viewport.height,
            self.theme.name(),
            self.ticks,
            config,
        )?;
        tracing::info!(
            scenario = %self.name,
            width = self.viewport.width,
            height = self.viewport.height,
            theme = self.theme.name(),
            ticks = self.ticks,
            "scenario started"
        );

        let mut theme = self.theme;
        for tick in 0..self.ticks {
            if self.pointer_sweep {
                let (x, y) = self.sweep_position(tick);
                engine.pointer_move(x, y);
            }
            if self.toggle_theme_at == Some(tick) {
                theme = theme.toggled();
                engine.set_theme(theme);
            }
            if let Some((at, vp)) = self.resize_at
                && at == tick
            {
                engine.resize(vp.width, vp.height);
            }

            let result = engine.step();
            if result.rendered
                && let (Some(surface), Some(scene)) = (engine.surface(), engine.scene())
            {
                let record = FrameRecord {
                    frame: result.frame_idx,
                    t_ms: engine.clock().now_ms(),
                    mode: scene.profile().mode_name().to_string(),
                    items: scene.field().len(),
                    width: surface.width(),
                    height: surface.height(),
                    rebuilt: result.rebuilt,
                    checksum: surface.checksum_hex(),
                };
                log.log_frame(&record)?;
            }
            end_tick(engine);
        }

        let (final_mode, final_items) = engine
            .scene()
            .map(|s| (s.profile().mode_name().to_string(), s.field().len()))
            .unwrap_or_default();
        log.log_complete(&final_mode, final_items)?;
        let frames = engine.frame_idx();
        let last_surface = engine.stop();
        tracing::info!(scenario = %self.name, frames, mode = %final_mode, "scenario complete");

        Ok(RunSummary {
            scenario: self.name.clone(),
            frames,
            checksums: log.checksums().to_vec(),
            final_mode,
            final_items,
            last_surface,
        })
    }
}
