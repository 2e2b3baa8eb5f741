#![forbid(unsafe_code)]

//! Pointer position and per-tick velocity.
//!
//! Pointer move notifications arrive asynchronously between ticks and only
//! overwrite the raw position (latest wins). Velocity is a per-tick finite
//! difference: [`PointerTracker::begin_tick`] is called exactly once per tick,
//! immediately before physics, and computes
//! `current_position - position_recorded_at_previous_tick`.

use crate::geometry::Viewport;

/// Tracks the pointer position and derives its per-tick velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTracker {
    x: f64,
    y: f64,
    last_x: f64,
    last_y: f64,
    vx: f64,
    vy: f64,
    moved: bool,
}

impl PointerTracker {
    /// Create a tracker seeded at the viewport center with zero velocity.
    pub fn new(viewport: Viewport) -> Self {
        let (x, y) = viewport.center();
        Self {
            x,
            y,
            last_x: x,
            last_y: y,
            vx: 0.0,
            vy: 0.0,
            moved: false,
        }
    }

    /// Record a pointer move. Only the raw position changes.
    #[inline]
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.moved = true;
    }

    /// Recompute velocity for the tick that is about to run.
    ///
    /// Returns the new velocity.
    pub fn begin_tick(&mut self) -> (f64, f64) {
        self.vx = self.x - self.last_x;
        self.vy = self.y - self.last_y;
        self.last_x = self.x;
        self.last_y = self.y;
        (self.vx, self.vy)
    }

    /// Re-seed to the center of `viewport` if no pointer movement has been
    /// observed yet. Once the pointer has moved its position is kept.
    pub fn recenter(&mut self, viewport: Viewport) {
        if self.moved {
            return;
        }
        *self = Self::new(viewport);
    }

    /// Last known pointer position.
    #[inline]
    pub const fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Displacement since the previous tick, as of the last `begin_tick`.
    #[inline]
    pub const fn velocity(&self) -> (f64, f64) {
        (self.vx, self.vy)
    }

    /// Whether any pointer movement has been recorded.
    #[inline]
    pub const fn has_moved(&self) -> bool {
        self.moved
    }
}
