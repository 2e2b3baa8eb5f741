#![forbid(unsafe_code)]

//! Per-tick integration for both simulation modes.
//!
//! Items never interact with each other; each one only sees the pointer,
//! the viewport, and (for mesh nodes) its own anchor and the clock.

use drift_core::{PointerTracker, Viewport};
use rand::Rng;

use crate::field::{Confetti, MeshNode, ParticleField};

/// Confetti wraps once it is this far outside the viewport.
pub const WRAP_MARGIN: f64 = 50.0;
/// Confetti reacts to the pointer within this radius.
pub const CONFETTI_POINTER_RADIUS: f64 = 250.0;
/// Pointer speed (per axis, px/tick) above which confetti gets thrown.
pub const THROW_THRESHOLD: f64 = 0.5;
pub const THROW_GAIN: f64 = 0.08;
pub const ATTRACT_GAIN: f64 = 0.001;
pub const HORIZONTAL_DAMPING: f64 = 0.94;
/// Weight of the per-tick buoyancy target in the vertical velocity blend.
pub const BUOYANCY_BLEND: f64 = 0.05;
/// Vertical speeds below this get an extra upward nudge.
pub const MIN_LIFT: f64 = 0.5;
pub const LIFT_NUDGE: f64 = 0.05;

/// Mesh nodes are repelled within this radius.
pub const MESH_POINTER_RADIUS: f64 = 300.0;
pub const REPULSION_STRENGTH: f64 = 20.0;
pub const SPRING_STRENGTH: f64 = 0.05;
/// Scale applied to (repulsion + spring) before it is added to velocity.
pub const FORCE_SCALE: f64 = 0.1;
pub const MESH_DAMPING: f64 = 0.85;
pub const DRIFT_AMPLITUDE: f64 = 0.2;

/// Pointer state as seen by one tick of physics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl PointerSample {
    #[must_use]
    pub const fn new(x: f64, y: f64, vx: f64, vy: f64) -> Self {
        Self { x, y, vx, vy }
    }

    /// A pointer is "throwing" when either axis moved more than the threshold.
    #[inline]
    #[must_use]
    pub fn is_throwing(&self) -> bool {
        self.vx.abs() > THROW_THRESHOLD || self.vy.abs() > THROW_THRESHOLD
    }
}

impl From<&PointerTracker> for PointerSample {
    fn from(tracker: &PointerTracker) -> Self {
        let (x, y) = tracker.position();
        let (vx, vy) = tracker.velocity();
        Self { x, y, vx, vy }
    }
}

/// Toroidal wrap with a [`WRAP_MARGIN`] border on every side.
///
/// Idempotent: a wrapped position lands exactly on the opposite margin,
/// which is not itself past the boundary.
#[must_use]
pub fn wrap_position(x: f64, y: f64, viewport: Viewport) -> (f64, f64) {
    let (w, h) = (viewport.width_f64(), viewport.height_f64());
    let mut x = x;
    let mut y = y;
    if y < -WRAP_MARGIN {
        y = h + WRAP_MARGIN;
    } else if y > h + WRAP_MARGIN {
        y = -WRAP_MARGIN;
    }
    if x < -WRAP_MARGIN {
        x = w + WRAP_MARGIN;
    } else if x > w + WRAP_MARGIN {
        x = -WRAP_MARGIN;
    }
    (x, y)
}

/// Repulsion the pointer exerts on a node at `(x, y)`.
///
/// Magnitude falls linearly from [`REPULSION_STRENGTH`] at the pointer to zero
/// at [`MESH_POINTER_RADIUS`], directed away from the pointer. A node exactly
/// under the pointer is pushed along -x (`atan2(0, 0) == 0`).
#[must_use]
pub fn repulsion(pointer: &PointerSample, x: f64, y: f64) -> (f64, f64) {
    let dx = pointer.x - x;
    let dy = pointer.y - y;
    let dist = dx.hypot(dy);
    if dist >= MESH_POINTER_RADIUS {
        return (0.0, 0.0);
    }
    let push = (MESH_POINTER_RADIUS - dist) / MESH_POINTER_RADIUS * REPULSION_STRENGTH;
    let angle = dy.atan2(dx);
    (-angle.cos() * push, -angle.sin() * push)
}

/// Spring force pulling a node back to its anchor.
#[inline]
#[must_use]
pub fn spring(node: &MeshNode) -> (f64, f64) {
    let (bx, by) = node.anchor();
    ((bx - node.x) * SPRING_STRENGTH, (by - node.y) * SPRING_STRENGTH)
}

/// Advance one confetti piece by one tick.
pub fn step_confetti<R: Rng + ?Sized>(
    item: &mut Confetti,
    pointer: &PointerSample,
    viewport: Viewport,
    rng: &mut R,
) {
    item.x += item.vx;
    item.y += item.vy;
    item.rotation += item.rot_speed;
    (item.x, item.y) = wrap_position(item.x, item.y, viewport);

    let dx = pointer.x - item.x;
    let dy = pointer.y - item.y;
    let dist = dx.hypot(dy);
    if dist < CONFETTI_POINTER_RADIUS {
        let influence = (CONFETTI_POINTER_RADIUS - dist) / CONFETTI_POINTER_RADIUS;
        if pointer.is_throwing() {
            item.vx += pointer.vx * THROW_GAIN * influence;
            item.vy += pointer.vy * THROW_GAIN * influence;
        } else {
            item.vx += dx * ATTRACT_GAIN * influence;
            item.vy += dy * ATTRACT_GAIN * influence;
        }
    }

    item.vx *= HORIZONTAL_DAMPING;
    let target_vy = -(rng.r#gen::<f64>() * 0.5 + 1.0);
    item.vy = item.vy * (1.0 - BUOYANCY_BLEND) + target_vy * BUOYANCY_BLEND;
    if item.vy.abs() < MIN_LIFT {
        item.vy -= LIFT_NUDGE;
    }
}

/// Advance one mesh node by one tick. `t_ms` drives the ambient drift.
pub fn step_node(node: &mut MeshNode, pointer: &PointerSample, t_ms: f64) {
    let (fx, fy) = repulsion(pointer, node.x, node.y);
    let (sx, sy) = spring(node);
    node.vx = (node.vx + (fx + sx) * FORCE_SCALE) * MESH_DAMPING;
    node.vy = (node.vy + (fy + sy) * FORCE_SCALE) * MESH_DAMPING;
    node.x += node.vx;
    node.y += node.vy;

    let (bx, by) = node.anchor();
    node.x += (t_ms * 0.001 + by).sin() * DRIFT_AMPLITUDE;
    node.y += (t_ms * 0.002 + bx).cos() * DRIFT_AMPLITUDE;
}

/// Advance every item in `field` by one tick.
pub fn step<R: Rng + ?Sized>(
    field: &mut ParticleField,
    pointer: &PointerSample,
    viewport: Viewport,
    t_ms: f64,
    rng: &mut R,
) {
    match field {
        ParticleField::Antigravity(items) => {
            for item in items.iter_mut() {
                step_confetti(item, pointer, viewport, rng);
            }
        }
        ParticleField::EtherMesh(nodes) => {
            for node in nodes.iter_mut() {
                step_node(node, pointer, t_ms);
            }
        }
    }
}
