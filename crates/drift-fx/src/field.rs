#![forbid(unsafe_code)]

//! Item populations and their initialization.

use std::f64::consts::TAU;

use drift_core::Viewport;
use drift_render::PackedRgba;
use rand::Rng;

use crate::profile::{Palette, SimulationProfile, mesh_slot};

/// Confetti count on viewports at least [`drift_core::geometry::COMPACT_BREAKPOINT`] wide.
pub const ANTIGRAVITY_COUNT_WIDE: usize = 180;
/// Confetti count on compact viewports.
pub const ANTIGRAVITY_COUNT_COMPACT: usize = 80;
/// Per-item friction recorded on every confetti piece.
pub const CONFETTI_FRICTION: f64 = 0.96;
/// Mesh grid spacing on wide viewports.
pub const MESH_SPACING_WIDE: u32 = 100;
/// Mesh grid spacing on compact viewports.
pub const MESH_SPACING_COMPACT: u32 = 80;
/// Anchors are jittered by up to this much either way on each axis.
pub const MESH_JITTER: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfettiShape {
    Circle,
    Square,
    Triangle,
}

impl ConfettiShape {
    pub const ALL: [ConfettiShape; 3] = [Self::Circle, Self::Square, Self::Triangle];
}

/// One floating confetti piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confetti {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub color: PackedRgba,
    pub shape: ConfettiShape,
    pub rotation: f64,
    pub rot_speed: f64,
    pub friction: f64,
}

impl Confetti {
    fn spawn<R: Rng + ?Sized>(viewport: Viewport, palette: &Palette, rng: &mut R) -> Self {
        let size = rng.gen_range(3.0..9.0);
        // Scaled unit draws keep zero-width viewports valid.
        let x = rng.r#gen::<f64>() * viewport.width_f64();
        let y = rng.r#gen::<f64>() * viewport.height_f64();
        let vx = rng.gen_range(-0.75..0.75);
        let vy = rng.gen_range(-2.5..-0.5);
        let rotation = rng.gen_range(0.0..TAU);
        let rot_speed = rng.gen_range(-0.025..0.025);
        let color = palette.pick(rng);
        let shape = ConfettiShape::ALL[rng.gen_range(0..ConfettiShape::ALL.len())];
        Self {
            x,
            y,
            vx,
            vy,
            size,
            color,
            shape,
            rotation,
            rot_speed,
            friction: CONFETTI_FRICTION,
        }
    }
}

/// One spring-anchored mesh node.
///
/// The anchor is fixed at construction and only readable afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshNode {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub color: PackedRgba,
    base_x: f64,
    base_y: f64,
}

impl MeshNode {
    /// Node at rest on its anchor.
    #[must_use]
    pub const fn new(base_x: f64, base_y: f64, size: f64, color: PackedRgba) -> Self {
        Self {
            x: base_x,
            y: base_y,
            vx: 0.0,
            vy: 0.0,
            size,
            color,
            base_x,
            base_y,
        }
    }

    #[inline]
    #[must_use]
    pub const fn anchor(&self) -> (f64, f64) {
        (self.base_x, self.base_y)
    }

    fn spawn<R: Rng + ?Sized>(
        cell_x: f64,
        cell_y: f64,
        palette: &Palette,
        rng: &mut R,
    ) -> Self {
        let jitter_x = rng.gen_range(-MESH_JITTER..MESH_JITTER);
        let jitter_y = rng.gen_range(-MESH_JITTER..MESH_JITTER);
        let default_size = rng.gen_range(2.0..4.0);
        let (color, size) = match rng.r#gen::<f64>() {
            u if u > 0.95 => (palette.get(mesh_slot::CORAL), 5.0),
            u if u > 0.8 => (palette.get(mesh_slot::PURPLE), 4.0),
            u if u > 0.6 => (palette.get(mesh_slot::DEEP_PURPLE), default_size),
            _ => (palette.get(mesh_slot::LIGHT_GREY), default_size),
        };
        Self::new(cell_x + jitter_x, cell_y + jitter_y, size, color)
    }
}

/// Mesh grid layout for a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshGrid {
    pub cols: u32,
    pub rows: u32,
    pub spacing: u32,
}

impl MeshGrid {
    /// `ceil(dimension / spacing)` cells per axis; zero dimensions give zero cells.
    #[must_use]
    pub const fn for_viewport(viewport: Viewport) -> Self {
        let spacing = if viewport.is_compact() {
            MESH_SPACING_COMPACT
        } else {
            MESH_SPACING_WIDE
        };
        Self {
            cols: viewport.width.div_ceil(spacing),
            rows: viewport.height.div_ceil(spacing),
            spacing,
        }
    }

    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Center of cell `(col, row)` before jitter.
    #[must_use]
    pub fn cell_center(&self, col: u32, row: u32) -> (f64, f64) {
        let s = f64::from(self.spacing);
        (
            f64::from(col) * s + s / 2.0,
            f64::from(row) * s + s / 2.0,
        )
    }
}

/// Confetti count for a viewport.
#[must_use]
pub const fn antigravity_count(viewport: Viewport) -> usize {
    if viewport.is_compact() {
        ANTIGRAVITY_COUNT_COMPACT
    } else {
        ANTIGRAVITY_COUNT_WIDE
    }
}

/// The live item population, tagged by mode.
#[derive(Debug, Clone, PartialEq)]
pub enum ParticleField {
    Antigravity(Vec<Confetti>),
    EtherMesh(Vec<MeshNode>),
}

impl ParticleField {
    /// Build a fresh population for `profile` on `viewport`.
    pub fn initialize<R: Rng + ?Sized>(
        viewport: Viewport,
        profile: &SimulationProfile,
        rng: &mut R,
    ) -> Self {
        let field = match profile {
            SimulationProfile::Antigravity { palette } => {
                let count = antigravity_count(viewport);
                Self::Antigravity(
                    (0..count)
                        .map(|_| Confetti::spawn(viewport, palette, rng))
                        .collect(),
                )
            }
            SimulationProfile::EtherMesh { palette, .. } => {
                let grid = MeshGrid::for_viewport(viewport);
                let mut nodes = Vec::with_capacity(grid.node_count());
                for row in 0..grid.rows {
                    for col in 0..grid.cols {
                        let (cx, cy) = grid.cell_center(col, row);
                        nodes.push(MeshNode::spawn(cx, cy, palette, rng));
                    }
                }
                Self::EtherMesh(nodes)
            }
        };
        tracing::debug!(
            mode = field.mode_name(),
            items = field.len(),
            width = viewport.width,
            height = viewport.height,
            "particle field initialized"
        );
        field
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Antigravity(items) => items.len(),
            Self::EtherMesh(nodes) => nodes.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn mode_name(&self) -> &'static str {
        match self {
            Self::Antigravity(_) => "antigravity",
            Self::EtherMesh(_) => "ether-mesh",
        }
    }

    #[must_use]
    pub fn confetti(&self) -> Option<&[Confetti]> {
        match self {
            Self::Antigravity(items) => Some(items),
            Self::EtherMesh(_) => None,
        }
    }

    #[must_use]
    pub fn nodes(&self) -> Option<&[MeshNode]> {
        match self {
            Self::EtherMesh(nodes) => Some(nodes),
            Self::Antigravity(_) => None,
        }
    }
}
