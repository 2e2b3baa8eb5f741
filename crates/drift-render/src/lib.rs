#![forbid(unsafe_code)]

//! Render kernel: packed colors, an owned RGBA surface, and a small
//! canvas-style painter (circles, convex polygons, thick lines) with
//! translate/rotate transforms, global alpha, and blend modes.

pub mod color;
pub mod painter;
pub mod surface;

pub use color::{ColorParseError, PackedRgba};
pub use painter::Painter;
pub use surface::{BlendMode, MAX_SURFACE_DIMENSION, Surface};
