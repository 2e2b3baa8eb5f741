#![forbid(unsafe_code)]

//! Viewport geometry.

/// Width (in pixels) below which a viewport is treated as a compact/mobile
/// device class.
pub const COMPACT_BREAKPOINT: u32 = 768;

/// Drawing-surface dimensions in pixels.
///
/// Uses screen coordinates (origin at top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a new viewport.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check if the viewport has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether this viewport belongs to the compact (mobile) device class.
    #[inline]
    pub const fn is_compact(&self) -> bool {
        self.width < COMPACT_BREAKPOINT
    }

    /// Area in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Center point in floating-point pixel coordinates.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Width as `f64`.
    #[inline]
    pub fn width_f64(&self) -> f64 {
        self.width as f64
    }

    /// Height as `f64`.
    #[inline]
    pub fn height_f64(&self) -> f64 {
        self.height as f64
    }
}

impl From<(u32, u32)> for Viewport {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}
