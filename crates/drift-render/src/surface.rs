#![forbid(unsafe_code)]

//! Owned RGBA pixel surface.
//!
//! The surface is the headless stand-in for a 2D canvas backing store:
//! row-major straight-alpha pixels, cleared to a single color each frame,
//! exportable as RGBA8 bytes (the `ImageData` layout) and hashable for
//! golden/determinism checks.

use drift_core::Viewport;

use crate::color::PackedRgba;

/// How a source pixel combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha compositing (`source-over`).
    #[default]
    Over,
    /// Additive compositing (`lighter`).
    Lighter,
}

impl BlendMode {
    /// Combine `src` onto `dst`.
    #[inline]
    pub fn blend(self, src: PackedRgba, dst: PackedRgba) -> PackedRgba {
        match self {
            Self::Over => src.over(dst),
            Self::Lighter => src.lighter(dst),
        }
    }
}

/// Largest surface width or height. Larger viewports are clamped per axis.
pub const MAX_SURFACE_DIMENSION: u32 = 8192;

/// Row-major pixel buffer sized to a [`Viewport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<PackedRgba>,
}

impl Surface {
    /// Create a transparent surface matching `viewport`, clamped to
    /// [`MAX_SURFACE_DIMENSION`] on each axis.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        let viewport = Self::clamp_viewport(viewport);
        Self {
            width: viewport.width,
            height: viewport.height,
            pixels: vec![PackedRgba::TRANSPARENT; viewport.area() as usize],
        }
    }

    /// `viewport` with each axis limited to [`MAX_SURFACE_DIMENSION`].
    #[must_use]
    pub const fn clamp_viewport(viewport: Viewport) -> Viewport {
        let width = if viewport.width > MAX_SURFACE_DIMENSION {
            MAX_SURFACE_DIMENSION
        } else {
            viewport.width
        };
        let height = if viewport.height > MAX_SURFACE_DIMENSION {
            MAX_SURFACE_DIMENSION
        } else {
            viewport.height
        };
        Viewport::new(width, height)
    }

    /// Surface dimensions as a viewport.
    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Resize to `viewport` (clamped like [`Surface::new`]), discarding
    /// contents. No-op when unchanged.
    pub fn resize(&mut self, viewport: Viewport) {
        let viewport = Self::clamp_viewport(viewport);
        if viewport.width == self.width && viewport.height == self.height {
            return;
        }
        self.width = viewport.width;
        self.height = viewport.height;
        self.pixels.clear();
        self.pixels
            .resize(viewport.area() as usize, PackedRgba::TRANSPARENT);
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: PackedRgba) {
        self.pixels.fill(color);
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> Option<PackedRgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Composite `color` onto the pixel at `(x, y)`. Out-of-bounds writes
    /// are clipped.
    #[inline]
    pub fn blend(&mut self, x: i64, y: i64, color: PackedRgba, mode: BlendMode) {
        if color.a() == 0 {
            return;
        }
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = mode.blend(color, self.pixels[i]);
        }
    }

    /// All pixels, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[PackedRgba] {
        &self.pixels
    }

    /// Number of pixels with non-zero alpha.
    #[must_use]
    pub fn painted_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.a() != 0).count()
    }

    /// Write the surface as straight-alpha RGBA8 bytes into `out`
    /// (cleared first).
    pub fn write_rgba_bytes(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.pixels.len() * 4);
        for p in &self.pixels {
            out.extend_from_slice(&[p.r(), p.g(), p.b(), p.a()]);
        }
    }

    /// FNV-1a 64-bit hash over dimensions and pixels.
    #[must_use]
    pub fn checksum(&self) -> u64 {
        const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0100_0000_01b3;

        let mut hash = FNV_OFFSET_BASIS;
        let mut feed = |bytes: &[u8]| {
            for &b in bytes {
                hash ^= u64::from(b);
                hash = hash.wrapping_mul(FNV_PRIME);
            }
        };
        feed(&self.width.to_le_bytes());
        feed(&self.height.to_le_bytes());
        for p in &self.pixels {
            feed(&p.0.to_le_bytes());
        }
        hash
    }

    /// Checksum formatted the way frame records carry it.
    #[must_use]
    pub fn checksum_hex(&self) -> String {
        format!("fnv1a64:{:016x}", self.checksum())
    }
}
