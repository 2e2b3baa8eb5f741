#![forbid(unsafe_code)]

//! Canvas-style shape rasterizer.
//!
//! Shapes are sampled at pixel centers: a pixel is covered when its center
//! `(x + 0.5, y + 0.5)` falls inside the shape. Shapes too small to cover
//! any pixel center still light the pixel under their origin, so sub-pixel
//! highlights never vanish.
//!
//! # Example
//!
//! ```
//! use drift_core::Viewport;
//! use drift_render::{BlendMode, PackedRgba, Painter, Surface};
//! use drift_render::painter::Transform;
//!
//! let mut surface = Surface::new(Viewport::new(32, 32));
//! let mut painter = Painter::new(&mut surface);
//! painter.set_blend(BlendMode::Lighter);
//! painter.set_transform(Transform::translate_rotate(16.0, 16.0, 0.3));
//! painter.fill_rect(-4.0, -4.0, 8.0, 8.0, PackedRgba::rgb(255, 0, 0));
//! painter.line(0.0, 0.0, 31.0, 31.0, 1.5, PackedRgba::WHITE);
//! assert!(surface.painted_pixel_count() > 0);
//! ```

use crate::color::PackedRgba;
use crate::surface::{BlendMode, Surface};

/// Translate-then-rotate transform, matching `ctx.translate(); ctx.rotate()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    tx: f64,
    ty: f64,
    cos: f64,
    sin: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        tx: 0.0,
        ty: 0.0,
        cos: 1.0,
        sin: 0.0,
    };

    /// Move the origin to `(tx, ty)`, then rotate by `angle` radians.
    #[must_use]
    pub fn translate_rotate(tx: f64, ty: f64, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { tx, ty, cos, sin }
    }

    /// Map a local point into surface coordinates.
    #[inline]
    #[must_use]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.tx + x * self.cos - y * self.sin,
            self.ty + x * self.sin + y * self.cos,
        )
    }
}

/// Stateful painter over a borrowed [`Surface`].
#[derive(Debug)]
pub struct Painter<'a> {
    surface: &'a mut Surface,
    transform: Transform,
    alpha: f32,
    blend: BlendMode,
}

impl<'a> Painter<'a> {
    /// Painter with identity transform, alpha 1 and `Over` blending.
    pub fn new(surface: &'a mut Surface) -> Self {
        Self {
            surface,
            transform: Transform::IDENTITY,
            alpha: 1.0,
            blend: BlendMode::Over,
        }
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        self.surface
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn reset_transform(&mut self) {
        self.transform = Transform::IDENTITY;
    }

    /// Global alpha multiplied into every subsequent draw, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    #[must_use]
    pub const fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_blend(&mut self, blend: BlendMode) {
        self.blend = blend;
    }

    #[must_use]
    pub const fn blend(&self) -> BlendMode {
        self.blend
    }

    /// Composite one device pixel using current alpha and blend mode.
    #[inline]
    pub fn plot(&mut self, x: i64, y: i64, color: PackedRgba) {
        let color = if self.alpha < 1.0 {
            color.with_opacity(self.alpha)
        } else {
            color
        };
        self.surface.blend(x, y, color, self.blend);
    }

    /// Clipped inclusive pixel range covering `[lo, hi]` along an axis of
    /// `extent` pixels.
    fn pixel_span(lo: f64, hi: f64, extent: u32) -> Option<(i64, i64)> {
        if extent == 0 || !lo.is_finite() || !hi.is_finite() {
            return None;
        }
        let first = (lo.floor() as i64).max(0);
        let last = (hi.ceil() as i64).min(i64::from(extent) - 1);
        (first <= last).then_some((first, last))
    }

    /// Fill every pixel whose center lies within `[inner, outer]` of the
    /// device-space point `(cx, cy)`.
    fn fill_annulus(&mut self, cx: f64, cy: f64, inner: f64, outer: f64, color: PackedRgba) {
        let (w, h) = (self.surface.width(), self.surface.height());
        let (Some((x0, x1)), Some((y0, y1))) = (
            Self::pixel_span(cx - outer, cx + outer, w),
            Self::pixel_span(cy - outer, cy + outer, h),
        ) else {
            return;
        };
        let (inner2, outer2) = (inner * inner, outer * outer);
        let mut hit = false;
        for y in y0..=y1 {
            let dy = y as f64 + 0.5 - cy;
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - cx;
                let d2 = dx * dx + dy * dy;
                if d2 <= outer2 && d2 >= inner2 {
                    self.plot(x, y, color);
                    hit = true;
                }
            }
        }
        if !hit && inner <= 0.0 {
            self.plot(cx.floor() as i64, cy.floor() as i64, color);
        }
    }

    /// Fill a circle of radius `r` centered at local `(cx, cy)`.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: PackedRgba) {
        if r.is_nan() || r <= 0.0 {
            return;
        }
        let (cx, cy) = self.transform.apply(cx, cy);
        self.fill_annulus(cx, cy, 0.0, r, color);
    }

    /// Stroke a circle outline of radius `r` with the given line width.
    pub fn stroke_circle(&mut self, cx: f64, cy: f64, r: f64, line_width: f64, color: PackedRgba) {
        if r.is_nan() || r <= 0.0 || line_width.is_nan() || line_width <= 0.0 {
            return;
        }
        let half = line_width / 2.0;
        let (cx, cy) = self.transform.apply(cx, cy);
        self.fill_annulus(cx, cy, (r - half).max(0.0), r + half, color);
    }

    /// Fill the local axis-aligned rectangle `(x, y, w, h)`; rotation in the
    /// current transform turns it into a rotated quad.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: PackedRgba) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        self.fill_convex(&[(x, y), (x + w, y), (x + w, y + h), (x, y + h)], color);
    }

    /// Fill a convex polygon given in local coordinates (either winding).
    pub fn fill_convex(&mut self, points: &[(f64, f64)], color: PackedRgba) {
        if points.len() < 3 {
            return;
        }
        let device: Vec<(f64, f64)> = points
            .iter()
            .map(|&(x, y)| self.transform.apply(x, y))
            .collect();

        let twice_area: f64 = device
            .iter()
            .zip(device.iter().cycle().skip(1))
            .map(|(a, b)| a.0 * b.1 - b.0 * a.1)
            .sum();
        if !twice_area.is_finite() || twice_area.abs() < f64::EPSILON {
            return;
        }
        let orientation = twice_area.signum();

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(x, y) in &device {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        let (w, h) = (self.surface.width(), self.surface.height());
        let (Some((x0, x1)), Some((y0, y1))) = (
            Self::pixel_span(min_x, max_x, w),
            Self::pixel_span(min_y, max_y, h),
        ) else {
            return;
        };

        let mut hit = false;
        for y in y0..=y1 {
            let py = y as f64 + 0.5;
            for x in x0..=x1 {
                let px = x as f64 + 0.5;
                let inside = device
                    .iter()
                    .zip(device.iter().cycle().skip(1))
                    .all(|(a, b)| {
                        let cross = (b.0 - a.0) * (py - a.1) - (b.1 - a.1) * (px - a.0);
                        cross * orientation >= 0.0
                    });
                if inside {
                    self.plot(x, y, color);
                    hit = true;
                }
            }
        }
        if !hit {
            let n = device.len() as f64;
            let cx = device.iter().map(|p| p.0).sum::<f64>() / n;
            let cy = device.iter().map(|p| p.1).sum::<f64>() / n;
            self.plot(cx.floor() as i64, cy.floor() as i64, color);
        }
    }

    /// Stroke a straight line between local points.
    ///
    /// Widths of one pixel or less use Bresenham; wider lines paint a
    /// perpendicular run per step along the major axis.
    pub fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, width: f64, color: PackedRgba) {
        if width.is_nan() || width <= 0.0 {
            return;
        }
        let p0 = self.transform.apply(x0, y0);
        let p1 = self.transform.apply(x1, y1);
        let margin = width.max(1.0);
        let bounds = (
            -margin,
            -margin,
            f64::from(self.surface.width()) + margin,
            f64::from(self.surface.height()) + margin,
        );
        let Some(((x0, y0), (x1, y1))) = clip_segment(p0, p1, bounds) else {
            return;
        };

        if width <= 1.0 {
            self.hairline(
                x0.floor() as i64,
                y0.floor() as i64,
                x1.floor() as i64,
                y1.floor() as i64,
                color,
            );
            return;
        }

        let half = width / 2.0;
        let (dx, dy) = (x1 - x0, y1 - y0);
        // Walk the major axis; `swap` maps (major, minor) back to (x, y).
        let swap = dy.abs() > dx.abs();
        let (a0, b0, da, db) = if swap { (y0, x0, dy, dx) } else { (x0, y0, dx, dy) };
        if da.abs() < f64::EPSILON {
            self.fill_annulus(x0, y0, 0.0, half, color);
            return;
        }
        let slope = db / da;
        let span = half * (1.0 + slope * slope).sqrt();
        let (lo_a, hi_a) = (a0.min(a0 + da), a0.max(a0 + da));
        for major in (lo_a.floor() as i64)..=(hi_a.floor() as i64) {
            let center_a = (major as f64 + 0.5).clamp(lo_a, hi_a);
            let center_b = b0 + slope * (center_a - a0);
            let lo = (center_b - span).round() as i64;
            let hi = ((center_b + span).round() as i64 - 1).max(lo);
            for minor in lo..=hi {
                if swap {
                    self.plot(minor, major, color);
                } else {
                    self.plot(major, minor, color);
                }
            }
        }
    }

    /// Bresenham line in device pixels.
    fn hairline(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: PackedRgba) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx: i64 = if x0 < x1 { 1 } else { -1 };
        let sy: i64 = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut cx = x0;
        let mut cy = y0;

        loop {
            self.plot(cx, cy, color);

            if cx == x1 && cy == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                if cx == x1 {
                    break;
                }
                err += dy;
                cx += sx;
            }
            if e2 <= dx {
                if cy == y1 {
                    break;
                }
                err += dx;
                cy += sy;
            }
        }
    }
}

/// Liang-Barsky clip of a segment against `(min_x, min_y, max_x, max_y)`.
fn clip_segment(
    p0: (f64, f64),
    p1: (f64, f64),
    (min_x, min_y, max_x, max_y): (f64, f64, f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    if !(p0.0.is_finite() && p0.1.is_finite() && p1.0.is_finite() && p1.1.is_finite()) {
        return None;
    }
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    if !(dx.is_finite() && dy.is_finite()) {
        return None;
    }
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-dx, p0.0 - min_x),
        (dx, max_x - p0.0),
        (-dy, p0.1 - min_y),
        (dy, max_y - p0.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((
        (p0.0 + t0 * dx, p0.1 + t0 * dy),
        (p0.0 + t1 * dx, p0.1 + t1 * dy),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::Viewport;
    use std::f64::consts::FRAC_PI_4;

    fn surface(w: u32, h: u32) -> Surface {
        Surface::new(Viewport::new(w, h))
    }

    #[test]
    fn fill_circle_covers_pixel_centers() {
        let mut s = surface(20, 20);
        Painter::new(&mut s).fill_circle(10.0, 10.0, 3.0, PackedRgba::WHITE);
        assert_eq!(s.painted_pixel_count(), 32);
        assert_eq!(s.get(10, 10), Some(PackedRgba::WHITE));
        assert_eq!(s.get(13, 13), Some(PackedRgba::TRANSPARENT));
    }

    #[test]
    fn tiny_circle_still_lights_a_pixel() {
        let mut s = surface(8, 8);
        Painter::new(&mut s).fill_circle(3.1, 3.1, 0.3, PackedRgba::WHITE);
        assert_eq!(s.painted_pixel_count(), 1);
        assert_eq!(s.get(3, 3), Some(PackedRgba::WHITE));
    }

    #[test]
    fn stroke_circle_leaves_center_empty() {
        let mut s = surface(30, 30);
        Painter::new(&mut s).stroke_circle(15.0, 15.0, 8.0, 1.0, PackedRgba::WHITE);
        assert_eq!(s.get(15, 15), Some(PackedRgba::TRANSPARENT));
        assert_eq!(s.get(15, 7), Some(PackedRgba::WHITE));
        assert!(s.painted_pixel_count() > 20);
    }

    #[test]
    fn fill_rect_identity() {
        let mut s = surface(10, 10);
        Painter::new(&mut s).fill_rect(2.0, 2.0, 4.0, 4.0, PackedRgba::WHITE);
        assert_eq!(s.painted_pixel_count(), 16);
        assert_eq!(s.get(1, 1), Some(PackedRgba::TRANSPARENT));
        assert_eq!(s.get(5, 5), Some(PackedRgba::WHITE));
    }

    #[test]
    fn rotation_moves_corners() {
        let mut s = surface(20, 20);
        let mut p = Painter::new(&mut s);
        p.set_transform(Transform::translate_rotate(10.0, 10.0, FRAC_PI_4));
        p.fill_rect(-2.0, -2.0, 4.0, 4.0, PackedRgba::WHITE);
        assert_eq!(s.get(10, 10), Some(PackedRgba::WHITE));
        // Unrotated corner pixel falls outside the diamond.
        assert_eq!(s.get(8, 8), Some(PackedRgba::TRANSPARENT));
    }

    #[test]
    fn triangle_either_winding() {
        let tri = [(0.0, -4.0), (4.0, 4.0), (-4.0, 4.0)];
        let mut cw = surface(20, 20);
        let mut p = Painter::new(&mut cw);
        p.set_transform(Transform::translate_rotate(10.0, 10.0, 0.0));
        p.fill_convex(&tri, PackedRgba::WHITE);

        let mut ccw = surface(20, 20);
        let mut reversed = tri;
        reversed.reverse();
        let mut p = Painter::new(&mut ccw);
        p.set_transform(Transform::translate_rotate(10.0, 10.0, 0.0));
        p.fill_convex(&reversed, PackedRgba::WHITE);

        assert!(cw.painted_pixel_count() > 0);
        assert_eq!(cw, ccw);
    }

    #[test]
    fn global_alpha_scales_source() {
        let mut s = surface(4, 4);
        let mut p = Painter::new(&mut s);
        p.set_alpha(0.4);
        p.plot(1, 1, PackedRgba::WHITE);
        assert_eq!(s.get(1, 1).map(PackedRgba::a), Some(102));
    }

    #[test]
    fn lighter_blend_accumulates() {
        let mut s = surface(4, 4);
        let mut p = Painter::new(&mut s);
        p.set_blend(BlendMode::Lighter);
        p.plot(0, 0, PackedRgba::rgb(100, 0, 0));
        p.plot(0, 0, PackedRgba::rgb(100, 0, 0));
        assert_eq!(s.get(0, 0), Some(PackedRgba::rgb(200, 0, 0)));
    }

    #[test]
    fn hairline_diagonal() {
        let mut s = surface(8, 8);
        Painter::new(&mut s).line(0.5, 0.5, 4.5, 4.5, 1.0, PackedRgba::WHITE);
        assert_eq!(s.painted_pixel_count(), 5);
        for i in 0..5 {
            assert_eq!(s.get(i, i), Some(PackedRgba::WHITE));
        }
    }

    #[test]
    fn thick_horizontal_line_covers_two_rows() {
        let mut s = surface(12, 12);
        Painter::new(&mut s).line(0.0, 5.0, 9.0, 5.0, 1.5, PackedRgba::WHITE);
        assert_eq!(s.painted_pixel_count(), 20);
        assert_eq!(s.get(3, 4), Some(PackedRgba::WHITE));
        assert_eq!(s.get(3, 5), Some(PackedRgba::WHITE));
        assert_eq!(s.get(3, 6), Some(PackedRgba::TRANSPARENT));
    }

    #[test]
    fn offscreen_shapes_are_clipped() {
        let mut s = surface(10, 10);
        let mut p = Painter::new(&mut s);
        p.fill_circle(-50.0, -50.0, 5.0, PackedRgba::WHITE);
        p.fill_rect(100.0, 100.0, 5.0, 5.0, PackedRgba::WHITE);
        p.line(-1e9, -1e9, -1e9 + 1.0, 1e9, 1.5, PackedRgba::WHITE);
        p.line(f64::NAN, 0.0, 5.0, 5.0, 1.5, PackedRgba::WHITE);
        assert_eq!(s.painted_pixel_count(), 0);
    }

    #[test]
    fn long_line_is_clipped_to_surface() {
        let mut s = surface(10, 10);
        Painter::new(&mut s).line(-1e6, 5.0, 1e6, 5.0, 1.5, PackedRgba::WHITE);
        assert_eq!(s.painted_pixel_count(), 20);
    }

    #[test]
    fn zero_area_surface_is_safe() {
        let mut s = surface(0, 0);
        let mut p = Painter::new(&mut s);
        p.fill_circle(0.0, 0.0, 3.0, PackedRgba::WHITE);
        p.fill_rect(0.0, 0.0, 3.0, 3.0, PackedRgba::WHITE);
        p.line(0.0, 0.0, 3.0, 3.0, 1.5, PackedRgba::WHITE);
        assert!(s.pixels().is_empty());
    }
}
