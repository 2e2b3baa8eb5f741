//! Property-based invariant tests for colors and rasterization.
//!
//! 1. `over` with an opaque source is the source; a transparent source is a no-op.
//! 2. `lighter` never lowers destination alpha.
//! 3. `#rrggbbaa` formatting parses back to the same color.
//! 4. Shapes entirely outside the surface paint nothing.
//! 5. Painting is deterministic: equal draw lists give equal checksums.
//! 6. RGBA export is always `4 * width * height` bytes.
//! 7. No panics on extreme or non-finite coordinates.

use drift_core::Viewport;
use drift_render::{BlendMode, PackedRgba, Painter, Surface};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn color_strategy() -> impl Strategy<Value = PackedRgba> {
    any::<u32>().prop_map(PackedRgba)
}

fn coord() -> impl Strategy<Value = f64> {
    -200.0f64..400.0
}

fn extreme_coord() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(f64::MAX),
        Just(-f64::MAX),
        -1e12f64..1e12,
    ]
}

fn paint_scene(surface: &mut Surface, ops: &[(f64, f64, f64, PackedRgba)], blend: BlendMode) {
    let mut p = Painter::new(surface);
    p.set_blend(blend);
    for &(x, y, r, c) in ops {
        p.fill_circle(x, y, r, c);
        p.line(x, y, y, x, 1.5, c);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. over identities
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn over_identities(src in color_strategy(), dst in color_strategy()) {
        prop_assert_eq!(src.with_alpha(255).over(dst), src.with_alpha(255));
        prop_assert_eq!(src.with_alpha(0).over(dst), dst);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. lighter accumulates alpha
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lighter_never_lowers_alpha(src in color_strategy(), dst in color_strategy()) {
        let out = src.lighter(dst);
        prop_assert!(out.a() >= dst.a(), "{:?} lighter {:?} = {:?}", src, dst, out);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Hex round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn hex_round_trip(c in color_strategy()) {
        let hex = format!("#{:02x}{:02x}{:02x}{:02x}", c.r(), c.g(), c.b(), c.a());
        prop_assert_eq!(PackedRgba::from_hex(&hex), Ok(c));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Off-surface shapes paint nothing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn offscreen_circle_paints_nothing(
        r in 0.5f64..40.0,
        gap in 1.0f64..100.0,
        y in 0.0f64..100.0,
        c in color_strategy(),
    ) {
        let mut surface = Surface::new(Viewport::new(100, 100));
        let mut p = Painter::new(&mut surface);
        p.fill_circle(-r - gap, y, r, c.with_alpha(255));
        p.fill_circle(100.0 + r + gap, y, r, c.with_alpha(255));
        prop_assert_eq!(surface.painted_pixel_count(), 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn equal_draws_equal_checksums(
        ops in prop::collection::vec((coord(), coord(), 0.0f64..30.0, color_strategy()), 0..12),
        lighter in any::<bool>(),
    ) {
        let blend = if lighter { BlendMode::Lighter } else { BlendMode::Over };
        let mut a = Surface::new(Viewport::new(160, 90));
        let mut b = Surface::new(Viewport::new(160, 90));
        paint_scene(&mut a, &ops, blend);
        paint_scene(&mut b, &ops, blend);
        prop_assert_eq!(a.checksum(), b.checksum());
        prop_assert_eq!(a.pixels(), b.pixels());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. RGBA export length
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rgba_export_length(w in 0u32..64, h in 0u32..64) {
        let surface = Surface::new(Viewport::new(w, h));
        let mut out = vec![1, 2, 3];
        surface.write_rgba_bytes(&mut out);
        prop_assert_eq!(out.len(), 4 * w as usize * h as usize);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. No panics
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn no_panic_on_extreme_coordinates(
        x0 in extreme_coord(),
        y0 in extreme_coord(),
        x1 in extreme_coord(),
        y1 in extreme_coord(),
        r in extreme_coord(),
        angle in extreme_coord(),
    ) {
        let mut surface = Surface::new(Viewport::new(32, 24));
        let mut p = Painter::new(&mut surface);
        let c = PackedRgba::rgba(200, 100, 50, 180);
        p.fill_circle(x0, y0, r, c);
        p.stroke_circle(x0, y0, r, 1.0, c);
        p.fill_rect(x0, y0, x1, y1, c);
        p.line(x0, y0, x1, y1, 1.0, c);
        p.line(x0, y0, x1, y1, 3.0, c);
        p.fill_convex(&[(x0, y0), (x1, y0), (x1, y1)], c);
        p.set_transform(drift_render::painter::Transform::translate_rotate(x0, y0, angle));
        p.fill_convex(&[(-3.0, -3.0), (3.0, -3.0), (0.0, 3.0)], c);
    }
}
