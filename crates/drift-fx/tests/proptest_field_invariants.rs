//! Property-based invariant tests for particle fields and physics.
//!
//! 1. Item counts follow the compact/wide thresholds for any viewport.
//! 2. Re-initializing yields the same cardinality regardless of seed.
//! 3. Mesh anchors never change, whatever the pointer does.
//! 4. Toroidal wrap is idempotent and lands within the margin band.
//! 5. Connection opacity is monotonically non-increasing in distance,
//!    0.4 at zero distance and 0 at or beyond 180.
//! 6. A pointer sitting on a node's anchor repels with magnitude 20 while
//!    the spring contributes nothing.
//! 7. Stepping and rendering never panic on arbitrary (small) viewports.

use drift_core::{ThemeMode, Viewport};
use drift_fx::field::{MeshGrid, antigravity_count};
use drift_fx::paint::connection_opacity;
use drift_fx::physics::{self, WRAP_MARGIN, repulsion, spring, wrap_position};
use drift_fx::{ParticleField, PointerSample, Scene, SimulationProfile};
use drift_render::{PackedRgba, Surface};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

// ── Helpers ─────────────────────────────────────────────────────────────

fn theme_strategy() -> impl Strategy<Value = ThemeMode> {
    prop_oneof![Just(ThemeMode::Dark), Just(ThemeMode::Light)]
}

fn pointer_strategy() -> impl Strategy<Value = PointerSample> {
    (
        -500.0f64..2500.0,
        -500.0f64..1500.0,
        -40.0f64..40.0,
        -40.0f64..40.0,
    )
        .prop_map(|(x, y, vx, vy)| PointerSample::new(x, y, vx, vy))
}

fn init(viewport: Viewport, theme: ThemeMode, seed: u64) -> ParticleField {
    let mut rng = StdRng::seed_from_u64(seed);
    ParticleField::initialize(viewport, &SimulationProfile::for_theme(theme), &mut rng)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Item counts follow thresholds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn counts_follow_thresholds(w in 0u32..2600, h in 0u32..1600, seed in any::<u64>()) {
        let vp = Viewport::new(w, h);

        let dark = init(vp, ThemeMode::Dark, seed);
        let expected = if w < 768 { 80 } else { 180 };
        prop_assert_eq!(dark.len(), expected);
        prop_assert_eq!(antigravity_count(vp), expected);

        let light = init(vp, ThemeMode::Light, seed);
        let spacing = if w < 768 { 80 } else { 100 };
        let cols = w.div_ceil(spacing) as usize;
        let rows = h.div_ceil(spacing) as usize;
        prop_assert_eq!(light.len(), cols * rows);
        prop_assert_eq!(MeshGrid::for_viewport(vp).node_count(), cols * rows);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Re-initialization keeps cardinality
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reinit_keeps_cardinality(
        w in 0u32..2600,
        h in 0u32..1600,
        theme in theme_strategy(),
        a in any::<u64>(),
        b in any::<u64>(),
    ) {
        let vp = Viewport::new(w, h);
        prop_assert_eq!(init(vp, theme, a).len(), init(vp, theme, b).len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Mesh anchors are immutable
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn anchors_never_move(
        seed in any::<u64>(),
        pointers in prop::collection::vec(pointer_strategy(), 1..40),
    ) {
        let vp = Viewport::new(900, 700);
        let mut field = init(vp, ThemeMode::Light, seed);
        let before: Vec<(f64, f64)> = field
            .nodes()
            .unwrap_or_default()
            .iter()
            .map(|n| n.anchor())
            .collect();

        let mut rng = StdRng::seed_from_u64(seed);
        for (tick, p) in pointers.iter().enumerate() {
            physics::step(&mut field, p, vp, tick as f64 * 16.7, &mut rng);
        }

        let after: Vec<(f64, f64)> = field
            .nodes()
            .unwrap_or_default()
            .iter()
            .map(|n| n.anchor())
            .collect();
        prop_assert_eq!(before, after);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Wrap is idempotent and bounded
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wrap_idempotent(
        w in 0u32..4000,
        h in 0u32..4000,
        x in -10_000.0f64..10_000.0,
        y in -10_000.0f64..10_000.0,
    ) {
        let vp = Viewport::new(w, h);
        let once = wrap_position(x, y, vp);
        prop_assert_eq!(wrap_position(once.0, once.1, vp), once);
        prop_assert!(once.0 >= -WRAP_MARGIN && once.0 <= f64::from(w) + WRAP_MARGIN);
        prop_assert!(once.1 >= -WRAP_MARGIN && once.1 <= f64::from(h) + WRAP_MARGIN);
    }
}

proptest! {
    #[test]
    fn inside_band_is_untouched(
        w in 1u32..4000,
        h in 1u32..4000,
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0,
    ) {
        let vp = Viewport::new(w, h);
        let x = -WRAP_MARGIN + fx * (f64::from(w) + 2.0 * WRAP_MARGIN);
        let y = -WRAP_MARGIN + fy * (f64::from(h) + 2.0 * WRAP_MARGIN);
        prop_assert_eq!(wrap_position(x, y, vp), (x, y));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Connection opacity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn opacity_monotonic(a in 0.0f64..400.0, b in 0.0f64..400.0) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        let o_near = connection_opacity(near, 180.0, 0.4);
        let o_far = connection_opacity(far, 180.0, 0.4);
        prop_assert!(o_near >= o_far);
        prop_assert!((0.0..=0.4).contains(&o_near));
        if far >= 180.0 {
            prop_assert_eq!(o_far, 0.0);
        }
    }
}

#[test]
fn opacity_at_zero_is_max() {
    assert_eq!(connection_opacity(0.0, 180.0, 0.4), 0.4);
    assert_eq!(connection_opacity(180.0, 180.0, 0.4), 0.0);
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Pointer on anchor
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pointer_on_anchor(seed in any::<u64>()) {
        let field = init(Viewport::new(1280, 720), ThemeMode::Light, seed);
        for node in field.nodes().unwrap_or_default() {
            let (ax, ay) = node.anchor();
            let p = PointerSample::new(ax, ay, 0.0, 0.0);
            let (fx, fy) = repulsion(&p, node.x, node.y);
            prop_assert!((fx.hypot(fy) - 20.0).abs() < 1e-9);
            prop_assert_eq!(spring(node), (0.0, 0.0));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. No panics
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn step_and_render_never_panic(
        w in 0u32..400,
        h in 0u32..300,
        theme in theme_strategy(),
        seed in any::<u64>(),
        pointer in pointer_strategy(),
    ) {
        let vp = Viewport::new(w, h);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut scene = Scene::build(theme, vp, &mut rng);
        let mut surface = Surface::new(vp);
        for tick in 0..3 {
            scene.step(&pointer, f64::from(tick) * 16.0, &mut rng);
            scene.render(&mut surface, PackedRgba::TRANSPARENT);
        }
        prop_assert_eq!(surface.pixels().len(), (w as usize) * (h as usize));
    }
}
