#![forbid(unsafe_code)]

//! Rasterizes a [`ParticleField`] onto a [`Surface`].

use drift_render::painter::Transform;
use drift_render::{BlendMode, PackedRgba, Painter, Surface};

use crate::field::{Confetti, ConfettiShape, MeshNode, ParticleField};
use crate::profile::{MeshStyle, SimulationProfile};

/// Halo size relative to the item's base size.
pub const HALO_SCALE: f64 = 1.5;
pub const HALO_ALPHA: f32 = 0.4;
pub const SPECULAR_ALPHA: f32 = 0.9;
/// Specular dot radius as a fraction of item size.
pub const SPECULAR_RATIO: f64 = 1.0 / 6.0;

/// Opacity of a connection line between two nodes `distance` apart.
///
/// `(1 - distance / connect_distance) * max`, clamped to `[0, max]`; zero at
/// or beyond `connect_distance`.
#[must_use]
pub fn connection_opacity(distance: f64, connect_distance: f64, max: f32) -> f32 {
    if connect_distance <= 0.0 || distance.is_nan() || distance >= connect_distance {
        return 0.0;
    }
    let t = (1.0 - distance / connect_distance) as f32;
    (t * max).clamp(0.0, max)
}

/// Visit every unordered node pair (`i < j`) closer than `connect_distance`,
/// passing the pair and their distance.
pub fn for_each_connection<F>(nodes: &[MeshNode], connect_distance: f64, mut visit: F)
where
    F: FnMut(&MeshNode, &MeshNode, f64),
{
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            let dist = (a.x - b.x).hypot(a.y - b.y);
            if dist < connect_distance {
                visit(a, b, dist);
            }
        }
    }
}

/// Clear `surface` to `clear` and draw the whole field.
pub fn render(
    surface: &mut Surface,
    field: &ParticleField,
    profile: &SimulationProfile,
    clear: PackedRgba,
) {
    surface.clear(clear);
    let mut painter = Painter::new(surface);
    match field {
        ParticleField::Antigravity(items) => {
            painter.set_blend(BlendMode::Lighter);
            for item in items {
                draw_confetti(&mut painter, item);
            }
        }
        ParticleField::EtherMesh(nodes) => {
            let style = profile.mesh_style();
            painter.set_blend(BlendMode::Over);
            for node in nodes {
                draw_node(&mut painter, node, &style);
            }
            draw_connections(&mut painter, nodes, &style);
        }
    }
}

/// Fill one confetti shape around the current origin. Circles use `radius`;
/// squares and triangles use `side`.
fn fill_shape(
    painter: &mut Painter<'_>,
    shape: ConfettiShape,
    radius: f64,
    side: f64,
    color: PackedRgba,
) {
    let half = side / 2.0;
    match shape {
        ConfettiShape::Circle => painter.fill_circle(0.0, 0.0, radius, color),
        ConfettiShape::Square => painter.fill_rect(-half, -half, side, side, color),
        ConfettiShape::Triangle => {
            painter.fill_convex(&[(0.0, -half), (half, half), (-half, half)], color);
        }
    }
}

fn draw_confetti(painter: &mut Painter<'_>, item: &Confetti) {
    let s = item.size;
    painter.set_transform(Transform::translate_rotate(item.x, item.y, item.rotation));

    let halo = s * HALO_SCALE;
    painter.set_alpha(HALO_ALPHA);
    fill_shape(painter, item.shape, halo, halo, item.color);

    painter.set_alpha(1.0);
    fill_shape(painter, item.shape, s / 2.0, s, item.color);

    painter.set_alpha(SPECULAR_ALPHA);
    painter.fill_circle(0.0, 0.0, s * SPECULAR_RATIO, PackedRgba::WHITE);

    painter.set_alpha(1.0);
    painter.reset_transform();
}

fn draw_node(painter: &mut Painter<'_>, node: &MeshNode, style: &MeshStyle) {
    painter.fill_circle(node.x, node.y, node.size, node.color);
    painter.stroke_circle(
        node.x,
        node.y,
        node.size + style.ring_offset,
        style.ring_width,
        style.ring_color,
    );
}

fn draw_connections(painter: &mut Painter<'_>, nodes: &[MeshNode], style: &MeshStyle) {
    for_each_connection(nodes, style.connect_distance, |a, b, dist| {
        let opacity = connection_opacity(dist, style.connect_distance, style.line_opacity_max);
        if opacity > 0.0 {
            painter.line(
                a.x,
                a.y,
                b.x,
                b.y,
                style.line_width,
                style.line_color.with_opacity(opacity),
            );
        }
    });
}
