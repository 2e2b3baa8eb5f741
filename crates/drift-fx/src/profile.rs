#![forbid(unsafe_code)]

//! Simulation profiles: which mode runs, with which colors.

use std::fmt;

use drift_core::ThemeMode;
use drift_render::PackedRgba;
use rand::Rng;

/// Antigravity confetti colors, in order.
pub const ANTIGRAVITY_COLORS: [PackedRgba; 6] = [
    PackedRgba::rgb(0x42, 0x85, 0xF4),
    PackedRgba::rgb(0xEA, 0x43, 0x35),
    PackedRgba::rgb(0xFB, 0xBC, 0x04),
    PackedRgba::rgb(0x34, 0xA8, 0x53),
    PackedRgba::rgb(0xFF, 0x6B, 0x6B),
    PackedRgba::rgb(0xA2, 0x9B, 0xFE),
];

/// Ether-mesh node colors: purple, deep purple, coral, soft grey, light grey.
pub const ETHER_MESH_COLORS: [PackedRgba; 5] = [
    PackedRgba::rgb(0x66, 0x7e, 0xea),
    PackedRgba::rgb(0x76, 0x4b, 0xa2),
    PackedRgba::rgb(0xff, 0x6b, 0x6b),
    PackedRgba::rgb(0xb2, 0xbe, 0xc3),
    PackedRgba::rgb(0xdf, 0xe6, 0xe9),
];

/// Mesh palette slots referenced by the node color ladder.
pub mod mesh_slot {
    pub const PURPLE: usize = 0;
    pub const DEEP_PURPLE: usize = 1;
    pub const CORAL: usize = 2;
    pub const LIGHT_GREY: usize = 4;
}

/// Errors from building a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileError {
    /// A palette must hold at least one color.
    EmptyPalette,
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPalette => write!(f, "palette must contain at least one color"),
        }
    }
}

impl std::error::Error for ProfileError {}

/// Ordered, non-empty color list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<PackedRgba>,
}

impl Palette {
    pub fn new(colors: Vec<PackedRgba>) -> Result<Self, ProfileError> {
        if colors.is_empty() {
            return Err(ProfileError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    #[must_use]
    pub fn antigravity() -> Self {
        Self {
            colors: ANTIGRAVITY_COLORS.to_vec(),
        }
    }

    #[must_use]
    pub fn ether_mesh() -> Self {
        Self {
            colors: ETHER_MESH_COLORS.to_vec(),
        }
    }

    #[must_use]
    pub fn colors(&self) -> &[PackedRgba] {
        &self.colors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `slot`, wrapping around for palettes shorter than the slot.
    #[must_use]
    pub fn get(&self, slot: usize) -> PackedRgba {
        self.colors[slot % self.colors.len()]
    }

    /// Uniform pick.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> PackedRgba {
        self.colors[rng.gen_range(0..self.colors.len())]
    }
}

/// Styling for the ether mesh: connection lines and node rings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStyle {
    /// Pairs closer than this are connected.
    pub connect_distance: f64,
    /// Opacity of a connection at zero distance.
    pub line_opacity_max: f32,
    pub line_color: PackedRgba,
    pub line_width: f64,
    pub ring_color: PackedRgba,
    pub ring_width: f64,
    /// Ring radius is node size plus this offset.
    pub ring_offset: f64,
}

impl Default for MeshStyle {
    fn default() -> Self {
        Self {
            connect_distance: 180.0,
            line_opacity_max: 0.4,
            line_color: PackedRgba::rgb(102, 126, 234),
            line_width: 1.5,
            ring_color: PackedRgba::rgba(102, 126, 234, 77),
            ring_width: 1.0,
            ring_offset: 3.0,
        }
    }
}

/// Which simulation runs, and its per-mode parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationProfile {
    Antigravity { palette: Palette },
    EtherMesh { palette: Palette, style: MeshStyle },
}

impl SimulationProfile {
    /// Dark themes float confetti; light themes draw the mesh.
    #[must_use]
    pub fn for_theme(theme: ThemeMode) -> Self {
        match theme {
            ThemeMode::Dark => Self::Antigravity {
                palette: Palette::antigravity(),
            },
            ThemeMode::Light => Self::EtherMesh {
                palette: Palette::ether_mesh(),
                style: MeshStyle::default(),
            },
        }
    }

    #[must_use]
    pub const fn mode_name(&self) -> &'static str {
        match self {
            Self::Antigravity { .. } => "antigravity",
            Self::EtherMesh { .. } => "ether-mesh",
        }
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        match self {
            Self::Antigravity { palette } | Self::EtherMesh { palette, .. } => palette,
        }
    }

    /// Mesh styling, or the stock style for non-mesh profiles.
    #[must_use]
    pub fn mesh_style(&self) -> MeshStyle {
        match self {
            Self::EtherMesh { style, .. } => *style,
            Self::Antigravity { .. } => MeshStyle::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn empty_palette_rejected() {
        assert_eq!(Palette::new(Vec::new()), Err(ProfileError::EmptyPalette));
        assert!(Palette::new(vec![PackedRgba::WHITE]).is_ok());
    }

    #[test]
    fn built_palettes_are_never_empty() {
        for palette in [
            Palette::antigravity(),
            Palette::ether_mesh(),
            Palette::new(vec![PackedRgba::BLACK]).unwrap(),
        ] {
            assert!(!palette.is_empty());
            assert_eq!(palette.len(), palette.colors().len());
        }
    }

    #[test]
    fn stock_palettes_match_hex_values() {
        let hex = |s: &str| PackedRgba::from_hex(s).unwrap();
        assert_eq!(Palette::antigravity().get(0), hex("#4285F4"));
        assert_eq!(Palette::antigravity().get(5), hex("#A29BFE"));
        assert_eq!(Palette::ether_mesh().get(mesh_slot::CORAL), hex("#ff6b6b"));
        assert_eq!(
            Palette::ether_mesh().get(mesh_slot::LIGHT_GREY),
            hex("#dfe6e9")
        );
    }

    #[test]
    fn get_wraps_short_palettes() {
        let p = Palette::new(vec![PackedRgba::BLACK, PackedRgba::WHITE]).unwrap();
        assert_eq!(p.get(mesh_slot::LIGHT_GREY), PackedRgba::BLACK);
        assert_eq!(p.get(mesh_slot::DEEP_PURPLE), PackedRgba::WHITE);
    }

    #[test]
    fn pick_stays_in_palette() {
        let p = Palette::antigravity();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(p.colors().contains(&p.pick(&mut rng)));
        }
    }

    #[test]
    fn theme_selects_profile() {
        let dark = SimulationProfile::for_theme(ThemeMode::Dark);
        let light = SimulationProfile::for_theme(ThemeMode::Light);
        assert_eq!(dark.mode_name(), "antigravity");
        assert_eq!(light.mode_name(), "ether-mesh");
        assert_eq!(dark.palette().len(), 6);
        assert_eq!(light.palette().len(), 5);
        let style = light.mesh_style();
        assert_eq!(style.connect_distance, 180.0);
        assert_eq!(style.line_width, 1.5);
        assert_eq!(style.ring_color.a(), 77);
    }
}
