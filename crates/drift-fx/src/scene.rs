#![forbid(unsafe_code)]

//! Profile + field + viewport, kept consistent with each other.

use drift_core::{ThemeMode, Viewport};
use drift_render::{PackedRgba, Surface};
use rand::Rng;

use crate::field::ParticleField;
use crate::paint;
use crate::physics::{self, PointerSample};
use crate::profile::SimulationProfile;

/// A live simulation: the active profile, its population, and the viewport it
/// was built for.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    theme: ThemeMode,
    profile: SimulationProfile,
    field: ParticleField,
    viewport: Viewport,
}

impl Scene {
    /// Build the stock profile for `theme` and populate it.
    pub fn build<R: Rng + ?Sized>(theme: ThemeMode, viewport: Viewport, rng: &mut R) -> Self {
        Self::with_profile(theme, SimulationProfile::for_theme(theme), viewport, rng)
    }

    /// Populate a caller-supplied profile.
    pub fn with_profile<R: Rng + ?Sized>(
        theme: ThemeMode,
        profile: SimulationProfile,
        viewport: Viewport,
        rng: &mut R,
    ) -> Self {
        let field = ParticleField::initialize(viewport, &profile, rng);
        Self {
            theme,
            profile,
            field,
            viewport,
        }
    }

    /// Discard every item and rebuild for `theme` on `viewport`.
    pub fn rebuild<R: Rng + ?Sized>(&mut self, theme: ThemeMode, viewport: Viewport, rng: &mut R) {
        *self = Self::build(theme, viewport, rng);
    }

    /// One physics tick.
    pub fn step<R: Rng + ?Sized>(&mut self, pointer: &PointerSample, t_ms: f64, rng: &mut R) {
        physics::step(&mut self.field, pointer, self.viewport, t_ms, rng);
    }

    /// Clear and repaint `surface`.
    pub fn render(&self, surface: &mut Surface, clear: PackedRgba) {
        paint::render(surface, &self.field, &self.profile, clear);
    }

    #[must_use]
    pub const fn theme(&self) -> ThemeMode {
        self.theme
    }

    #[must_use]
    pub fn profile(&self) -> &SimulationProfile {
        &self.profile
    }

    #[must_use]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }
}
