#![forbid(unsafe_code)]

//! Particle simulations behind the drift backdrop.
//!
//! Two modes share one pipeline: a [`SimulationProfile`] picks the palette
//! and styling, [`ParticleField::initialize`] builds the item population,
//! [`physics::step`] advances it one tick, and [`paint::render`] draws it onto
//! a [`drift_render::Surface`]. [`Scene`] bundles the three for callers that
//! just want "theme + viewport in, pixels out".

pub mod field;
pub mod paint;
pub mod physics;
pub mod profile;
pub mod scene;

pub use field::{Confetti, ConfettiShape, MeshNode, ParticleField};
pub use physics::PointerSample;
pub use profile::{MeshStyle, Palette, ProfileError, SimulationProfile};
pub use scene::Scene;
