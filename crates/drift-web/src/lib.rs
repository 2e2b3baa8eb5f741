#![forbid(unsafe_code)]

//! WASM host for the drift backdrop.
//!
//! Exposes a `DriftBackground` class to JavaScript. The page owns the
//! `requestAnimationFrame` loop and DOM listeners and forwards them:
//!
//! ```js
//! const bg = new DriftBackground('{"settle_delay_ms": 100}');
//! bg.attach(canvas, innerWidth, innerHeight, document.documentElement.dataset.theme);
//! addEventListener('mousemove', e => bg.pointerMove(e.clientX, e.clientY));
//! addEventListener('resize', () => bg.resize(innerWidth, innerHeight));
//! const loop = t => { if (bg.frame(t)) requestAnimationFrame(loop); };
//! requestAnimationFrame(loop);
//! ```

pub mod host;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::DriftBackground;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct DriftBackground;

#[cfg(not(target_arch = "wasm32"))]
impl DriftBackground {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
