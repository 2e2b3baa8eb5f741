#![forbid(unsafe_code)]

//! Host input events.
//!
//! The embedding environment translates its native notifications (pointer
//! moves, window resizes, theme toggles) into [`Event`] values and pushes
//! them into the engine between ticks.

use crate::geometry::Viewport;
use crate::theme::ThemeMode;

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Pointer moved to `(x, y)` in viewport pixels.
    PointerMove {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// The drawing surface was resized.
    Resize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },

    /// The theme signal reported a new theme.
    ThemeChanged(ThemeMode),
}

impl Event {
    /// Build a resize event from a viewport.
    #[must_use]
    pub const fn resize(viewport: Viewport) -> Self {
        Self::Resize {
            width: viewport.width,
            height: viewport.height,
        }
    }

    /// Short, stable name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PointerMove { .. } => "pointer_move",
            Self::Resize { .. } => "resize",
            Self::ThemeChanged(_) => "theme_changed",
        }
    }
}
