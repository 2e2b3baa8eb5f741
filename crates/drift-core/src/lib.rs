#![forbid(unsafe_code)]

//! Core: viewport geometry, pointer tracking, theme signal, and host events.

pub mod event;
pub mod geometry;
pub mod pointer;
pub mod theme;

pub use event::Event;
pub use geometry::Viewport;
pub use pointer::PointerTracker;
pub use theme::{ThemeMode, ThemeSignal};
