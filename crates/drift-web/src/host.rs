#![forbid(unsafe_code)]

//! Platform-independent pieces of the JS bridge.

use drift_core::{ThemeMode, Viewport};
use drift_render::Surface;
use drift_runtime::{ConfigError, EngineConfig};

/// Engine config from the optional JSON options string passed to the
/// constructor. Absent or blank options mean defaults.
pub fn config_from_options(options: Option<&str>) -> Result<EngineConfig, ConfigError> {
    match options.map(str::trim) {
        None | Some("") => Ok(EngineConfig::default()),
        Some(json) => EngineConfig::from_json(json),
    }
}

/// Theme from the page's `data-theme` attribute.
///
/// The page leaves the attribute unset for its default dark theme, so an
/// absent value reads as dark, as does anything other than `"light"`.
#[must_use]
pub fn theme_from_attribute(attr: Option<&str>) -> ThemeMode {
    ThemeMode::from_attribute(attr)
}

/// Canvas size for a requested viewport, clamped to what a [`Surface`] holds.
#[must_use]
pub fn canvas_viewport(width: u32, height: u32) -> Viewport {
    Surface::clamp_viewport(Viewport::new(width, height))
}

/// Strict theme name parse for `setTheme`.
pub fn parse_theme(name: &str) -> Result<ThemeMode, String> {
    name.parse::<ThemeMode>().map_err(|e| e.to_string())
}
