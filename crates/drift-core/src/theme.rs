#![forbid(unsafe_code)]

//! Theme mode and the theme-signal boundary.
//!
//! The page's theme toggle and its persisted preference live outside this
//! workspace. The engine only needs two things from them: the current
//! [`ThemeMode`] at startup (through [`ThemeSignal`]) and a notification when
//! it changes (delivered as [`crate::Event::ThemeChanged`]).

use std::fmt;
use std::str::FromStr;

/// Page theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeMode {
    /// Dark theme (default).
    #[default]
    Dark,
    /// Light theme.
    Light,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 2] = [ThemeMode::Dark, ThemeMode::Light];

    pub const fn name(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    /// The other theme.
    pub const fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// Map a `data-theme` style attribute to a theme.
    ///
    /// Only `"light"` selects the light theme; an absent or empty attribute
    /// (and anything else) is dark.
    pub fn from_attribute(attr: Option<&str>) -> Self {
        match attr.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("light") => ThemeMode::Light,
            _ => ThemeMode::Dark,
        }
    }

    /// Resolve the initial theme from a saved preference and the system
    /// color-scheme preference.
    ///
    /// Precedence: a recognized saved value, then the system preference.
    pub fn resolve(saved: Option<&str>, system_prefers_dark: bool) -> Self {
        if let Some(raw) = saved {
            match raw.parse::<ThemeMode>() {
                Ok(mode) => return mode,
                Err(err) => {
                    tracing::debug!(error = %err, "ignoring saved theme preference");
                }
            }
        }
        if system_prefers_dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown theme name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeParseError {
    input: String,
}

impl fmt::Display for ThemeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme {:?} (expected \"dark\" or \"light\")", self.input)
    }
}

impl std::error::Error for ThemeParseError {}

impl FromStr for ThemeMode {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("dark") {
            Ok(ThemeMode::Dark)
        } else if trimmed.eq_ignore_ascii_case("light") {
            Ok(ThemeMode::Light)
        } else {
            Err(ThemeParseError {
                input: s.to_owned(),
            })
        }
    }
}

/// Source of the current theme.
///
/// Returns `None` when the signal is unavailable (for example, the hosting
/// page has no theme state yet). The engine refuses to start in that case.
pub trait ThemeSignal {
    fn current_theme(&self) -> Option<ThemeMode>;
}

impl ThemeSignal for ThemeMode {
    fn current_theme(&self) -> Option<ThemeMode> {
        Some(*self)
    }
}

impl ThemeSignal for Option<ThemeMode> {
    fn current_theme(&self) -> Option<ThemeMode> {
        *self
    }
}
