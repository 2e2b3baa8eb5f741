#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Every field has a default, so `{}` is a valid config. Hosts either build
//! one with the `with_*` methods or parse the JSON options string they were
//! handed.
//!
//! ```
//! use drift_runtime::EngineConfig;
//!
//! let config = EngineConfig::from_json(r#"{ "settle_delay_ms": 250, "seed": 7 }"#).unwrap();
//! assert_eq!(config, EngineConfig::default().with_settle_delay_ms(250).with_seed(7));
//! ```

use std::fmt;
use std::time::Duration;

use drift_render::{ColorParseError, PackedRgba};
use serde::{Deserialize, Serialize};

/// Default delay between a theme change and the rebuild it triggers.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 100;
/// Longest accepted settle delay.
pub const MAX_SETTLE_DELAY_MS: u64 = 10_000;

/// Configuration for [`crate::Engine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Theme-change settle delay in milliseconds.
    pub settle_delay_ms: u64,
    /// RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Hex color the surface is cleared to each frame; `None` = transparent.
    pub clear_color: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            seed: None,
            clear_color: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON options object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_settle_delay_ms(mut self, ms: u64) -> Self {
        self.settle_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_clear_color(mut self, hex: impl Into<String>) -> Self {
        self.clear_color = Some(hex.into());
        self
    }

    /// Check ranges and parse the clear color.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.settle_delay_ms > MAX_SETTLE_DELAY_MS {
            return Err(ConfigError::SettleDelayTooLong {
                ms: self.settle_delay_ms,
            });
        }
        self.clear_color()?;
        Ok(())
    }

    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// The parsed clear color.
    pub fn clear_color(&self) -> Result<PackedRgba, ConfigError> {
        match &self.clear_color {
            None => Ok(PackedRgba::TRANSPARENT),
            Some(hex) => PackedRgba::from_hex(hex).map_err(ConfigError::ClearColor),
        }
    }
}

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The options string was not a valid config object.
    Parse(String),
    /// `settle_delay_ms` exceeds [`MAX_SETTLE_DELAY_MS`].
    SettleDelayTooLong { ms: u64 },
    /// `clear_color` is not a hex color.
    ClearColor(ColorParseError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid engine config: {msg}"),
            Self::SettleDelayTooLong { ms } => write!(
                f,
                "settle_delay_ms {ms} exceeds maximum of {MAX_SETTLE_DELAY_MS}"
            ),
            Self::ClearColor(e) => write!(f, "invalid clear_color: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ClearColor(e) => Some(e),
            _ => None,
        }
    }
}
