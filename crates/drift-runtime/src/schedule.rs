#![forbid(unsafe_code)]

//! Deferred rebuild scheduling.
//!
//! Rebuilds never happen mid-tick. Resizes and explicit requests are applied
//! at the next tick boundary; theme changes wait for a settle delay first.
//! A theme change arriving while another is pending re-arms the deadline and
//! the latest theme wins.

use std::time::Duration;

use drift_core::ThemeMode;

/// Why a scene was rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildReason {
    Start,
    Resize,
    Theme,
    Manual,
}

impl RebuildReason {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Resize => "resize",
            Self::Theme => "theme",
            Self::Manual => "manual",
        }
    }
}

/// A rebuild that is due now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rebuild {
    pub reason: RebuildReason,
    /// Theme to rebuild with; `None` keeps the current one.
    pub theme: Option<ThemeMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTheme {
    theme: ThemeMode,
    deadline: Duration,
}

/// Tracks pending rebuild requests between ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildSchedule {
    settle_delay: Duration,
    pending_theme: Option<PendingTheme>,
    resize_pending: bool,
    manual_pending: bool,
}

impl RebuildSchedule {
    #[must_use]
    pub const fn new(settle_delay: Duration) -> Self {
        Self {
            settle_delay,
            pending_theme: None,
            resize_pending: false,
            manual_pending: false,
        }
    }

    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Rebuild at the next tick boundary for a new viewport.
    pub fn request_resize(&mut self) {
        self.resize_pending = true;
    }

    /// Rebuild at the next tick boundary with the current theme.
    pub fn request_manual(&mut self) {
        self.manual_pending = true;
    }

    /// Rebuild with `theme` once `now + settle_delay` has passed.
    pub fn request_theme(&mut self, theme: ThemeMode, now: Duration) {
        let deadline = now.saturating_add(self.settle_delay);
        if let Some(prev) = self.pending_theme {
            tracing::debug!(
                from = prev.theme.name(),
                to = theme.name(),
                "theme change superseded pending rebuild"
            );
        }
        self.pending_theme = Some(PendingTheme { theme, deadline });
    }

    /// Deadline of the pending theme rebuild, if any.
    #[must_use]
    pub fn theme_deadline(&self) -> Option<Duration> {
        self.pending_theme.map(|p| p.deadline)
    }

    /// Theme waiting to be applied, if any.
    #[must_use]
    pub fn pending_theme(&self) -> Option<ThemeMode> {
        self.pending_theme.map(|p| p.theme)
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending_theme.is_none() && !self.resize_pending && !self.manual_pending
    }

    /// Drop every pending request.
    pub fn clear(&mut self) {
        self.pending_theme = None;
        self.resize_pending = false;
        self.manual_pending = false;
    }

    /// Take the rebuild that is due at `now`, if any.
    ///
    /// A due theme rebuild subsumes any resize or manual request. A pending
    /// theme that is not yet due stays pending across other rebuilds.
    pub fn take_due(&mut self, now: Duration) -> Option<Rebuild> {
        if let Some(pending) = self.pending_theme
            && now >= pending.deadline
        {
            self.clear();
            return Some(Rebuild {
                reason: RebuildReason::Theme,
                theme: Some(pending.theme),
            });
        }
        let reason = if self.resize_pending {
            RebuildReason::Resize
        } else if self.manual_pending {
            RebuildReason::Manual
        } else {
            return None;
        };
        self.resize_pending = false;
        self.manual_pending = false;
        Some(Rebuild {
            reason,
            theme: None,
        })
    }
}
