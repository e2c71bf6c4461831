use std::time::Duration;

use crate::fit::DesignResolution;

/// Fit computation settings.
#[derive(Debug, Clone)]
pub struct SettingsFit {
    /// Resolution the stage content was authored against.
    pub design: DesignResolution,

    /// Margin coefficient applied to the fitted scale, < 1 so the stage keeps
    /// a visible gap to the viewport edge on the constraining axis.
    pub margin: f32,
}

impl Default for SettingsFit {
    fn default() -> Self {
        Self {
            design: DesignResolution::default(),
            margin: 0.95,
        }
    }
}

/// Viewport-width thresholds separating the overlay breakpoints.
#[derive(Debug, Clone)]
pub struct SettingsBreakpoints {
    /// Below this width the viewport is `Tiny`.
    pub tiny: f32,

    /// Below this width (and at least `tiny`) the viewport is `Mobile`.
    pub mobile: f32,

    /// Below this width (and at least `mobile`) the viewport is `Small`;
    /// everything wider is `Standard`.
    pub small: f32,
}

impl Default for SettingsBreakpoints {
    fn default() -> Self {
        Self {
            tiny: 350.,
            mobile: 480.,
            small: 768.,
        }
    }
}

/// Change-detection timing.
#[derive(Debug, Clone)]
pub struct SettingsDetect {
    /// How often the zoom indicator is sampled.
    pub zoom_poll_interval: Duration,

    /// Delay between an observed orientation flip and the recompute it
    /// schedules, letting the platform finish its own reflow first.
    pub orientation_settle: Duration,
}

impl Default for SettingsDetect {
    fn default() -> Self {
        Self {
            zoom_poll_interval: Duration::from_millis(500),
            orientation_settle: Duration::from_millis(200),
        }
    }
}
