use serde::{Deserialize, Serialize};

use crate::{settings::SettingsBreakpoints, ViewportState};

/// Named viewport-width range driving the discrete overlay styling rules.
///
/// Classification is total and non-overlapping: exactly one breakpoint holds
/// for any width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Breakpoint {
    Tiny,
    Mobile,
    Small,
    Standard,
}

impl Breakpoint {
    pub fn classify(width: f32, settings: &SettingsBreakpoints) -> Self {
        if width < settings.tiny {
            Self::Tiny
        } else if width < settings.mobile {
            Self::Mobile
        } else if width < settings.small {
            Self::Small
        } else {
            Self::Standard
        }
    }

    /// Whether overlays use the compact (below-trigger, full-width) rules.
    pub fn is_compact(self) -> bool {
        !matches!(self, Self::Standard)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn of(width: f32, height: f32) -> Self {
        if width > height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }
}

/// Discrete classification of a viewport snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportClass {
    pub breakpoint: Breakpoint,
    pub orientation: Orientation,
}

impl Default for ViewportClass {
    fn default() -> Self {
        Self {
            breakpoint: Breakpoint::Standard,
            orientation: Orientation::Landscape,
        }
    }
}

impl ViewportClass {
    pub fn of(viewport: ViewportState, settings: &SettingsBreakpoints) -> Self {
        Self {
            breakpoint: Breakpoint::classify(viewport.width, settings),
            orientation: Orientation::of(viewport.width, viewport.height),
        }
    }
}
