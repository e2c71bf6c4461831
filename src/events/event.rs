use serde::{Deserialize, Serialize};

use crate::{Breakpoint, Orientation};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadScaleChanged {
    pub diff: f32,
    pub new_scale: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadBreakpointChanged {
    pub new_breakpoint: Breakpoint,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadOrientationChanged {
    pub new_orientation: Orientation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadZoomIndicatorChanged {
    pub diff: f32,
    pub new_ratio: f32,
}

/// Change notification published by the stage after a recompute.
///
/// Recomputes triggered by the first frame do not produce events; only later
/// changes of the derived values do.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    ScaleChanged(PayloadScaleChanged),
    BreakpointChanged(PayloadBreakpointChanged),
    OrientationChanged(PayloadOrientationChanged),
    ZoomIndicatorChanged(PayloadZoomIndicatorChanged),
}
