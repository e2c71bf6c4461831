mod breakpoints;
mod detect;
mod fit;
mod metadata;
mod overlay;
mod settings;
mod stage_view;

#[cfg(feature = "events")]
pub mod events;

pub use self::breakpoints::{Breakpoint, Orientation, ViewportClass};
pub use self::detect::{OrientationSettle, ZoomPoll};
pub use self::fit::{compute_fit, DesignResolution, StagePlacement, ViewportState, BANNER_TOP};
pub use self::metadata::{reset_metadata, Metadata};
pub use self::overlay::{plan_overlay, OverlayKind, OverlayStyle};
pub use self::settings::{SettingsBreakpoints, SettingsDetect, SettingsFit};
pub use self::stage_view::{current_metadata, current_scale, reset, StageResponse, StageView};
