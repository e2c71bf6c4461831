use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::settings::SettingsFit;

/// Top offset of the non-scaled banner panel, in screen points from the
/// viewport top. The banner keeps a constant gap to the stage regardless of
/// the computed scale.
pub const BANNER_TOP: f32 = 250.;

/// The fixed (width, height) the layout was authored against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignResolution {
    pub width: f32,
    pub height: f32,
}

impl Default for DesignResolution {
    fn default() -> Self {
        Self {
            width: 1600.,
            height: 900.,
        }
    }
}

impl DesignResolution {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Snapshot of the hosting viewport taken on each recompute and discarded
/// right after use. Dimensions are clamped to be positive on construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub width: f32,
    pub height: f32,
    /// Zoom indicator. There is no change notification for it at the
    /// platform boundary, so it is polled (see [`crate::ZoomPoll`]).
    pub pixel_ratio: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            width: 1.,
            height: 1.,
            pixel_ratio: 1.,
        }
    }
}

impl ViewportState {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0. {
            pixel_ratio
        } else {
            1.
        };
        Self {
            width: width.max(1.),
            height: height.max(1.),
            pixel_ratio,
        }
    }

    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(self) -> Pos2 {
        Pos2::new(self.width / 2., self.height / 2.)
    }
}

/// Derived placement of the stage. Never stored as authoritative state; it is
/// always recomputed from the latest [`ViewportState`] and [`DesignResolution`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StagePlacement {
    /// Uniform scale applied to the stage.
    pub scale: f32,
    /// Screen rect the scaled stage occupies, centered on the viewport.
    pub rect: Rect,
    /// Top offset of the non-scaled banner panel.
    pub banner_top: f32,
}

impl Default for StagePlacement {
    fn default() -> Self {
        Self {
            scale: 1.,
            rect: Rect::ZERO,
            banner_top: BANNER_TOP,
        }
    }
}

/// Computes the uniform scale that fits the design resolution into the
/// viewport with the configured margin, and centers the stage rect.
///
/// `scale = min(vw / dw, vh / dh) * margin`, so the stage never exceeds the
/// viewport in either axis. The computation is pure and idempotent: identical
/// inputs produce identical placements.
pub fn compute_fit(settings: &SettingsFit, viewport: ViewportState) -> StagePlacement {
    let scale_x = viewport.width / settings.design.width;
    let scale_y = viewport.height / settings.design.height;

    let mut scale = scale_x.min(scale_y) * settings.margin;
    if !scale.is_finite() || scale <= 0. {
        scale = 1.;
    }

    let rect = Rect::from_center_size(viewport.center(), settings.design.size() * scale);

    StagePlacement {
        scale,
        rect,
        banner_top: BANNER_TOP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(w: f32, h: f32) -> StagePlacement {
        compute_fit(&SettingsFit::default(), ViewportState::new(w, h, 1.))
    }

    #[test]
    fn scale_matches_design_resolution() {
        let p = fit(1600., 900.);
        assert_eq!(p.scale, 0.95);
    }

    #[test]
    fn scale_half_design_resolution() {
        let p = fit(800., 450.);
        assert_eq!(p.scale, 0.475);
    }

    #[test]
    fn scale_width_constrained() {
        let p = fit(300., 900.);
        assert_eq!(p.scale, 0.178_125);
    }

    #[test]
    fn stage_fits_viewport_with_margin() {
        for (w, h) in [
            (1600., 900.),
            (800., 450.),
            (300., 900.),
            (2560., 1440.),
            (1., 1.),
            (5000., 100.),
        ] {
            let p = fit(w, h);
            assert!(p.scale > 0.);
            assert!(p.rect.width() <= w, "width overflow at {w}x{h}");
            assert!(p.rect.height() <= h, "height overflow at {w}x{h}");
        }
    }

    #[test]
    fn stage_is_centered() {
        let p = fit(1234., 567.);
        let center = p.rect.center();
        assert!((center.x - 617.).abs() < 1e-3);
        assert!((center.y - 283.5).abs() < 1e-3);
    }

    #[test]
    fn recompute_is_idempotent() {
        let viewport = ViewportState::new(1024., 768., 1.25);
        let a = compute_fit(&SettingsFit::default(), viewport);
        let b = compute_fit(&SettingsFit::default(), viewport);
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_viewport_is_clamped() {
        let v = ViewportState::new(-100., 0., f32::NAN);
        assert_eq!(v.width, 1.);
        assert_eq!(v.height, 1.);
        assert_eq!(v.pixel_ratio, 1.);

        let p = compute_fit(&SettingsFit::default(), v);
        assert!(p.scale > 0.);
    }
}
