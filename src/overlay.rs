use egui::{Align2, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::{Breakpoint, Metadata, Orientation};

const HOLOGRAM_GAP_BELOW: f32 = 8.;
const HOLOGRAM_GAP_RIGHT: f32 = 20.;
const VIDEO_MAX_WIDTH: f32 = 1800.;
const DIALOG_TOP_FRACTION: f32 = 0.15;

/// Dependent overlay surfaces that size themselves from the published scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayKind {
    /// Editing dialog panel.
    Dialog,
    /// Full media panel centered on the viewport.
    VideoPanel,
    /// Floating panel pinned next to its trigger element.
    Hologram,
}

/// Structured style instructions for one overlay.
///
/// Produced by pure planning from [`Metadata`]; a thin application step
/// writes it to the presentation surface (an [`egui::Area`] or
/// [`egui::Window`]). Keeping the computation separate from the write is what
/// makes the rule tables testable without a live surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Anchor point in screen coordinates.
    pub anchor: Pos2,
    /// Which point of the overlay sits on the anchor.
    pub pivot: Align2,
    /// Pinned width, when the breakpoint table fixes one.
    pub width: Option<f32>,
    /// Upper bound on the overlay body.
    pub max_size: Vec2,
    /// Lower bound on the media body height.
    pub min_height: f32,
    /// Inner padding.
    pub padding: f32,
    /// Content scale, capped at 1 so overlays never scale up.
    pub scale: f32,
}

/// Derives the style instructions for one overlay from the published
/// metadata and, for trigger-anchored overlays, the trigger's screen rect.
///
/// Overlays pull this lazily when they become visible; nothing restyles a
/// hidden overlay. Returns `None` when a required trigger rect is missing,
/// skipping that overlay only.
pub fn plan_overlay(kind: OverlayKind, meta: &Metadata, trigger: Option<Rect>) -> Option<OverlayStyle> {
    match kind {
        OverlayKind::Dialog => Some(plan_dialog(meta)),
        OverlayKind::VideoPanel => Some(plan_video(meta)),
        OverlayKind::Hologram => trigger.map(|t| plan_hologram(meta, t)),
    }
}

fn plan_dialog(meta: &Metadata) -> OverlayStyle {
    let viewport = meta.viewport_rect();

    OverlayStyle {
        anchor: Pos2::new(
            viewport.center().x,
            viewport.top() + viewport.height() * DIALOG_TOP_FRACTION,
        ),
        pivot: Align2::CENTER_TOP,
        width: meta
            .class
            .breakpoint
            .is_compact()
            .then_some(meta.viewport.width),
        max_size: meta.viewport.size(),
        min_height: 0.,
        padding: 0.,
        scale: meta.scale.min(1.),
    }
}

fn plan_video(meta: &Metadata) -> OverlayStyle {
    let viewport = meta.viewport_rect();
    let breakpoint = meta.class.breakpoint;

    let (width, padding) = match breakpoint {
        Breakpoint::Tiny | Breakpoint::Mobile => (meta.viewport.width, 0.),
        Breakpoint::Small => (meta.viewport.width, 2.),
        Breakpoint::Standard => (meta.viewport.width.min(VIDEO_MAX_WIDTH), 0.),
    };

    let min_height = match (meta.class.orientation, breakpoint) {
        (Orientation::Landscape, Breakpoint::Tiny) => 200.,
        (Orientation::Portrait, Breakpoint::Tiny) => 220.,
        (Orientation::Landscape, _) | (Orientation::Portrait, Breakpoint::Mobile) => 250.,
        (Orientation::Portrait, _) => 350.,
    };

    let max_height_fraction = match meta.class.orientation {
        Orientation::Landscape => 0.70,
        Orientation::Portrait => 0.75,
    };

    OverlayStyle {
        anchor: viewport.center(),
        pivot: Align2::CENTER_CENTER,
        width: Some(width),
        max_size: Vec2::new(width, meta.viewport.height * max_height_fraction),
        min_height,
        padding,
        // Compact widths already fill the viewport; only the standard branch
        // carries the stage scale through, capped so the panel never grows
        // past its authored size.
        scale: if breakpoint.is_compact() {
            1.
        } else {
            meta.scale.min(1.)
        },
    }
}

fn plan_hologram(meta: &Metadata, trigger: Rect) -> OverlayStyle {
    let viewport = meta.viewport_rect();
    let breakpoint = meta.class.breakpoint;

    let width = match breakpoint {
        Breakpoint::Tiny => 240.,
        Breakpoint::Mobile => 280.,
        Breakpoint::Small | Breakpoint::Standard => 320.,
    };

    let (anchor, pivot, scale) = if breakpoint.is_compact() {
        // Below the trigger, horizontally centered on the viewport.
        (
            Pos2::new(viewport.center().x, trigger.bottom() + HOLOGRAM_GAP_BELOW),
            Align2::CENTER_TOP,
            1.,
        )
    } else {
        // To the right of the trigger, vertically centered on it.
        (
            Pos2::new(trigger.right() + HOLOGRAM_GAP_RIGHT, trigger.center().y),
            Align2::LEFT_CENTER,
            meta.scale.min(1.),
        )
    };

    OverlayStyle {
        anchor,
        pivot,
        width: Some(width),
        max_size: meta.viewport.size(),
        min_height: 0.,
        padding: 0.,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute_fit, SettingsBreakpoints, SettingsFit, ViewportClass, ViewportState};

    fn meta_for(w: f32, h: f32) -> Metadata {
        let viewport = ViewportState::new(w, h, 1.);
        let mut meta = Metadata::new(None);
        meta.apply(
            compute_fit(&SettingsFit::default(), viewport),
            viewport,
            ViewportClass::of(viewport, &SettingsBreakpoints::default()),
        );
        meta
    }

    #[test]
    fn tiny_viewport_selects_tiny_rules() {
        let meta = meta_for(300., 900.);
        assert_eq!(meta.class.breakpoint, Breakpoint::Tiny);

        let video = plan_overlay(OverlayKind::VideoPanel, &meta, None).unwrap();
        assert_eq!(video.width, Some(300.));
        assert_eq!(video.padding, 0.);
        assert_eq!(video.min_height, 220.);
        assert_eq!(video.scale, 1.);

        let holo = plan_overlay(
            OverlayKind::Hologram,
            &meta,
            Some(Rect::from_min_size(Pos2::new(10., 10.), Vec2::new(80., 30.))),
        )
        .unwrap();
        assert_eq!(holo.width, Some(240.));
        assert_eq!(holo.pivot, Align2::CENTER_TOP);
        assert_eq!(holo.anchor, Pos2::new(150., 48.));
    }

    #[test]
    fn small_viewport_pads_video_panel() {
        let meta = meta_for(600., 400.);
        assert_eq!(meta.class.breakpoint, Breakpoint::Small);

        let video = plan_overlay(OverlayKind::VideoPanel, &meta, None).unwrap();
        assert_eq!(video.padding, 2.);
        // Landscape, non-tiny.
        assert_eq!(video.min_height, 250.);
    }

    #[test]
    fn standard_viewport_anchors_hologram_right_of_trigger() {
        let meta = meta_for(1600., 900.);
        let trigger = Rect::from_min_size(Pos2::new(100., 200.), Vec2::new(120., 40.));

        let holo = plan_overlay(OverlayKind::Hologram, &meta, Some(trigger)).unwrap();
        assert_eq!(holo.pivot, Align2::LEFT_CENTER);
        assert_eq!(holo.anchor, Pos2::new(240., 220.));
        assert_eq!(holo.width, Some(320.));
        assert_eq!(holo.scale, 0.95);
    }

    #[test]
    fn hologram_without_trigger_is_skipped() {
        let meta = meta_for(1600., 900.);
        assert!(plan_overlay(OverlayKind::Hologram, &meta, None).is_none());
        assert!(plan_overlay(OverlayKind::Dialog, &meta, None).is_some());
    }

    #[test]
    fn overlay_scale_never_exceeds_one() {
        // A viewport far larger than the design resolution pushes the stage
        // scale past 1; overlays stay capped.
        let meta = meta_for(4000., 2400.);
        assert!(meta.scale > 1.);

        let video = plan_overlay(OverlayKind::VideoPanel, &meta, None).unwrap();
        assert_eq!(video.scale, 1.);

        let trigger = Rect::from_min_size(Pos2::ZERO, Vec2::new(50., 20.));
        let holo = plan_overlay(OverlayKind::Hologram, &meta, Some(trigger)).unwrap();
        assert_eq!(holo.scale, 1.);
    }

    #[test]
    fn video_panel_clamps_to_max_width() {
        let meta = meta_for(2400., 1400.);
        let video = plan_overlay(OverlayKind::VideoPanel, &meta, None).unwrap();
        assert_eq!(video.width, Some(1800.));
    }

    #[test]
    fn dialog_anchors_below_viewport_top() {
        let meta = meta_for(1600., 900.);
        let dialog = plan_overlay(OverlayKind::Dialog, &meta, None).unwrap();
        assert_eq!(dialog.anchor, Pos2::new(800., 135.));
        assert_eq!(dialog.width, None);

        let compact = meta_for(400., 700.);
        let dialog = plan_overlay(OverlayKind::Dialog, &compact, None).unwrap();
        assert_eq!(dialog.width, Some(400.));
    }
}
