use std::marker::PhantomData;

use egui::{Rect, Response, Sense, Ui, UiBuilder, Widget};
use instant::Instant;

use crate::{
    compute_fit,
    detect::DetectState,
    metadata::{reset_metadata, Metadata},
    settings::{SettingsBreakpoints, SettingsDetect, SettingsFit},
    ViewportClass, ViewportState,
};

#[cfg(feature = "events")]
use crate::events::{
    Event, EventSink, PayloadBreakpointChanged, PayloadOrientationChanged, PayloadScaleChanged,
    PayloadZoomIndicatorChanged,
};

/// Widget presenting UI authored at a fixed design resolution inside whatever
/// viewport the hosting `Ui` provides.
///
/// It implements [`egui::Widget`] and can be used like any other widget, or
/// through [`StageView::show`] when the caller wants to draw stage content.
///
/// Every frame the widget snapshots the viewport (size and pixel ratio), runs
/// the change detectors and, when a trigger fired (first frame, resize, zoom
/// indicator change, settled orientation flip), recomputes the placement:
/// `scale = min(vw / dw, vh / dh) * margin`, stage rect centered on the
/// viewport. The result is published as [`Metadata`] for dependent overlays
/// to read lazily when they open; overlays are never restyled while hidden.
///
/// Recomputation is idempotent, so a missed trigger is self-correcting: the
/// next one recomputes fresh from current viewport state.
pub struct StageView<'a> {
    settings_fit: SettingsFit,
    settings_breakpoints: SettingsBreakpoints,
    settings_detect: SettingsDetect,

    custom_id: Option<String>,

    #[cfg(feature = "events")]
    events_sink: Option<&'a dyn EventSink>,

    _marker: PhantomData<&'a ()>,
}

/// What [`StageView::show`] hands back: the closure result, the widget
/// response and the metadata published this frame.
pub struct StageResponse<R> {
    pub inner: R,
    pub response: Response,
    pub metadata: Metadata,
}

impl Default for StageView<'_> {
    fn default() -> Self {
        Self {
            settings_fit: SettingsFit::default(),
            settings_breakpoints: SettingsBreakpoints::default(),
            settings_detect: SettingsDetect::default(),

            custom_id: None,

            #[cfg(feature = "events")]
            events_sink: Option::default(),

            _marker: PhantomData,
        }
    }
}

impl<'a> StageView<'a> {
    /// Creates a new `StageView` widget with default fit, breakpoint and
    /// detection settings. To customize them use the `with_*` methods.
    pub fn new() -> Self {
        Self::default()
    }

    /// Modifies default fit settings (design resolution, margin coefficient).
    pub fn with_fit(mut self, settings_fit: &SettingsFit) -> Self {
        self.settings_fit = settings_fit.clone();
        self
    }

    /// Modifies default breakpoint thresholds.
    pub fn with_breakpoints(mut self, settings_breakpoints: &SettingsBreakpoints) -> Self {
        self.settings_breakpoints = settings_breakpoints.clone();
        self
    }

    /// Modifies default detection timing (zoom poll interval, orientation
    /// settle delay).
    pub fn with_detect(mut self, settings_detect: &SettingsDetect) -> Self {
        self.settings_detect = settings_detect.clone();
        self
    }

    /// Sets a custom unique ID for this widget instance. Useful when you have
    /// multiple stages in the same UI and want to keep their published state
    /// separate.
    pub fn with_id(mut self, custom_id: Option<String>) -> Self {
        self.custom_id = custom_id;
        self
    }

    #[cfg(feature = "events")]
    /// Supply a generic sink that will receive change events.
    /// Works with `crossbeam::channel::Sender<Event>`, closures `Fn(Event)`,
    /// or custom implementations.
    pub fn with_event_sink(mut self, sink: &'a dyn EventSink) -> Self {
        self.events_sink = Some(sink);
        self
    }

    /// Allocates the remaining space, recomputes and publishes the placement,
    /// then calls `add_contents` inside the scaled stage rect.
    ///
    /// The closure receives the published [`Metadata`]; content authored in
    /// design coordinates maps itself through
    /// [`Metadata::design_to_screen_pos`] and friends.
    pub fn show<R>(
        self,
        ui: &mut Ui,
        add_contents: impl FnOnce(&mut Ui, &Metadata) -> R,
    ) -> StageResponse<R> {
        let resp = ui.allocate_response(ui.available_size(), Sense::hover());

        let mut meta = Metadata::new(self.custom_id.clone()).load(ui);
        let mut detect = DetectState::load(ui, resp.id, &self.settings_detect);

        // A zero-sized allocation publishes nothing; the next real viewport
        // recomputes fresh.
        if resp.rect.width() > 0. && resp.rect.height() > 0. {
            let viewport = ViewportState::new(
                resp.rect.width(),
                resp.rect.height(),
                ui.ctx().pixels_per_point(),
            );
            let class = ViewportClass::of(viewport, &self.settings_breakpoints);

            let now = Instant::now();
            let zoom_changed = detect.zoom.sample(now, viewport.pixel_ratio);
            detect.orientation.observe(now, class.orientation);
            let settled = detect.orientation.fire(now);

            let resized = viewport.size() != meta.viewport.size();
            if meta.first_frame || resized || zoom_changed || settled {
                let placement = compute_fit(&self.settings_fit, viewport);

                #[cfg(feature = "events")]
                self.publish_changes(&meta, placement.scale, viewport, class);

                meta.apply(placement, viewport, class);
                meta.first_frame = false;
            }

            // The placement is computed in viewport-local coordinates; pin it
            // to wherever the widget actually sits this frame.
            let stage_rect = Rect::from_center_size(resp.rect.center(), meta.stage_rect.size());
            meta.stage_rect = stage_rect;
        }

        let inner = {
            let mut stage_ui = ui.new_child(UiBuilder::new().max_rect(meta.stage_rect));
            add_contents(&mut stage_ui, &meta)
        };

        // Keep frames coming while idle so the zoom poll cannot starve.
        ui.ctx().request_repaint_after(if detect.orientation.pending() {
            self.settings_detect.orientation_settle
        } else {
            self.settings_detect.zoom_poll_interval
        });

        detect.save(ui, resp.id);
        meta.clone().save(ui);

        StageResponse {
            inner,
            response: resp,
            metadata: meta,
        }
    }

    #[cfg(feature = "events")]
    fn publish_changes(
        &self,
        old: &Metadata,
        new_scale: f32,
        viewport: ViewportState,
        class: ViewportClass,
    ) {
        let Some(sink) = self.events_sink else {
            return;
        };
        // The first-frame fit establishes the baseline and is not a change.
        if old.first_frame {
            return;
        }

        if old.scale != new_scale {
            sink.send(Event::ScaleChanged(PayloadScaleChanged {
                diff: new_scale - old.scale,
                new_scale,
            }));
        }
        if old.class.breakpoint != class.breakpoint {
            sink.send(Event::BreakpointChanged(PayloadBreakpointChanged {
                new_breakpoint: class.breakpoint,
            }));
        }
        if old.class.orientation != class.orientation {
            sink.send(Event::OrientationChanged(PayloadOrientationChanged {
                new_orientation: class.orientation,
            }));
        }
        if old.viewport.pixel_ratio != viewport.pixel_ratio {
            sink.send(Event::ZoomIndicatorChanged(PayloadZoomIndicatorChanged {
                diff: viewport.pixel_ratio - old.viewport.pixel_ratio,
                new_ratio: viewport.pixel_ratio,
            }));
        }
    }
}

impl Widget for StageView<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        self.show(ui, |_, _| ()).response
    }
}

/// Helper to reset the published [`Metadata`]. Can be useful when you want to
/// force a fresh first-frame fit.
pub fn reset(ui: &mut Ui, id: Option<String>) {
    reset_metadata(ui, id);
}

/// Returns the currently published scale factor for overlay consumers.
pub fn current_scale(ui: &Ui, id: Option<String>) -> f32 {
    Metadata::new(id).load(ui).scale
}

/// Loads the currently published [`Metadata`]. Useful for overlay panels
/// deriving their style on open.
pub fn current_metadata(ui: &Ui, id: Option<String>) -> Metadata {
    Metadata::new(id).load(ui)
}
