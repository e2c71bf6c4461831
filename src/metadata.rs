use egui::{Id, Pos2, Rect, Ui};
use serde::{Deserialize, Serialize};

use crate::{StagePlacement, ViewportClass, ViewportState};

const KEY_PREFIX: &str = "egui_stage_metadata";

/// Published scale state of a stage.
///
/// The widget recomputes and saves it every frame; dependent overlays load it
/// lazily when they become visible. Overlays never mutate it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Metadata {
    /// Whether the frame is the first one
    pub first_frame: bool,
    /// Current published scale factor
    pub scale: f32,
    /// Screen rect the scaled stage occupies
    pub stage_rect: Rect,
    /// Top offset of the non-scaled banner panel
    pub banner_top: f32,
    /// Viewport snapshot the placement was derived from
    pub viewport: ViewportState,
    /// Discrete classification of that viewport
    pub class: ViewportClass,
    /// Custom key to identify the metadata
    id: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            first_frame: true,
            scale: 1.,
            stage_rect: Rect::ZERO,
            banner_top: crate::fit::BANNER_TOP,
            viewport: ViewportState::default(),
            class: ViewportClass::default(),
            id: String::new(),
        }
    }
}

impl Metadata {
    pub fn new(id: Option<String>) -> Self {
        Self {
            id: id.unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn load(self, ui: &Ui) -> Self {
        self.load_from_ctx(ui.ctx())
    }

    /// Same as [`Metadata::load`] for callers that only hold a [`egui::Context`],
    /// e.g. overlays positioned before any `Ui` exists.
    pub fn load_from_ctx(self, ctx: &egui::Context) -> Self {
        ctx.data_mut(|data| {
            data.get_persisted::<Metadata>(Id::new(self.get_key()))
                .unwrap_or(self)
        })
    }

    pub fn save(self, ui: &mut Ui) {
        ui.data_mut(|data| {
            data.insert_persisted(Id::new(self.get_key()), self);
        });
    }

    /// Adopts a freshly computed placement. The viewport snapshot is kept so
    /// the next frame can tell whether anything changed.
    pub fn apply(&mut self, placement: StagePlacement, viewport: ViewportState, class: ViewportClass) {
        self.scale = placement.scale;
        self.stage_rect = placement.rect;
        self.banner_top = placement.banner_top;
        self.viewport = viewport;
        self.class = class;
    }

    pub fn design_to_screen_pos(&self, pos: Pos2) -> Pos2 {
        (pos.to_vec2() * self.scale + self.stage_rect.min.to_vec2()).to_pos2()
    }

    pub fn design_to_screen_size(&self, size: f32) -> f32 {
        size * self.scale
    }

    pub fn screen_to_design_pos(&self, pos: Pos2) -> Pos2 {
        ((pos.to_vec2() - self.stage_rect.min.to_vec2()) / self.scale).to_pos2()
    }

    /// Screen rect of the viewport the placement was derived from; the stage
    /// sits centered in it.
    pub fn viewport_rect(&self) -> Rect {
        Rect::from_center_size(self.stage_rect.center(), self.viewport.size())
    }

    /// Get key which is used to store metadata in egui cache.
    pub fn get_key(&self) -> String {
        format!("{KEY_PREFIX}_{}", self.id.clone())
    }
}

/// Resets [`Metadata`] state
pub fn reset_metadata(ui: &mut Ui, id: Option<String>) {
    Metadata::new(id).save(ui);
}
