use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::{App, CreationContext};
use egui::{
    Align2, Area, Button, Color32, Context, FontId, Frame, Id, Order, Pos2, Rect, RichText, Sense,
    Shape, Stroke, Ui, Vec2,
};
use egui_stage::{plan_overlay, Metadata, OverlayKind, OverlayStyle, StageView};

#[cfg(feature = "events")]
pub use crossbeam::channel::{unbounded, Receiver, Sender};
#[cfg(feature = "events")]
pub use egui_stage::events::Event;

pub const TOTAL_BUDGET: u32 = 110;
pub const MIN_ALLOCATION: u32 = 1;
#[cfg(feature = "events")]
pub const EVENTS_LIMIT: usize = 200;

const STAGE_ID: &str = "budget";

// Stage layout, in design coordinates (1600x900).
const TITLE_POS: Pos2 = Pos2::new(800., 70.);
const PIE_CENTER: Pos2 = Pos2::new(620., 500.);
const PIE_RADIUS: f32 = 280.;
const NEEDS_PANEL_X: f32 = 1150.;
const NEEDS_PANEL_TOP: f32 = 250.;
const NEEDS_ROW_HEIGHT: f32 = 90.;
const BOTTOM_BUTTONS_Y: f32 = 830.;

/// The five budget sectors of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sector {
    Health,
    Education,
    Security,
    Infrastructure,
    Debt,
}

impl Sector {
    pub const ALL: [Self; 5] = [
        Self::Health,
        Self::Education,
        Self::Security,
        Self::Infrastructure,
        Self::Debt,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Health => "Health",
            Self::Education => "Education",
            Self::Security => "Security",
            Self::Infrastructure => "Infrastructure",
            Self::Debt => "Debt",
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            Self::Health => Color32::from_rgb(0xFF, 0x63, 0x84),
            Self::Education => Color32::from_rgb(0x36, 0xA2, 0xEB),
            Self::Security => Color32::from_rgb(0x4B, 0xC0, 0xC0),
            Self::Infrastructure => Color32::from_rgb(0x99, 0x66, 0xFF),
            Self::Debt => Color32::from_rgb(0xFF, 0xCE, 0x56),
        }
    }

    /// Fixed reference values for the "What the Country Needs" panel. These
    /// never change with the player's allocations.
    pub fn need(self) -> u32 {
        match self {
            Self::Health => 50,
            Self::Education => 40,
            Self::Security => 40,
            Self::Infrastructure => 40,
            Self::Debt => 30,
        }
    }
}

/// Transient, single-session budget state. Constructed fresh on every launch;
/// nothing is persisted.
#[derive(Clone, Debug)]
pub struct Budget {
    allocations: [u32; 5],
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            allocations: [MIN_ALLOCATION; 5],
        }
    }
}

impl Budget {
    pub fn get(&self, sector: Sector) -> u32 {
        self.allocations[sector as usize]
    }

    pub fn set(&mut self, sector: Sector, value: u32) {
        self.allocations[sector as usize] = value;
    }

    pub fn allocated(&self) -> u32 {
        self.allocations.iter().sum()
    }

    /// Remaining funds; negative when the player over-allocates (the game
    /// allows it and lets the submit video tell the story).
    pub fn remaining(&self) -> i64 {
        i64::from(TOTAL_BUDGET) - i64::from(self.allocated())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Per-sector pie weights. Zero allocations get a minimal sliver so every
    /// sector stays visible and clickable.
    pub fn pie_weights(&self) -> [f32; 5] {
        self.allocations.map(|v| if v == 0 { 0.1 } else { v as f32 })
    }
}

/// Locates the sector slice under a point, given the point relative to the
/// pie center and the pie radius (both in the same coordinate space).
///
/// Slices start at 12 o'clock and run clockwise in sector order.
pub fn sector_at(rel: Vec2, radius: f32, weights: &[f32; 5]) -> Option<Sector> {
    if rel.length() > radius {
        return None;
    }
    let total: f32 = weights.iter().sum();
    if total <= 0. {
        return None;
    }

    let angle = (rel.y.atan2(rel.x) + FRAC_PI_2).rem_euclid(TAU);
    let mut start = 0.;
    for (i, w) in weights.iter().enumerate() {
        let sweep = w / total * TAU;
        if angle < start + sweep {
            return Some(Sector::ALL[i]);
        }
        start += sweep;
    }
    // Floating point residue at the very end of the last slice.
    Some(Sector::ALL[4])
}

enum DialogState {
    None,
    Edit {
        sector: Sector,
        input: String,
    },
    /// Validation error; dismissing it returns to the edit dialog it came
    /// from.
    Error {
        message: String,
        sector: Sector,
        input: String,
    },
    Video {
        title: String,
    },
}

struct Hologram {
    sector: Sector,
    trigger: Rect,
}

pub struct BudgetApp {
    budget: Budget,
    dialog: DialogState,
    hologram: Option<Hologram>,

    #[cfg(feature = "events")]
    pub last_events: Vec<String>,
    #[cfg(feature = "events")]
    pub event_publisher: Sender<Event>,
    #[cfg(feature = "events")]
    pub event_consumer: Receiver<Event>,
}

impl BudgetApp {
    pub fn new(_: &CreationContext<'_>) -> Self {
        #[cfg(feature = "events")]
        let (event_publisher, event_consumer) = unbounded();

        Self {
            budget: Budget::default(),
            dialog: DialogState::None,
            hologram: None,

            #[cfg(feature = "events")]
            last_events: Vec::new(),
            #[cfg(feature = "events")]
            event_publisher,
            #[cfg(feature = "events")]
            event_consumer,
        }
    }

    fn stage_id() -> Option<String> {
        Some(STAGE_ID.to_string())
    }

    /// Pulls the published stage metadata and derives one overlay's style.
    /// Overlays do this when they are shown, never while hidden.
    fn overlay_style(
        ctx: &Context,
        kind: OverlayKind,
        trigger: Option<Rect>,
    ) -> Option<OverlayStyle> {
        let meta = Metadata::new(Self::stage_id()).load_from_ctx(ctx);
        plan_overlay(kind, &meta, trigger)
    }

    fn draw_stage(&mut self, ui: &mut Ui, meta: &Metadata) {
        let painter = ui.painter().clone();

        painter.text(
            meta.design_to_screen_pos(TITLE_POS),
            Align2::CENTER_CENTER,
            "National Budget Builder",
            FontId::proportional(meta.design_to_screen_size(48.)),
            ui.visuals().strong_text_color(),
        );

        self.draw_pie(ui, meta, &painter);
        self.draw_needs_panel(ui, meta, &painter);
        self.draw_bottom_buttons(ui, meta);

        let remaining = self.budget.remaining();
        painter.text(
            meta.design_to_screen_pos(Pos2::new(PIE_CENTER.x, 130.)),
            Align2::CENTER_CENTER,
            format!("Remaining: ${remaining}B of ${TOTAL_BUDGET}B"),
            FontId::proportional(meta.design_to_screen_size(24.)),
            if remaining < 0 {
                ui.visuals().error_fg_color
            } else {
                ui.visuals().text_color()
            },
        );
    }

    fn draw_pie(&mut self, ui: &mut Ui, meta: &Metadata, painter: &egui::Painter) {
        let center = meta.design_to_screen_pos(PIE_CENTER);
        let radius = meta.design_to_screen_size(PIE_RADIUS);
        let weights = self.budget.pie_weights();
        let total: f32 = weights.iter().sum();

        let border = Stroke::new(meta.design_to_screen_size(2.), Color32::WHITE);

        let mut start = -FRAC_PI_2;
        for (i, w) in weights.iter().enumerate() {
            let sector = Sector::ALL[i];
            let sweep = w / total * TAU;

            let arc_point = |a: f32| center + radius * Vec2::new(a.cos(), a.sin());

            // Filled as a triangle fan: a slice can span more than half the
            // pie, so it is not convex as a whole.
            let steps = ((sweep / 0.05).ceil() as usize).max(2);
            let mut outline = vec![center];
            for s in 0..steps {
                let a0 = start + sweep * s as f32 / steps as f32;
                let a1 = start + sweep * (s + 1) as f32 / steps as f32;
                painter.add(Shape::convex_polygon(
                    vec![center, arc_point(a0), arc_point(a1)],
                    sector.color(),
                    Stroke::NONE,
                ));
                outline.push(arc_point(a0));
            }
            outline.push(arc_point(start + sweep));
            painter.add(Shape::closed_line(outline, border));

            let mid = start + sweep / 2.;
            painter.text(
                center + radius * 0.6 * Vec2::new(mid.cos(), mid.sin()),
                Align2::CENTER_CENTER,
                format!("{}\n${}B", sector.label(), self.budget.get(sector)),
                FontId::proportional(meta.design_to_screen_size(20.)),
                Color32::WHITE,
            );

            start += sweep;
        }

        let pie_rect = Rect::from_center_size(center, Vec2::splat(radius * 2.));
        let resp = ui.interact(pie_rect, ui.id().with("pie"), Sense::click());
        if resp.clicked() {
            if let Some(pos) = resp.interact_pointer_pos() {
                if let Some(sector) = sector_at(pos - center, radius, &weights) {
                    self.dialog = DialogState::Edit {
                        sector,
                        input: self.budget.get(sector).to_string(),
                    };
                }
            }
        }
    }

    fn draw_needs_panel(&mut self, ui: &mut Ui, meta: &Metadata, painter: &egui::Painter) {
        painter.text(
            meta.design_to_screen_pos(Pos2::new(NEEDS_PANEL_X + 150., NEEDS_PANEL_TOP - 40.)),
            Align2::CENTER_CENTER,
            "What the Country Needs",
            FontId::proportional(meta.design_to_screen_size(28.)),
            ui.visuals().strong_text_color(),
        );

        for (i, sector) in Sector::ALL.into_iter().enumerate() {
            let top = NEEDS_PANEL_TOP + NEEDS_ROW_HEIGHT * i as f32;

            painter.text(
                meta.design_to_screen_pos(Pos2::new(NEEDS_PANEL_X, top + 20.)),
                Align2::LEFT_CENTER,
                format!("{}: ${}B", sector.label(), sector.need()),
                FontId::proportional(meta.design_to_screen_size(22.)),
                sector.color(),
            );

            let btn_rect = Rect::from_min_size(
                meta.design_to_screen_pos(Pos2::new(NEEDS_PANEL_X + 240., top)),
                Vec2::new(
                    meta.design_to_screen_size(120.),
                    meta.design_to_screen_size(40.),
                ),
            );
            let resp = ui.put(
                btn_rect,
                Button::new(RichText::new("Watch").size(meta.design_to_screen_size(16.))),
            );
            if resp.clicked() {
                // The trigger rect is what anchors the hologram panel.
                self.hologram = Some(Hologram {
                    sector,
                    trigger: resp.rect,
                });
            }
        }
    }

    fn draw_bottom_buttons(&mut self, ui: &mut Ui, meta: &Metadata) {
        let button_size = Vec2::new(
            meta.design_to_screen_size(180.),
            meta.design_to_screen_size(50.),
        );

        let reset_rect = Rect::from_center_size(
            meta.design_to_screen_pos(Pos2::new(PIE_CENTER.x - 120., BOTTOM_BUTTONS_Y)),
            button_size,
        );
        if ui
            .put(
                reset_rect,
                Button::new(RichText::new("Reset").size(meta.design_to_screen_size(18.))),
            )
            .clicked()
        {
            self.budget.reset();
        }

        let submit_rect = Rect::from_center_size(
            meta.design_to_screen_pos(Pos2::new(PIE_CENTER.x + 120., BOTTOM_BUTTONS_Y)),
            button_size,
        );
        if ui
            .put(
                submit_rect,
                Button::new(RichText::new("Submit").size(meta.design_to_screen_size(18.))),
            )
            .clicked()
        {
            self.dialog = DialogState::Video {
                title: "The Nation You Built!".to_string(),
            };
        }
    }

    /// Non-scaled companion banner pinned at a constant offset from the
    /// viewport top, keeping its gap to the stage at every scale.
    fn show_banner(ctx: &Context) {
        let meta = Metadata::new(Self::stage_id()).load_from_ctx(ctx);
        let viewport = meta.viewport_rect();

        Area::new(Id::new("budget_banner"))
            .order(Order::Background)
            .fixed_pos(Pos2::new(viewport.left() + 16., viewport.top() + meta.banner_top))
            .pivot(Align2::LEFT_TOP)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(format!("Allocate the ${TOTAL_BUDGET}B national budget"))
                        .italics(),
                );
            });
    }

    fn show_dialogs(&mut self, ctx: &Context) {
        let next = match &mut self.dialog {
            DialogState::None => None,
            DialogState::Edit { sector, input } => {
                Self::show_edit_dialog(ctx, *sector, input, &mut self.budget)
            }
            DialogState::Error {
                message,
                sector,
                input,
            } => Self::show_error_dialog(ctx, message, *sector, input),
            DialogState::Video { title } => Self::show_video_panel(ctx, title),
        };
        if let Some(next) = next {
            self.dialog = next;
        }

        self.show_hologram(ctx);
    }

    fn show_edit_dialog(
        ctx: &Context,
        sector: Sector,
        input: &mut String,
        budget: &mut Budget,
    ) -> Option<DialogState> {
        let Some(style) = Self::overlay_style(ctx, OverlayKind::Dialog, None) else {
            return None;
        };

        let mut next = None;
        Area::new(Id::new("budget_edit_dialog"))
            .order(Order::Foreground)
            .fixed_pos(style.anchor)
            .pivot(style.pivot)
            .show(ctx, |ui| {
                ui.set_max_size(style.max_size);

                Frame::window(ui.style()).show(ui, |ui| {
                    if let Some(width) = style.width {
                        ui.set_width(width.min(style.max_size.x));
                    }
                    let font = FontId::proportional(18. * style.scale);

                    ui.label(RichText::new(sector.label()).font(font.clone()).strong());
                    ui.add_space(4. * style.scale);
                    ui.label(RichText::new("Allocation in $ billions:").font(font.clone()));
                    ui.text_edit_singleline(input);

                    ui.horizontal(|ui| {
                        if ui.button(RichText::new("Save").font(font.clone())).clicked() {
                            match input.parse::<u32>() {
                                Ok(value) if value >= MIN_ALLOCATION => {
                                    budget.set(sector, value);
                                    next = Some(DialogState::None);
                                }
                                _ => {
                                    next = Some(DialogState::Error {
                                        message: format!(
                                            "Please enter a valid number of at least {MIN_ALLOCATION} billion"
                                        ),
                                        sector,
                                        input: input.clone(),
                                    });
                                }
                            }
                        }
                        if ui.button(RichText::new("Cancel").font(font)).clicked() {
                            next = Some(DialogState::None);
                        }
                    });
                });
            });
        next
    }

    fn show_error_dialog(
        ctx: &Context,
        message: &str,
        sector: Sector,
        input: &str,
    ) -> Option<DialogState> {
        let Some(style) = Self::overlay_style(ctx, OverlayKind::Dialog, None) else {
            return None;
        };

        let mut next = None;
        Area::new(Id::new("budget_error_dialog"))
            .order(Order::Tooltip)
            .fixed_pos(style.anchor)
            .pivot(style.pivot)
            .show(ctx, |ui| {
                Frame::window(ui.style()).show(ui, |ui| {
                    let font = FontId::proportional(18. * style.scale);
                    ui.label(RichText::new("Invalid input").font(font.clone()).strong());
                    ui.label(RichText::new(message).font(font.clone()));
                    if ui.button(RichText::new("OK").font(font)).clicked() {
                        next = Some(DialogState::Edit {
                            sector,
                            input: input.to_string(),
                        });
                    }
                });
            });
        next
    }

    fn show_video_panel(ctx: &Context, title: &str) -> Option<DialogState> {
        let Some(style) = Self::overlay_style(ctx, OverlayKind::VideoPanel, None) else {
            return None;
        };

        let mut next = None;
        Area::new(Id::new("budget_video_panel"))
            .order(Order::Foreground)
            .fixed_pos(style.anchor)
            .pivot(style.pivot)
            .show(ctx, |ui| {
                ui.set_max_size(style.max_size);

                Frame::window(ui.style())
                    .inner_margin(egui::Margin::same(style.padding as i8))
                    .show(ui, |ui| {
                        if let Some(width) = style.width {
                            ui.set_width((width - style.padding * 2.).max(0.) * style.scale);
                        }
                        let font = FontId::proportional(22. * style.scale);

                        ui.horizontal(|ui| {
                            ui.label(RichText::new(title).font(font).strong());
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.button("✕").clicked() {
                                        next = Some(DialogState::None);
                                    }
                                },
                            );
                        });

                        // Media surface placeholder; decode is an external
                        // collaborator.
                        let body_height = (style.max_size.y * style.scale - 48.)
                            .max(style.min_height);
                        let (rect, _) = ui.allocate_exact_size(
                            Vec2::new(ui.available_width(), body_height),
                            Sense::hover(),
                        );
                        ui.painter().rect_filled(rect, 0, Color32::BLACK);
                        ui.painter().text(
                            rect.center(),
                            Align2::CENTER_CENTER,
                            "▶",
                            FontId::proportional(48. * style.scale),
                            Color32::WHITE,
                        );
                    });
            });
        next
    }

    fn show_hologram(&mut self, ctx: &Context) {
        let Some(holo) = &self.hologram else {
            return;
        };
        let sector = holo.sector;

        // Missing trigger geometry skips this overlay only.
        let Some(style) = Self::overlay_style(ctx, OverlayKind::Hologram, Some(holo.trigger))
        else {
            self.hologram = None;
            return;
        };

        let mut close = false;
        Area::new(Id::new("budget_hologram"))
            .order(Order::Foreground)
            .fixed_pos(style.anchor)
            .pivot(style.pivot)
            .show(ctx, |ui| {
                let width = style.width.unwrap_or(320.) * style.scale;

                Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_width(width);
                    let (rect, resp) = ui
                        .allocate_exact_size(Vec2::new(width, width * 9. / 16.), Sense::click());
                    ui.painter().rect_filled(rect, 2, Color32::BLACK);
                    ui.painter().text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        format!("▶ {}", sector.label()),
                        FontId::proportional(16. * style.scale),
                        Color32::WHITE,
                    );
                    // Clicking the hologram dismisses it.
                    if resp.clicked() {
                        close = true;
                    }
                });
            });

        if close {
            self.hologram = None;
        }
    }

    #[cfg(feature = "events")]
    fn drain_events(&mut self) {
        while let Ok(event) = self.event_consumer.try_recv() {
            self.last_events.push(format!("{event:?}"));
            if self.last_events.len() > EVENTS_LIMIT {
                self.last_events.remove(0);
            }
        }
    }
}

impl App for BudgetApp {
    fn update(&mut self, ctx: &Context, _: &mut eframe::Frame) {
        #[cfg(feature = "events")]
        self.drain_events();

        #[cfg(feature = "events")]
        let sink = self.event_publisher.clone();

        egui::CentralPanel::default().show(ctx, |ui| {
            let stage = StageView::new().with_id(Self::stage_id());

            #[cfg(feature = "events")]
            let stage = stage.with_event_sink(&sink);

            stage.show(ui, |stage_ui, meta| {
                self.draw_stage(stage_ui, meta);
            });
        });

        Self::show_banner(ctx);
        self.show_dialogs(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_starts_at_minimum_allocations() {
        let budget = Budget::default();
        for sector in Sector::ALL {
            assert_eq!(budget.get(sector), MIN_ALLOCATION);
        }
        assert_eq!(budget.allocated(), 5);
        assert_eq!(budget.remaining(), 105);
    }

    #[test]
    fn budget_allows_over_allocation() {
        let mut budget = Budget::default();
        budget.set(Sector::Health, 200);
        assert!(budget.remaining() < 0);
    }

    #[test]
    fn budget_reset_restores_initial_state() {
        let mut budget = Budget::default();
        budget.set(Sector::Debt, 30);
        budget.set(Sector::Education, 40);
        budget.reset();
        assert_eq!(budget.allocated(), 5);
    }

    #[test]
    fn pie_weights_substitute_zero_values() {
        let mut budget = Budget::default();
        budget.set(Sector::Health, 0);
        let weights = budget.pie_weights();
        assert_eq!(weights[Sector::Health as usize], 0.1);
        assert_eq!(weights[Sector::Debt as usize], 1.);
    }

    #[test]
    fn sector_hit_testing() {
        let weights = [1.; 5];
        // Just right of 12 o'clock, inside the first slice.
        assert_eq!(
            sector_at(Vec2::new(10., -100.), 200., &weights),
            Some(Sector::Health)
        );
        // Outside the pie.
        assert_eq!(sector_at(Vec2::new(300., 0.), 200., &weights), None);
        // Just left of 12 o'clock wraps to the last slice.
        assert_eq!(
            sector_at(Vec2::new(-10., -100.), 200., &weights),
            Some(Sector::Debt)
        );
    }
}
