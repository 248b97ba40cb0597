//! egui tooltip widget driven by the picking controller

use eframe::egui;
use crate::core::Tooltip;
use crate::theme::colors;

/// Tooltip drawn a few points below the pointer
const OFFSET: egui::Vec2 = egui::vec2(0.0, 5.0);

#[derive(Default)]
pub struct EguiTooltip {
    visible: bool,
    /// Anchor in map-surface coordinates
    anchor: [f32; 2],
    content: String,
    /// Screen position of the map surface's top-left corner
    origin: egui::Pos2,
}

impl EguiTooltip {
    pub fn set_origin(&mut self, origin: egui::Pos2) {
        self.origin = origin;
    }

    pub fn paint(&self, ctx: &egui::Context) {
        if !self.visible {
            return;
        }
        let pos = self.origin + egui::vec2(self.anchor[0], self.anchor[1]) + OFFSET;
        egui::Area::new(egui::Id::new("point_tooltip"))
            .order(egui::Order::Tooltip)
            .fixed_pos(pos)
            .pivot(egui::Align2::CENTER_TOP)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(colors::BG_ELEVATED)
                    .stroke(egui::Stroke::new(1.0, colors::BORDER))
                    .corner_radius(3.0)
                    .inner_margin(egui::Margin::symmetric(6, 3))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(&self.content).color(colors::TEXT_PRIMARY));
                    });
            });
    }
}

impl Tooltip for EguiTooltip {
    fn show(&mut self, at: [f32; 2]) {
        self.anchor = at;
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn set_content(&mut self, content: String) {
        self.content = content;
    }

    fn reposition(&mut self, at: [f32; 2]) {
        self.anchor = at;
    }
}
