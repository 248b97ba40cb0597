//! Header bar: current year, point counts, load status, fps

use eframe::egui;
use crate::core::Frame;
use crate::load_state::LoadState;
use crate::theme::colors;
use crate::time::now_seconds;
use super::SweepApp;

impl SweepApp {
    pub(crate) fn render_header(&mut self, ui: &mut egui::Ui, frame: Frame) {
        self.fps_counter.tick();

        let load_state = self.get_load_state();
        let layer = self.surface.layer();
        let loaded = layer.points().len();
        let visible = layer.visible_count(frame.current_year);

        ui.horizontal(|ui| {
            // LEFT: the sweep year, rounded like a year label
            ui.label(
                egui::RichText::new(format!("{:.0}", frame.current_year))
                    .color(colors::TEXT_PRIMARY)
                    .size(22.0)
                    .strong(),
            );

            ui.add_space(10.0);

            if let Some((min, max)) = self.last_summary.and_then(|s| s.year_range) {
                ui.label(
                    egui::RichText::new(format!("data {min}-{max}")).color(colors::TEXT_MUTED),
                );
            }

            // RIGHT: status and stats (right-to-left order)
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!("{visible}/{loaded} points"))
                        .color(colors::TEXT_MUTED),
                );
                ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));

                if let Some(summary) = self.last_summary.filter(|s| s.dropped() > 0) {
                    ui.label(
                        egui::RichText::new(format!("{} rows dropped", summary.dropped()))
                            .color(colors::TEXT_MUTED),
                    );
                    ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));
                }

                ui.label(
                    egui::RichText::new(format!("{:.0} fps", self.fps_counter.fps()))
                        .color(colors::TEXT_SECONDARY),
                );

                if self.use_cpu {
                    ui.label(egui::RichText::new("cpu").color(colors::TEXT_MUTED));
                }

                ui.add_space(10.0);

                let (status_color, status_text) = match &load_state {
                    LoadState::Ready => (colors::OK, "Loaded".to_string()),
                    LoadState::Loading => (colors::PENDING, "Loading...".to_string()),
                    LoadState::Failed(msg) => (colors::FAILED, format!("Load failed: {msg}")),
                };
                ui.colored_label(status_color, egui::RichText::new(status_text));
            });
        });
    }
}

/// FPS counter over the last 60 frames
pub struct FpsCounter {
    frames: Vec<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(60),
        }
    }

    pub fn tick(&mut self) {
        self.push(now_seconds());
    }

    fn push(&mut self, seconds: f64) {
        self.frames.push(seconds);
        if self.frames.len() > 60 {
            self.frames.remove(0);
        }
    }

    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frames.first(), self.frames.last()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if self.frames.len() < 2 || elapsed <= 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / elapsed
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
