//! Map surface: graticule backdrop, points, controls and pointer routing
//!
//! Points go through the GPU callback unless CPU mode is active. Input is
//! handled after drawing, so picking resolves against the same frame.

use eframe::egui;
use crate::core::projection::from_lon_lat;
use crate::core::{Frame, PointerInput, Viewport};
use crate::points::{PointCallback, PointUniforms};
use crate::theme::{colors, premultiplied};
use crate::time::now_seconds;
use super::SweepApp;

/// Graticule spacing in degrees
const GRATICULE_STEP: f64 = 30.0;
/// Scroll points per zoom level
const SCROLL_PER_ZOOM: f64 = 240.0;
/// Upper bound on shading bands per point on the CPU path
const MAX_BANDS: usize = 8;

impl SweepApp {
    pub(crate) fn render_map(&mut self, ui: &mut egui::Ui, frame: Frame) {
        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, egui::Sense::click_and_drag());
        let rect = response.rect;

        self.camera.set_size([rect.width(), rect.height()]);
        self.tooltip.set_origin(rect.min);

        self.draw_graticule(&painter, rect);

        if self.use_cpu {
            self.draw_points_cpu(&painter, rect, frame);
        } else {
            self.draw_points_gpu(&painter, rect, frame);
        }

        let controls = self.render_map_controls(ui, rect);
        self.handle_map_input(ui, &response, rect, controls);
    }

    fn draw_points_gpu(&self, painter: &egui::Painter, rect: egui::Rect, frame: Frame) {
        let layer = self.surface.layer();
        let uniforms = PointUniforms::new(
            layer.shading().uniforms(frame.current_year),
            self.camera.center(),
            self.camera.size(),
            self.camera.resolution(),
        );
        painter.add(egui_wgpu::Callback::new_paint_callback(
            rect,
            PointCallback {
                set: layer.snapshot(),
                generation: layer.generation(),
                uniforms,
            },
        ));
    }

    /// CPU point path (--use-cpu, or no wgpu render state).
    /// Each point is painted as concentric bands, each band colored by the
    /// shading's fragment function at the band's mid radius.
    fn draw_points_cpu(&self, painter: &egui::Painter, rect: egui::Rect, frame: Frame) {
        let layer = self.surface.layer();
        let points = layer.points().points();

        for item in layer.draw_list(frame.current_year, &self.camera) {
            let center = rect.min + egui::vec2(item.screen[0], item.screen[1]);
            let radius = item.size * 0.5;
            if !rect.expand(radius).contains(center) {
                continue;
            }
            let point = &points[item.index];

            let bands = ((radius / 2.0).ceil() as usize).clamp(1, MAX_BANDS);
            let band = radius / bands as f32;
            for i in 0..bands {
                let inner = band * i as f32;
                let mid = inner + band * 0.5;
                let r2 = f64::from(mid / radius).powi(2);
                let Some(color) = layer.color_at(point, frame.current_year, r2) else {
                    continue;
                };
                if color[3] <= 0.0 {
                    continue;
                }
                if i == 0 {
                    painter.circle_filled(center, band, premultiplied(color));
                } else {
                    painter.circle_stroke(center, mid, egui::Stroke::new(band, premultiplied(color)));
                }
            }
        }
    }

    fn draw_graticule(&self, painter: &egui::Painter, rect: egui::Rect) {
        let to_screen = |world: [f64; 2]| {
            let s = self.camera.world_to_screen(world);
            rect.min + egui::vec2(s[0], s[1])
        };

        let steps = (180.0 / GRATICULE_STEP) as i32;
        for i in -steps..=steps {
            let lon = f64::from(i) * GRATICULE_STEP;
            let (Some(top), Some(bottom)) = (from_lon_lat(lon, 85.0), from_lon_lat(lon, -85.0)) else {
                continue;
            };
            let (a, b) = (to_screen(top), to_screen(bottom));
            painter.line_segment(
                [egui::pos2(a.x, a.y.max(rect.top())), egui::pos2(b.x, b.y.min(rect.bottom()))],
                egui::Stroke::new(1.0, colors::GRATICULE),
            );
        }

        for i in -2..=2 {
            let lat = f64::from(i) * GRATICULE_STEP;
            let (Some(west), Some(east)) = (from_lon_lat(-180.0, lat), from_lon_lat(180.0, lat)) else {
                continue;
            };
            let (a, b) = (to_screen(west), to_screen(east));
            let color = if i == 0 { colors::EQUATOR } else { colors::GRATICULE };
            painter.line_segment(
                [egui::pos2(a.x.max(rect.left()), a.y), egui::pos2(b.x.min(rect.right()), b.y)],
                egui::Stroke::new(1.0, color),
            );
        }
    }

    /// Zoom and restart buttons. Returns the screen area they cover.
    fn render_map_controls(&mut self, ui: &mut egui::Ui, rect: egui::Rect) -> egui::Rect {
        let anchor = [rect.width() * 0.5, rect.height() * 0.5];
        let area = egui::Area::new(egui::Id::new("map_controls"))
            .order(egui::Order::Foreground)
            .fixed_pos(rect.min + egui::vec2(8.0, 8.0))
            .show(ui.ctx(), |ui| {
                egui::Frame::new()
                    .fill(colors::BG_ELEVATED)
                    .corner_radius(4.0)
                    .inner_margin(4.0)
                    .show(ui, |ui| {
                        ui.vertical(|ui| {
                            if ui.button("+").on_hover_text("Zoom in").clicked() {
                                self.camera.zoom_by(1.0, anchor);
                            }
                            if ui.button("-").on_hover_text("Zoom out").clicked() {
                                self.camera.zoom_by(-1.0, anchor);
                            }
                            if ui.button("Restart").on_hover_text("Restart the sweep from the first year").clicked() {
                                self.surface.restart(now_seconds());
                            }
                        });
                    });
            });
        area.response.rect
    }

    fn handle_map_input(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        rect: egui::Rect,
        controls: egui::Rect,
    ) {
        let (hover, moved, scroll) = ui.input(|i| {
            (i.pointer.hover_pos(), i.pointer.is_moving(), i.smooth_scroll_delta.y)
        });
        let dragging = response.dragged();

        if dragging {
            let delta = response.drag_delta();
            self.camera.pan([delta.x, delta.y]);
        }

        let Some(pos) = hover.filter(|p| rect.contains(*p)) else {
            if self.pointer_inside {
                self.surface.pointer_leave(&mut self.tooltip);
                self.pointer_inside = false;
            }
            return;
        };
        self.pointer_inside = true;

        let local = [pos.x - rect.min.x, pos.y - rect.min.y];
        let over_controls = controls.contains(pos);

        if response.hovered() && scroll != 0.0 && !over_controls {
            self.camera.zoom_by(f64::from(scroll) / SCROLL_PER_ZOOM, local);
        }

        let input = PointerInput {
            position: local,
            dragging,
            over_controls,
        };
        if response.clicked() {
            self.surface.click(input, &self.camera, &mut self.tooltip);
        } else if moved || dragging {
            self.surface.pointer_move(input, &self.camera, &mut self.tooltip);
        }
    }
}
