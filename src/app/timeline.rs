//! Timeline strip: events per decade with the sweep position marked

use eframe::egui;
use egui_plot::{Bar, BarChart, Plot, VLine};
use crate::core::Frame;
use crate::theme::colors;
use super::{SweepApp, HISTOGRAM_BUCKET};

/// Share of a bucket a bar covers, leaving a gap between neighbours
const BAR_FILL: f64 = 0.9;

/// Centre and width of the bar for the bucket starting at `start`
fn bar_geometry(start: i32, bucket: i32) -> (f64, f64) {
    let bucket = f64::from(bucket.max(1));
    (f64::from(start) + bucket * 0.5, bucket * BAR_FILL)
}

impl SweepApp {
    pub(crate) fn render_timeline(&mut self, ui: &mut egui::Ui, frame: Frame) {
        let clock = self.surface.clock().config();
        let (min_year, max_year) = (clock.min_year, clock.max_year);
        let bucket = f64::from(HISTOGRAM_BUCKET);

        let bars: Vec<Bar> = self
            .histogram
            .iter()
            .filter(|(start, _)| {
                let start = f64::from(*start);
                start + bucket > min_year && start < max_year
            })
            .map(|&(start, count)| {
                let (centre, width) = bar_geometry(start, HISTOGRAM_BUCKET);
                // Decades the sweep has reached are lit, later ones dimmed
                let color = if f64::from(start) <= frame.current_year {
                    colors::BAR
                } else {
                    colors::TEXT_MUTED
                };
                Bar::new(centre, f64::from(count)).width(width).fill(color)
            })
            .collect();

        ui.label(
            egui::RichText::new("Events per decade")
                .color(colors::TEXT_MUTED)
                .size(10.0),
        );

        Plot::new("timeline")
            .show_axes([true, false])
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_background(false)
            .include_x(min_year)
            .include_x(max_year)
            .include_y(0.0)
            .label_formatter(|_name, value| format!("{:.0}", value.x))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(colors::BAR));
                plot_ui.vline(
                    VLine::new(frame.current_year)
                        .color(colors::YEAR_MARKER)
                        .width(1.5),
                );
            });
    }
}
