//! Native year-sweep map
//!
//! Run with: cargo run --features native --bin yearsweep [-- --use-cpu]
//!
//! Configuration comes from `YEARSWEEP_CONFIG` (JSON file) with
//! `YEARSWEEP_DATA` / `YEARSWEEP_YEAR` overrides.

use eframe::egui;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use yearsweep::core::SweepConfig;
use yearsweep::SweepApp;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,yearsweep=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let use_cpu = std::env::args().any(|arg| arg == "--use-cpu");
    let config = SweepConfig::from_env()?;
    info!(
        source = %config.dataset.resolved_source(),
        min_year = config.clock.min_year,
        max_year = config.clock.max_year,
        use_cpu,
        "Starting yearsweep"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("yearsweep"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "yearsweep",
        options,
        Box::new(move |cc| Ok(Box::new(SweepApp::new(cc, config, use_cpu)))),
    )?;
    Ok(())
}
