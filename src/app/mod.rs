//! Shared year-sweep map app
//!
//! The egui app that runs on both native and WASM platforms. Each frame:
//! pick up a finished dataset load, evaluate the clock once, then draw the
//! header, the timeline and the map from that single frame.

mod header;
mod map;
mod timeline;
mod tooltip;

use eframe::egui;
use tracing::{debug, info};

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(not(target_arch = "wasm32"))]
use parking_lot::Mutex;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

use crate::core::{Camera, Frame, LoadSummary, MapSurface, SweepConfig};
use crate::load_state::LoadState;
use crate::points::PointRenderer;
use crate::theme::map_visuals;
use crate::time::now_seconds;

#[cfg(not(target_arch = "wasm32"))]
use crate::loader_native::DatasetLoader;
#[cfg(target_arch = "wasm32")]
use crate::loader_wasm::{self, BodySlot};

pub use tooltip::EguiTooltip;

/// Decade bins for the timeline strip
const HISTOGRAM_BUCKET: i32 = 10;
/// Minimum covered diameter, in points, for a point to count as discernible
const DISCERNIBLE_DIAMETER: f32 = 1.0;

/// Year-sweep map app - runs on both native and WASM
pub struct SweepApp {
    pub(crate) surface: MapSurface,
    pub(crate) camera: Camera,
    pub(crate) tooltip: EguiTooltip,
    pub(crate) config: SweepConfig,

    /// Load state (platform-specific wrapper)
    #[cfg(target_arch = "wasm32")]
    load_state: Rc<RefCell<LoadState>>,
    #[cfg(not(target_arch = "wasm32"))]
    load_state: Arc<Mutex<LoadState>>,

    /// Body handed over by the fetch task (WASM)
    #[cfg(target_arch = "wasm32")]
    body_slot: BodySlot,
    /// Background loader (native)
    #[cfg(not(target_arch = "wasm32"))]
    loader: Option<DatasetLoader>,

    pub(crate) fps_counter: header::FpsCounter,
    /// Use CPU rendering (--use-cpu on native, fallback if no wgpu)
    pub(crate) use_cpu: bool,
    /// Summary of the last completed load
    pub(crate) last_summary: Option<LoadSummary>,
    /// Events per decade for the timeline, rebuilt per point set generation
    pub(crate) histogram: Vec<(i32, u32)>,
    histogram_generation: u64,
    /// Pointer was over the map last frame (for leave detection)
    pub(crate) pointer_inside: bool,
    stats_last_tick: f64,
}

impl SweepApp {
    /// Create new app for WASM platform
    #[cfg(target_arch = "wasm32")]
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(map_visuals());

        let mut config = SweepConfig::default();
        // Page-level overrides, same keys as the native env vars
        let page_source = js_sys::eval("window.__yearsweep_data")
            .ok()
            .and_then(|v| v.as_string());
        let page_year = js_sys::eval("new URLSearchParams(window.location.search).get('year')")
            .ok()
            .and_then(|v| v.as_string());
        if let Err(e) = config.apply_overrides(|key| match key {
            crate::core::config::DATA_ENV => page_source.clone(),
            crate::core::config::YEAR_ENV => page_year.clone(),
            _ => None,
        }) {
            tracing::warn!(error = %e, "Ignoring page override");
        }
        if let Err(e) = config.validate_or_reset() {
            tracing::warn!(error = %e, "Invalid config, using defaults");
        }

        let use_cpu = !register_gpu_renderer(cc, &config);
        let surface = MapSurface::from_config(&config, now_seconds());
        let camera = Camera::new(&config.view, [1.0, 1.0]);

        let load_state = Rc::new(RefCell::new(LoadState::Loading));
        let body_slot: BodySlot = Rc::new(RefCell::new(None));
        loader_wasm::spawn(
            &config.dataset.resolved_source(),
            body_slot.clone(),
            load_state.clone(),
        );

        Self {
            surface,
            camera,
            tooltip: EguiTooltip::default(),
            config,
            load_state,
            body_slot,
            fps_counter: header::FpsCounter::new(),
            use_cpu,
            last_summary: None,
            histogram: Vec::new(),
            histogram_generation: 0,
            pointer_inside: false,
            stats_last_tick: 0.0,
        }
    }

    /// Create new app for native platform
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(cc: &eframe::CreationContext<'_>, config: SweepConfig, use_cpu: bool) -> Self {
        cc.egui_ctx.set_visuals(map_visuals());
        let mut style = (*cc.egui_ctx.style()).clone();
        for (_text_style, font_id) in style.text_styles.iter_mut() {
            font_id.size *= 1.25;
        }
        cc.egui_ctx.set_style(style);

        // Register the GPU point renderer unless CPU mode requested
        let use_cpu = use_cpu || !register_gpu_renderer(cc, &config);

        let surface = MapSurface::from_config(&config, now_seconds());
        let camera = Camera::new(&config.view, [1.0, 1.0]);

        let source = config.dataset.resolved_source();
        info!(source = %source, use_cpu, "Dataset source resolved");
        let loader = DatasetLoader::spawn(&source);
        let load_state = loader.state.clone();

        Self {
            surface,
            camera,
            tooltip: EguiTooltip::default(),
            config,
            load_state,
            loader: Some(loader),
            fps_counter: header::FpsCounter::new(),
            use_cpu,
            last_summary: None,
            histogram: Vec::new(),
            histogram_generation: 0,
            pointer_inside: false,
            stats_last_tick: 0.0,
        }
    }

    /// Swap in the dataset once the transport has delivered it (native)
    #[cfg(not(target_arch = "wasm32"))]
    fn poll_dataset(&mut self) {
        let Some(body) = self.loader.as_ref().and_then(DatasetLoader::try_take) else {
            return;
        };
        self.ingest(&body);
        // One-shot: the loader thread has finished
        self.loader = None;
    }

    /// Swap in the dataset once the fetch task has delivered it (WASM)
    #[cfg(target_arch = "wasm32")]
    fn poll_dataset(&mut self) {
        let body = self.body_slot.borrow_mut().take();
        if let Some(body) = body {
            self.ingest(&body);
        }
    }

    fn ingest(&mut self, body: &str) {
        let summary = self.surface.load(body, &mut self.tooltip);
        info!(
            events = summary.events,
            dropped = summary.dropped(),
            year_range = ?summary.year_range,
            "Dataset loaded"
        );
        self.last_summary = Some(summary);
    }

    /// Get the current load state
    pub(crate) fn get_load_state(&self) -> LoadState {
        #[cfg(target_arch = "wasm32")]
        {
            self.load_state.borrow().clone()
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.load_state.lock().clone()
        }
    }

    fn refresh_histogram(&mut self) {
        let generation = self.surface.layer().generation();
        if generation != self.histogram_generation {
            self.histogram = self.surface.layer().points().year_histogram(HISTOGRAM_BUCKET);
            self.histogram_generation = generation;
        }
    }

    /// Periodic (~1s) log of what the sweep is showing
    fn log_stats(&mut self, now: f64, frame: Frame) {
        if now - self.stats_last_tick < 1.0 {
            return;
        }
        self.stats_last_tick = now;
        let layer = self.surface.layer();
        let [lon, lat] = self.camera.center_lon_lat();
        debug!(
            year = %format!("{:.0}", frame.current_year),
            visible = layer.visible_count(frame.current_year),
            discernible = layer.discernible_count(frame.current_year, DISCERNIBLE_DIAMETER),
            fps = %format!("{:.0}", self.fps_counter.fps()),
            center = %format!("{lon:.3},{lat:.3}"),
            zoom = %format!("{:.2}", self.camera.zoom()),
            "stats"
        );
    }
}

/// Install the point renderer into egui's wgpu callback resources.
/// Returns false when no wgpu render state exists.
fn register_gpu_renderer(cc: &eframe::CreationContext<'_>, config: &SweepConfig) -> bool {
    let Some(render_state) = cc.wgpu_render_state.as_ref() else {
        return false;
    };
    let renderer = PointRenderer::new(&render_state.device, render_state.target_format, &config.fade);
    render_state
        .renderer
        .write()
        .callback_resources
        .insert(renderer);
    true
}

impl eframe::App for SweepApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_dataset();

        let now = now_seconds();
        let Some(frame) = self.surface.frame(now) else {
            // Disposed: stop scheduling repaints
            return;
        };
        // Schedule the next frame for every display refresh
        ctx.request_repaint();

        self.refresh_histogram();
        self.log_stats(now, frame);

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().fill(crate::theme::colors::BG_PRIMARY).inner_margin(4.0))
            .show(ctx, |ui| {
                self.render_header(ui, frame);
            });

        egui::TopBottomPanel::bottom("timeline")
            .exact_height(96.0)
            .frame(egui::Frame::new().fill(crate::theme::colors::BG_PRIMARY).inner_margin(4.0))
            .show(ctx, |ui| {
                self.render_timeline(ui, frame);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(crate::theme::colors::MAP_OCEAN))
            .show(ctx, |ui| {
                self.render_map(ui, frame);
            });

        self.tooltip.paint(ctx);
    }

    fn on_exit(&mut self) {
        self.surface.dispose();
    }
}
