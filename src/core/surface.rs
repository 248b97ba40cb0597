//! Map surface: the per-frame driver tying clock, layer and picker together
//!
//! Order within a frame is fixed: `frame(now)` evaluates the clock, the host
//! draws from that frame, then pointer events resolve against the same
//! frame's year so drawing and picking always agree.

use std::sync::Arc;

use tracing::{debug, info};

use super::attributes::SizeModel;
use super::clock::VirtualClock;
use super::config::SweepConfig;
use super::data::PointSet;
use super::layer::PointLayer;
use super::parser::parse_records;
use super::picking::{HoverState, PickContext, PointerInput, Tooltip, TooltipController};
use super::shading::{FadeShading, PointShading};
use super::viewport::Viewport;

/// Values fixed for the duration of one rendered frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub current_year: f64,
    /// Point set generation this frame was evaluated against
    pub generation: u64,
}

/// What a dataset load produced
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub events: usize,
    pub short_rows: usize,
    pub unprojectable_rows: usize,
    pub year_range: Option<(i32, i32)>,
}

impl LoadSummary {
    pub fn dropped(&self) -> usize {
        self.short_rows + self.unprojectable_rows
    }
}

/// Parse and derive a dataset body in one batch.
pub fn ingest(text: &str, sizes: &SizeModel) -> (PointSet, LoadSummary) {
    let parsed = parse_records(text);
    let (short_rows, unprojectable_rows) = (parsed.short_rows, parsed.unprojectable_rows);
    let set = PointSet::build(parsed.events, sizes);
    let summary = LoadSummary {
        events: set.len(),
        short_rows,
        unprojectable_rows,
        year_range: set.year_range(),
    };
    debug!(
        events = summary.events,
        short_rows,
        unprojectable_rows,
        year_range = ?summary.year_range,
        "Dataset ingested"
    );
    (set, summary)
}

pub struct MapSurface {
    layer: PointLayer,
    clock: VirtualClock,
    picker: TooltipController,
    sizes: SizeModel,
    frame: Option<Frame>,
    disposed: bool,
}

impl MapSurface {
    pub fn new(clock: VirtualClock, sizes: SizeModel, shading: Arc<dyn PointShading>) -> Self {
        Self {
            layer: PointLayer::new(shading),
            clock,
            picker: TooltipController::new(),
            sizes,
            frame: None,
            disposed: false,
        }
    }

    /// Surface with the configured clock, size curve and fade shading.
    pub fn from_config(config: &SweepConfig, now: f64) -> Self {
        Self::new(
            VirtualClock::new(config.clock, now),
            config.size,
            Arc::new(config.fade) as Arc<dyn PointShading>,
        )
    }

    /// Evaluate the clock for a new frame. `None` once disposed.
    pub fn frame(&mut self, now: f64) -> Option<Frame> {
        if self.disposed {
            return None;
        }
        let frame = Frame {
            current_year: self.clock.current_year(now),
            generation: self.layer.generation(),
        };
        self.frame = Some(frame);
        Some(frame)
    }

    /// Most recent frame, if one has been evaluated
    pub fn current_frame(&self) -> Option<Frame> {
        self.frame
    }

    /// Replace the point set with the contents of `text`.
    ///
    /// The swap is a single reference replacement; the picker is forced back
    /// to idle since hovered indices refer to the previous set.
    pub fn load(&mut self, text: &str, tooltip: &mut dyn Tooltip) -> LoadSummary {
        let (set, summary) = ingest(text, &self.sizes);
        self.layer.replace(set);
        self.picker.reset(tooltip);
        summary
    }

    pub fn pointer_move(
        &mut self,
        input: PointerInput,
        viewport: &dyn Viewport,
        tooltip: &mut dyn Tooltip,
    ) {
        let Some(frame) = self.live_frame() else {
            self.picker.reset(tooltip);
            return;
        };
        let ctx = PickContext {
            layer: &self.layer,
            current_year: frame.current_year,
            viewport,
        };
        self.picker.on_pointer_move(input, &ctx, tooltip);
    }

    pub fn click(&mut self, input: PointerInput, viewport: &dyn Viewport, tooltip: &mut dyn Tooltip) {
        let Some(frame) = self.live_frame() else {
            self.picker.reset(tooltip);
            return;
        };
        let ctx = PickContext {
            layer: &self.layer,
            current_year: frame.current_year,
            viewport,
        };
        self.picker.on_click(input, &ctx, tooltip);
    }

    pub fn pointer_leave(&mut self, tooltip: &mut dyn Tooltip) {
        self.picker.on_pointer_leave(tooltip);
    }

    pub fn restart(&mut self, now: f64) {
        self.clock.restart(now);
    }

    /// Stop producing frames; further `frame` calls return `None`.
    pub fn dispose(&mut self) {
        if !self.disposed {
            info!("Map surface disposed");
        }
        self.disposed = true;
        self.frame = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn layer(&self) -> &PointLayer {
        &self.layer
    }

    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    pub fn hover(&self) -> HoverState {
        self.picker.state()
    }

    /// Frame that pointer events may resolve against. A frame computed
    /// before the latest swap is stale: its generation no longer matches.
    fn live_frame(&self) -> Option<Frame> {
        self.frame
            .filter(|f| !self.disposed && f.generation == self.layer.generation())
    }
}

impl Default for MapSurface {
    fn default() -> Self {
        Self::new(
            VirtualClock::new(Default::default(), 0.0),
            SizeModel::default(),
            Arc::new(FadeShading::default()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::viewport::{Camera, ViewConfig};

    #[derive(Default)]
    struct FlagTooltip {
        visible: bool,
    }

    impl Tooltip for FlagTooltip {
        fn show(&mut self, _at: [f32; 2]) {
            self.visible = true;
        }
        fn hide(&mut self) {
            self.visible = false;
        }
        fn set_content(&mut self, _content: String) {}
        fn reposition(&mut self, _at: [f32; 2]) {}
    }

    const BODY: &str = "name,mass,year,reclat,reclong\n\
                        a,100000,1850,0,0\n\
                        b,5,1900,10,10\n\
                        broken,1\n\
                        c,5,1900,95,0\n";

    fn pointer(x: f32, y: f32) -> PointerInput {
        PointerInput {
            position: [x, y],
            dragging: false,
            over_controls: false,
        }
    }

    #[test]
    fn empty_surface_draws_nothing() {
        let mut surface = MapSurface::default();
        let frame = surface.frame(10.0).unwrap();
        assert_eq!(frame.generation, 0);
        let camera = Camera::new(&ViewConfig::default(), [800.0, 600.0]);
        assert!(surface.layer().draw_list(frame.current_year, &camera).is_empty());
    }

    #[test]
    fn load_reports_drops() {
        let mut surface = MapSurface::default();
        let mut tip = FlagTooltip::default();
        let summary = surface.load(BODY, &mut tip);
        assert_eq!(summary.events, 2);
        assert_eq!(summary.short_rows, 1);
        assert_eq!(summary.unprojectable_rows, 1);
        assert_eq!(summary.dropped(), 2);
        assert_eq!(summary.year_range, Some((1850, 1900)));
        assert_eq!(surface.layer().generation(), 1);
    }

    #[test]
    fn reload_forces_idle() {
        let config = SweepConfig::default();
        let mut surface = MapSurface::from_config(&config, 0.0);
        let camera = Camera::new(&config.view, [800.0, 600.0]);
        let mut tip = FlagTooltip::default();

        surface.load(BODY, &mut tip);
        surface.frame(0.0);
        surface.pointer_move(pointer(400.0, 300.0), &camera, &mut tip);
        assert_eq!(surface.hover(), HoverState::Hovering(0));
        assert!(tip.visible);

        surface.load(BODY, &mut tip);
        assert_eq!(surface.hover(), HoverState::Idle);
        assert!(!tip.visible);

        // the pre-swap frame is stale until the next frame is evaluated
        surface.pointer_move(pointer(400.0, 300.0), &camera, &mut tip);
        assert_eq!(surface.hover(), HoverState::Idle);
        surface.frame(0.0);
        surface.pointer_move(pointer(400.0, 300.0), &camera, &mut tip);
        assert_eq!(surface.hover(), HoverState::Hovering(0));
    }

    #[test]
    fn picking_uses_the_frame_year() {
        let config = SweepConfig::default();
        let mut surface = MapSurface::from_config(&config, 0.0);
        let camera = Camera::new(&config.view, [800.0, 600.0]);
        let mut tip = FlagTooltip::default();
        surface.load("h,m,y,lat,lon\nx,0,1900,0,0\n", &mut tip);

        // 1850 at t=0: the 1900 event has not happened yet
        surface.frame(0.0);
        surface.click(pointer(400.0, 300.0), &camera, &mut tip);
        assert_eq!(surface.hover(), HoverState::Idle);

        // 30 s -> 1900
        surface.frame(30.0);
        surface.click(pointer(400.0, 300.0), &camera, &mut tip);
        assert_eq!(surface.hover(), HoverState::Hovering(0));

        surface.pointer_leave(&mut tip);
        assert_eq!(surface.hover(), HoverState::Idle);
    }

    #[test]
    fn restart_resets_year() {
        let mut surface = MapSurface::from_config(&SweepConfig::default(), 0.0);
        assert!(surface.frame(12.0).unwrap().current_year > 1850.0);
        surface.restart(12.0);
        assert_eq!(surface.frame(12.0).unwrap().current_year, 1850.0);
    }

    #[test]
    fn dispose_stops_frames() {
        let mut surface = MapSurface::default();
        assert!(surface.frame(1.0).is_some());
        surface.dispose();
        assert!(surface.is_disposed());
        assert!(surface.frame(2.0).is_none());
        assert!(surface.current_frame().is_none());
    }
}
