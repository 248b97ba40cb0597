//! Pointer picking and tooltip state
//!
//! `Idle` / `Hovering(point)` state machine. The controller decides when the
//! tooltip is shown, moved, re-labelled or hidden; the tooltip widget itself
//! is a collaborator behind [`Tooltip`].

use tracing::trace;

use super::layer::PointLayer;
use super::viewport::Viewport;

/// Tooltip widget operations the controller drives
pub trait Tooltip {
    fn show(&mut self, at: [f32; 2]);
    fn hide(&mut self);
    fn set_content(&mut self, content: String);
    fn reposition(&mut self, at: [f32; 2]);
}

/// One pointer sample from the input source
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    /// Position on the map surface, in screen points
    pub position: [f32; 2],
    /// A drag gesture is in progress
    pub dragging: bool,
    /// The pointer is over map control UI rather than the map itself
    pub over_controls: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    /// Index of the hovered point in the current point set
    Hovering(usize),
}

/// Everything a hit test needs from the current frame
pub struct PickContext<'a> {
    pub layer: &'a PointLayer,
    pub current_year: f64,
    pub viewport: &'a dyn Viewport,
}

#[derive(Debug, Default)]
pub struct TooltipController {
    state: HoverState,
}

impl TooltipController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    pub fn on_pointer_move(
        &mut self,
        input: PointerInput,
        ctx: &PickContext<'_>,
        tooltip: &mut dyn Tooltip,
    ) {
        if input.dragging {
            self.go_idle(tooltip);
            return;
        }
        self.resolve(input, ctx, tooltip);
    }

    /// Tap/click runs the same hit test as hover so touch devices get tooltips.
    pub fn on_click(&mut self, input: PointerInput, ctx: &PickContext<'_>, tooltip: &mut dyn Tooltip) {
        self.resolve(input, ctx, tooltip);
    }

    pub fn on_pointer_leave(&mut self, tooltip: &mut dyn Tooltip) {
        self.go_idle(tooltip);
    }

    /// Drop any remembered point, e.g. after the point set was replaced.
    pub fn reset(&mut self, tooltip: &mut dyn Tooltip) {
        self.go_idle(tooltip);
    }

    fn resolve(&mut self, input: PointerInput, ctx: &PickContext<'_>, tooltip: &mut dyn Tooltip) {
        let hit = if input.over_controls {
            None
        } else {
            ctx.layer
                .hit_test(ctx.current_year, ctx.viewport, input.position)
        };

        let Some(index) = hit else {
            self.go_idle(tooltip);
            return;
        };

        match self.state {
            HoverState::Hovering(current) if current == index => {
                tooltip.reposition(input.position);
            }
            HoverState::Hovering(_) => {
                tooltip.reposition(input.position);
                tooltip.set_content(tooltip_content(ctx.layer, index));
                trace!(index, "Tooltip moved to another point");
            }
            HoverState::Idle => {
                tooltip.set_content(tooltip_content(ctx.layer, index));
                tooltip.show(input.position);
                trace!(index, "Tooltip shown");
            }
        }
        self.state = HoverState::Hovering(index);
    }

    fn go_idle(&mut self, tooltip: &mut dyn Tooltip) {
        if self.state != HoverState::Idle {
            trace!("Tooltip hidden");
        }
        tooltip.hide();
        self.state = HoverState::Idle;
    }
}

/// Tooltip text for a point: its magnitude.
pub fn tooltip_content(layer: &PointLayer, index: usize) -> String {
    layer
        .points()
        .event(index)
        .map(|e| format!("{}", e.magnitude()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attributes::SizeModel;
    use crate::core::data::{Event, PointSet};
    use crate::core::projection::from_lon_lat;
    use crate::core::shading::FadeShading;
    use crate::core::viewport::{Camera, ViewConfig};
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingTooltip {
        visible: bool,
        at: Option<[f32; 2]>,
        content: String,
        content_updates: usize,
        shows: usize,
    }

    impl Tooltip for RecordingTooltip {
        fn show(&mut self, at: [f32; 2]) {
            self.visible = true;
            self.at = Some(at);
            self.shows += 1;
        }
        fn hide(&mut self) {
            self.visible = false;
        }
        fn set_content(&mut self, content: String) {
            self.content = content;
            self.content_updates += 1;
        }
        fn reposition(&mut self, at: [f32; 2]) {
            self.at = Some(at);
        }
    }

    fn layer() -> PointLayer {
        // Two points ~28 screen points apart at zoom 2 (10 degrees of longitude)
        let events = [(1234.0, 1900, 0.0, 0.0), (98_765.5, 1900, 10.0, 0.0)]
            .iter()
            .filter_map(|&(mag, year, lon, lat)| Event::new(from_lon_lat(lon, lat)?, mag, year))
            .collect();
        let mut layer = PointLayer::new(Arc::new(FadeShading::default()));
        layer.replace(PointSet::build(events, &SizeModel::default()));
        layer
    }

    fn pointer(x: f32, y: f32) -> PointerInput {
        PointerInput {
            position: [x, y],
            dragging: false,
            over_controls: false,
        }
    }

    #[test]
    fn hover_shows_magnitude() {
        let layer = layer();
        let camera = Camera::new(&ViewConfig::default(), [800.0, 600.0]);
        let ctx = PickContext { layer: &layer, current_year: 1900.5, viewport: &camera };
        let mut tip = RecordingTooltip::default();
        let mut ctl = TooltipController::new();

        ctl.on_pointer_move(pointer(400.0, 300.0), &ctx, &mut tip);
        assert_eq!(ctl.state(), HoverState::Hovering(0));
        assert!(tip.visible);
        assert_eq!(tip.content, "1234");
        assert_eq!(tip.at, Some([400.0, 300.0]));
    }

    #[test]
    fn moving_within_same_point_keeps_content() {
        let layer = layer();
        let camera = Camera::new(&ViewConfig::default(), [800.0, 600.0]);
        let ctx = PickContext { layer: &layer, current_year: 1900.5, viewport: &camera };
        let mut tip = RecordingTooltip::default();
        let mut ctl = TooltipController::new();

        ctl.on_pointer_move(pointer(400.0, 300.0), &ctx, &mut tip);
        ctl.on_pointer_move(pointer(403.0, 302.0), &ctx, &mut tip);
        ctl.on_pointer_move(pointer(398.0, 299.0), &ctx, &mut tip);

        assert_eq!(tip.content_updates, 1);
        assert_eq!(tip.shows, 1);
        assert_eq!(tip.at, Some([398.0, 299.0]));
    }

    #[test]
    fn moving_to_other_point_recomputes_content() {
        let layer = layer();
        let camera = Camera::new(&ViewConfig::default(), [800.0, 600.0]);
        let other = camera.world_to_screen(layer.points().points()[1].position);
        let ctx = PickContext { layer: &layer, current_year: 1900.5, viewport: &camera };
        let mut tip = RecordingTooltip::default();
        let mut ctl = TooltipController::new();

        ctl.on_pointer_move(pointer(400.0, 300.0), &ctx, &mut tip);
        ctl.on_pointer_move(pointer(other[0], other[1]), &ctx, &mut tip);

        assert_eq!(ctl.state(), HoverState::Hovering(1));
        assert_eq!(tip.content_updates, 2);
        assert_eq!(tip.content, "98765.5");
        assert_eq!(tip.shows, 1);
    }

    #[test]
    fn moving_off_points_goes_idle() {
        let layer = layer();
        let camera = Camera::new(&ViewConfig::default(), [800.0, 600.0]);
        let ctx = PickContext { layer: &layer, current_year: 1900.5, viewport: &camera };
        let mut tip = RecordingTooltip::default();
        let mut ctl = TooltipController::new();

        ctl.on_pointer_move(pointer(400.0, 300.0), &ctx, &mut tip);
        ctl.on_pointer_move(pointer(100.0, 100.0), &ctx, &mut tip);
        assert_eq!(ctl.state(), HoverState::Idle);
        assert!(!tip.visible);

        // coming back is a fresh show with fresh content
        ctl.on_pointer_move(pointer(400.0, 300.0), &ctx, &mut tip);
        assert_eq!(tip.shows, 2);
        assert_eq!(tip.content_updates, 2);
    }

    #[test]
    fn controls_and_drag_force_idle() {
        let layer = layer();
        let camera = Camera::new(&ViewConfig::default(), [800.0, 600.0]);
        let ctx = PickContext { layer: &layer, current_year: 1900.5, viewport: &camera };
        let mut tip = RecordingTooltip::default();
        let mut ctl = TooltipController::new();

        ctl.on_pointer_move(pointer(400.0, 300.0), &ctx, &mut tip);
        ctl.on_pointer_move(PointerInput { over_controls: true, ..pointer(400.0, 300.0) }, &ctx, &mut tip);
        assert_eq!(ctl.state(), HoverState::Idle);
        assert!(!tip.visible);

        ctl.on_pointer_move(pointer(400.0, 300.0), &ctx, &mut tip);
        ctl.on_pointer_move(PointerInput { dragging: true, ..pointer(400.0, 300.0) }, &ctx, &mut tip);
        assert_eq!(ctl.state(), HoverState::Idle);
        assert!(!tip.visible);
    }

    #[test]
    fn leaving_surface_hides() {
        let layer = layer();
        let camera = Camera::new(&ViewConfig::default(), [800.0, 600.0]);
        let ctx = PickContext { layer: &layer, current_year: 1900.5, viewport: &camera };
        let mut tip = RecordingTooltip::default();
        let mut ctl = TooltipController::new();

        ctl.on_pointer_move(pointer(400.0, 300.0), &ctx, &mut tip);
        ctl.on_pointer_leave(&mut tip);
        assert_eq!(ctl.state(), HoverState::Idle);
        assert!(!tip.visible);
    }

    #[test]
    fn click_shows_like_hover() {
        let layer = layer();
        let camera = Camera::new(&ViewConfig::default(), [800.0, 600.0]);
        let ctx = PickContext { layer: &layer, current_year: 1900.5, viewport: &camera };
        let mut tip = RecordingTooltip::default();
        let mut ctl = TooltipController::new();

        ctl.on_click(pointer(400.0, 300.0), &ctx, &mut tip);
        assert_eq!(ctl.state(), HoverState::Hovering(0));
        assert!(tip.visible);
    }

    #[test]
    fn future_points_are_not_pickable() {
        let layer = layer();
        let camera = Camera::new(&ViewConfig::default(), [800.0, 600.0]);
        let ctx = PickContext { layer: &layer, current_year: 1899.0, viewport: &camera };
        let mut tip = RecordingTooltip::default();
        let mut ctl = TooltipController::new();

        ctl.on_pointer_move(pointer(400.0, 300.0), &ctx, &mut tip);
        assert_eq!(ctl.state(), HoverState::Idle);
        assert!(!tip.visible);
    }
}
