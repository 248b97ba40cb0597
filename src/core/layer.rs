//! Point layer: owns the render buffer and evaluates visibility per frame
//!
//! Drawing and hit-testing are pure functions of (buffer, current year,
//! viewport). The buffer is only replaced wholesale, through a single `Arc`
//! swap, when a dataset finishes loading.

use std::sync::Arc;

use tracing::info;

use super::data::{PointSet, RenderPoint};
use super::shading::{PointShading, Rgba};
use super::viewport::Viewport;

/// A point that survives the year cut for this frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    /// Index into the layer's point set
    pub index: usize,
    /// Screen position of the point's center
    pub screen: [f32; 2],
    /// Footprint diameter in points
    pub size: f32,
    /// Simulated years since the event
    pub age: f64,
}

pub struct PointLayer {
    set: Arc<PointSet>,
    /// Bumped on every swap so GPU uploads and hover state can detect reloads
    generation: u64,
    shading: Arc<dyn PointShading>,
}

impl PointLayer {
    pub fn new(shading: Arc<dyn PointShading>) -> Self {
        Self {
            set: PointSet::empty(),
            generation: 0,
            shading,
        }
    }

    /// Swap in a freshly derived point set.
    pub fn replace(&mut self, set: PointSet) {
        self.set = Arc::new(set);
        self.generation += 1;
        info!(
            points = self.set.len(),
            generation = self.generation,
            "Point buffer replaced"
        );
    }

    /// Cheap handle to the current buffer
    pub fn snapshot(&self) -> Arc<PointSet> {
        Arc::clone(&self.set)
    }

    pub fn points(&self) -> &PointSet {
        &self.set
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn shading(&self) -> &dyn PointShading {
        self.shading.as_ref()
    }

    /// Points that have occurred by `current_year`, in draw order.
    pub fn visible(&self, current_year: f64) -> impl Iterator<Item = (usize, &RenderPoint)> + '_ {
        self.set
            .points()
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.is_visible_at(current_year))
    }

    pub fn visible_count(&self, current_year: f64) -> usize {
        self.visible(current_year).count()
    }

    /// Visible points whose covered diameter is still at least `min_diameter`
    /// screen points. Centers never fade, so this is what "still visible"
    /// means to a viewer.
    pub fn discernible_count(&self, current_year: f64, min_diameter: f32) -> usize {
        self.visible(current_year)
            .filter(|(_, p)| self.covered_diameter(p, current_year) >= f64::from(min_diameter))
            .count()
    }

    /// Diameter in screen points that still has coverage this frame
    pub fn covered_diameter(&self, point: &RenderPoint, current_year: f64) -> f64 {
        f64::from(point.size)
            * self
                .shading
                .visible_radius(f64::from(point.year), current_year)
    }

    /// Everything to draw this frame, back to front.
    pub fn draw_list(&self, current_year: f64, viewport: &dyn Viewport) -> Vec<DrawItem> {
        self.visible(current_year)
            .map(|(index, p)| DrawItem {
                index,
                screen: viewport.world_to_screen(p.position),
                size: p.size,
                age: p.age_at(current_year),
            })
            .collect()
    }

    /// Shaded color at squared normalized radius `r2` of a point.
    pub fn color_at(&self, point: &RenderPoint, current_year: f64, r2: f64) -> Option<Rgba> {
        self.shading
            .fragment(f64::from(point.year), current_year, r2)
    }

    /// Topmost visible point under `screen`, if any.
    ///
    /// Only points that pass the same year cut as drawing are candidates, and
    /// only within the radius where they still have coverage. On overlap the
    /// last-drawn point wins.
    pub fn hit_test(
        &self,
        current_year: f64,
        viewport: &dyn Viewport,
        screen: [f32; 2],
    ) -> Option<usize> {
        let world = viewport.screen_to_world(screen);
        let resolution = viewport.resolution();

        self.set
            .points()
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, p)| p.is_visible_at(current_year))
            .find(|(_, p)| {
                let radius = self.covered_diameter(p, current_year) * 0.5;
                let dx = (p.position[0] - world[0]) / resolution;
                let dy = (p.position[1] - world[1]) / resolution;
                dx * dx + dy * dy < radius * radius
            })
            .map(|(index, _)| index)
    }
}
