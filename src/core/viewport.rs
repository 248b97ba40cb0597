//! Camera / viewport collaborator
//!
//! Screen coordinates are in points with the origin at the top-left of the
//! map surface and y pointing down; world coordinates are Web Mercator
//! metres with y pointing up.

use serde::Deserialize;

use super::projection::{from_lon_lat, to_lon_lat, HALF_SIZE};

/// Resolution (metres per point) at zoom 0 for 256-point tiles
pub const ZOOM0_RESOLUTION: f64 = 156_543.033_927_980_97;

const MIN_ZOOM: f64 = 0.0;
const MAX_ZOOM: f64 = 22.0;

/// Split a world coordinate into a coarse `f32` and the `f32` remainder.
///
/// Projected metres reach 2e7, where a single `f32` only resolves 2 m.
/// Subtracting the coarse parts first and the remainders second keeps
/// offsets from a nearby camera center exact at every zoom level.
pub fn split_f64(value: f64) -> [f32; 2] {
    let high = value as f32;
    [high, (value - f64::from(high)) as f32]
}

/// What picking and drawing need from the map.
pub trait Viewport {
    fn world_to_screen(&self, world: [f64; 2]) -> [f32; 2];
    fn screen_to_world(&self, screen: [f32; 2]) -> [f64; 2];
    /// World units per screen point
    fn resolution(&self) -> f64;
}

/// Initial view, in geographic terms
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// [longitude, latitude] in degrees
    pub center: [f64; 2],
    pub zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            zoom: 2.0,
        }
    }
}

/// Pan/zoom camera over a rectangular surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    center: [f64; 2],
    zoom: f64,
    /// Surface size in points
    size: [f32; 2],
}

impl Camera {
    pub fn new(view: &ViewConfig, size: [f32; 2]) -> Self {
        let center = from_lon_lat(view.center[0], view.center[1]).unwrap_or([0.0, 0.0]);
        Self {
            center,
            zoom: view.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            size,
        }
    }

    pub fn center(&self) -> [f64; 2] {
        self.center
    }

    pub fn center_lon_lat(&self) -> [f64; 2] {
        to_lon_lat(self.center)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn size(&self) -> [f32; 2] {
        self.size
    }

    pub fn set_size(&mut self, size: [f32; 2]) {
        self.size = size;
    }

    /// Move the view so content follows a pointer drag of `delta` points.
    pub fn pan(&mut self, delta: [f32; 2]) {
        let res = self.resolution();
        self.center[0] -= f64::from(delta[0]) * res;
        self.center[1] += f64::from(delta[1]) * res;
        self.center[1] = self.center[1].clamp(-HALF_SIZE, HALF_SIZE);
    }

    /// Zoom by `delta` levels keeping the world point under `anchor` fixed.
    pub fn zoom_by(&mut self, delta: f64, anchor: [f32; 2]) {
        let before = self.screen_to_world(anchor);
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        let after = self.screen_to_world(anchor);
        self.center[0] += before[0] - after[0];
        self.center[1] += before[1] - after[1];
    }
}

impl Viewport for Camera {
    fn world_to_screen(&self, world: [f64; 2]) -> [f32; 2] {
        let res = self.resolution();
        [
            (f64::from(self.size[0]) * 0.5 + (world[0] - self.center[0]) / res) as f32,
            (f64::from(self.size[1]) * 0.5 - (world[1] - self.center[1]) / res) as f32,
        ]
    }

    fn screen_to_world(&self, screen: [f32; 2]) -> [f64; 2] {
        let res = self.resolution();
        [
            self.center[0] + (f64::from(screen[0]) - f64::from(self.size[0]) * 0.5) * res,
            self.center[1] - (f64::from(screen[1]) - f64::from(self.size[1]) * 0.5) * res,
        ]
    }

    fn resolution(&self) -> f64 {
        ZOOM0_RESOLUTION / 2f64.powf(self.zoom)
    }
}
