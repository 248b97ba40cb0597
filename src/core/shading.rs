//! Point shading strategies
//!
//! A strategy bundles the GPU program (vertex + fragment stage), the
//! per-frame uniform producer, and a CPU evaluation of the fragment stage
//! that the CPU draw path and picking share. The renderer is handed one at
//! construction; nothing subclasses anything.

use serde::Deserialize;

/// Premultiplied RGBA in 0..=1
pub type Rgba = [f32; 4];

/// GPU program of a shading strategy
#[derive(Clone, Copy, Debug)]
pub struct ShaderProgram {
    pub label: &'static str,
    /// WGSL source holding both stages
    pub source: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
}

/// Per-frame values a strategy feeds its program
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadingUniforms {
    pub current_year: f32,
    pub growth_base: f32,
    pub max_decay: f32,
    /// Straight (not premultiplied) base color
    pub color: [f32; 4],
}

/// Pluggable shading for the point renderer.
pub trait PointShading: Send + Sync {
    fn program(&self) -> ShaderProgram;

    fn uniforms(&self, current_year: f64) -> ShadingUniforms;

    /// Color at squared normalized radius `r2` (0 = center, 1 = edge) of a
    /// point from `point_year`, or `None` if the fragment is discarded.
    fn fragment(&self, point_year: f64, current_year: f64, r2: f64) -> Option<Rgba>;

    /// Largest normalized radius at which the point still has any coverage.
    fn visible_radius(&self, point_year: f64, current_year: f64) -> f64;
}

/// Hermite smoothstep, 0 below `edge0`, 1 above `edge1`.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Bloom-then-contract fade keyed on event age.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FadeShading {
    /// Base of the exponential shrink term, `growth_base ^ age`
    pub growth_base: f64,
    /// Upper bound on the shrink term
    pub max_decay: f64,
    /// Straight RGBA base color
    pub color: [f32; 4],
}

impl Default for FadeShading {
    fn default() -> Self {
        Self {
            growth_base: 1.1,
            max_decay: 1.0e6,
            color: [1.0, 0.0, 0.0, 0.5],
        }
    }
}

impl FadeShading {
    pub fn decay(&self, age: f64) -> f64 {
        self.growth_base.powf(age.max(0.0)).min(self.max_decay)
    }

    /// Coverage in 0..=1 at squared radius `r2` for a point `age` years old.
    pub fn alpha(&self, age: f64, r2: f64) -> f64 {
        let value = 2.0 * (1.0 - r2 * self.decay(age));
        smoothstep(0.0, 1.0, value)
    }
}

impl PointShading for FadeShading {
    fn program(&self) -> ShaderProgram {
        ShaderProgram {
            label: "fade_points",
            source: include_str!("fade.wgsl"),
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
        }
    }

    fn uniforms(&self, current_year: f64) -> ShadingUniforms {
        ShadingUniforms {
            current_year: current_year as f32,
            growth_base: self.growth_base as f32,
            max_decay: self.max_decay as f32,
            color: self.color,
        }
    }

    fn fragment(&self, point_year: f64, current_year: f64, r2: f64) -> Option<Rgba> {
        if point_year > current_year || r2 > 1.0 {
            return None;
        }
        let alpha = self.color[3] * self.alpha(current_year - point_year, r2) as f32;
        Some([
            self.color[0] * alpha,
            self.color[1] * alpha,
            self.color[2] * alpha,
            alpha,
        ])
    }

    fn visible_radius(&self, point_year: f64, current_year: f64) -> f64 {
        if point_year > current_year {
            return 0.0;
        }
        // value > 0  <=>  r^2 * decay < 1
        (1.0 / self.decay(current_year - point_year)).sqrt().min(1.0)
    }
}
