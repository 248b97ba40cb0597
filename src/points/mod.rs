//! GPU point layer
//!
//! Instanced fading points drawn inside egui's render pass.

mod renderer;

pub use renderer::{GpuPoint, PointCallback, PointRenderer, PointUniforms};
