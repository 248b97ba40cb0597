//! GPU renderer for the fading point layer
//!
//! One instanced screen-space quad per point, clipped to a disc and faded in
//! the fragment stage. Draws directly into egui's render pass via
//! CallbackTrait. The instance buffer is only rewritten when the point set
//! generation changes; per frame only the uniform block moves.

use bytemuck::{Pod, Zeroable};
use egui_wgpu::wgpu::{self, util::DeviceExt};
use std::sync::Arc;
use tracing::debug;

use crate::core::viewport::split_f64;
use crate::core::{PointSet, PointShading, RenderPoint, ShadingUniforms};

/// Initial instance capacity; grown on demand
const INITIAL_CAPACITY: usize = 65_536;

/// GPU-compatible point instance, 24 bytes.
/// Positions are split into coarse and remainder parts (see [`split_f64`]).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuPoint {
    pub position_high: [f32; 2],
    pub position_low: [f32; 2],
    pub size: f32,
    pub year: f32,
}

impl From<&RenderPoint> for GpuPoint {
    fn from(p: &RenderPoint) -> Self {
        let [x_high, x_low] = split_f64(p.position[0]);
        let [y_high, y_low] = split_f64(p.position[1]);
        Self {
            position_high: [x_high, y_high],
            position_low: [x_low, y_low],
            size: p.size,
            year: p.year as f32,
        }
    }
}

/// Uniform block, 64 bytes; field order matches `PointUniforms` in the shader
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PointUniforms {
    /// Camera center in projected metres, coarse part
    pub center_high: [f32; 2],
    /// Camera center remainder
    pub center_low: [f32; 2],
    /// Surface size in points
    pub viewport: [f32; 2],
    /// Metres per point
    pub resolution: f32,
    pub current_year: f32,
    pub growth_base: f32,
    pub max_decay: f32,
    /// vec4 alignment
    pub _pad: [f32; 2],
    pub color: [f32; 4],
}

impl PointUniforms {
    pub fn new(shading: ShadingUniforms, center: [f64; 2], viewport: [f32; 2], resolution: f64) -> Self {
        let [x_high, x_low] = split_f64(center[0]);
        let [y_high, y_low] = split_f64(center[1]);
        Self {
            center_high: [x_high, y_high],
            center_low: [x_low, y_low],
            viewport,
            resolution: resolution as f32,
            current_year: shading.current_year,
            growth_base: shading.growth_base,
            max_decay: shading.max_decay,
            _pad: [0.0; 2],
            color: shading.color,
        }
    }
}

impl Default for PointUniforms {
    fn default() -> Self {
        Self {
            center_high: [0.0, 0.0],
            center_low: [0.0, 0.0],
            viewport: [1.0, 1.0],
            resolution: 1.0,
            current_year: 0.0,
            growth_base: 1.1,
            max_decay: 1.0e6,
            _pad: [0.0; 2],
            color: [1.0, 0.0, 0.0, 0.5],
        }
    }
}

pub struct PointRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    capacity: usize,
    instance_count: u32,
    /// Point set generation currently resident on the GPU
    uploaded_generation: Option<u64>,
}

impl PointRenderer {
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        shading: &dyn PointShading,
    ) -> Self {
        let program = shading.program();
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(program.label),
            source: wgpu::ShaderSource::Wgsl(program.source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("points_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("points_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("points_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(program.vertex_entry),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GpuPoint>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x2, // position_high
                        },
                        wgpu::VertexAttribute {
                            offset: 8,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x2, // position_low
                        },
                        wgpu::VertexAttribute {
                            offset: 16,
                            shader_location: 2,
                            format: wgpu::VertexFormat::Float32, // size
                        },
                        wgpu::VertexAttribute {
                            offset: 20,
                            shader_location: 3,
                            format: wgpu::VertexFormat::Float32, // year
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(program.fragment_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("points_uniforms"),
            contents: bytemuck::bytes_of(&PointUniforms::default()),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("points_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            instance_buffer: Self::create_instance_buffer(device, INITIAL_CAPACITY),
            capacity: INITIAL_CAPACITY,
            instance_count: 0,
            uploaded_generation: None,
        }
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("points_instances"),
            size: (capacity * std::mem::size_of::<GpuPoint>()) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::VERTEX,
            mapped_at_creation: false,
        })
    }

    /// Upload the point set if its generation differs from what is resident.
    pub fn sync_points(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        set: &PointSet,
        generation: u64,
    ) {
        if self.uploaded_generation == Some(generation) {
            return;
        }

        let instances: Vec<GpuPoint> = set.points().iter().map(GpuPoint::from).collect();
        if instances.len() > self.capacity {
            self.capacity = instances.len().next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(device, self.capacity);
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        self.instance_count = instances.len() as u32;
        self.uploaded_generation = Some(generation);
        debug!(
            instances = self.instance_count,
            capacity = self.capacity,
            generation,
            "Point instances uploaded"
        );
    }

    pub fn upload_uniforms(&self, queue: &wgpu::Queue, uniforms: &PointUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn instance_buffer(&self) -> &wgpu::Buffer {
        &self.instance_buffer
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }
}

/// Callback for egui integration
pub struct PointCallback {
    pub set: Arc<PointSet>,
    pub generation: u64,
    pub uniforms: PointUniforms,
}

impl egui_wgpu::CallbackTrait for PointCallback {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        _screen_descriptor: &egui_wgpu::ScreenDescriptor,
        _encoder: &mut wgpu::CommandEncoder,
        callback_resources: &mut egui_wgpu::CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        let Some(renderer) = callback_resources.get_mut::<PointRenderer>() else {
            return Vec::new();
        };

        renderer.sync_points(device, queue, &self.set, self.generation);
        renderer.upload_uniforms(queue, &self.uniforms);
        Vec::new()
    }

    fn paint(
        &self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'static>,
        callback_resources: &egui_wgpu::CallbackResources,
    ) {
        let Some(renderer) = callback_resources.get::<PointRenderer>() else {
            return;
        };
        if renderer.instance_count() == 0 {
            return;
        }

        render_pass.set_pipeline(renderer.pipeline());
        render_pass.set_bind_group(0, renderer.bind_group(), &[]);
        render_pass.set_vertex_buffer(0, renderer.instance_buffer().slice(..));
        render_pass.draw(0..6, 0..renderer.instance_count());
    }
}
