//! wgpu implementation of [`SceneAdapter`].
//!
//! Every renderable owns a vertex buffer of raw positions and a small
//! uniform buffer with its colour and the shared camera matrices. Vertex
//! buffers grow to the next power of two when a frame brings more
//! positions than fit, and are otherwise reused.

mod pipelines;
mod shaders;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use log::{info, warn};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::PerspectiveCamera;
use crate::error::{GpuError, RenderError};
use crate::resize::Viewport;
use crate::scene::{Material, RenderableId, SceneAdapter, SceneRotation};
use pipelines::{Pipelines, POINT_QUAD_VERTICES};

/// Smallest vertex buffer allocated for a renderable.
const MIN_VERTEX_CAPACITY: usize = 64;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.05,
    a: 1.0,
};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(crate) struct RenderUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    color: [f32; 4],
    proj_scale: [f32; 2],
    point_size: f32,
    _pad: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Primitive {
    Points,
    Lines,
}

struct Renderable {
    primitive: Primitive,
    material: Material,
    vertex_buffer: wgpu::Buffer,
    /// Capacity of `vertex_buffer` in positions.
    capacity: usize,
    /// Positions currently written.
    count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Renders point clouds and line lists into a window surface.
pub struct GpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipelines: Pipelines,
    renderables: Vec<Renderable>,
}

impl GpuRenderer {
    /// Create a renderer for `window`.
    ///
    /// Fails when the host has no usable surface, adapter or device.
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let adapter_name = adapter.get_info().name;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(GpuError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipelines = Pipelines::new(&device, config.format);

        info!("GPU adapter: {} ({:?})", adapter_name, surface_format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipelines,
            renderables: Vec::new(),
        })
    }

    /// Current surface size.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.config.width, self.config.height)
    }

    fn create_vertex_buffer(&self, capacity: usize) -> wgpu::Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Renderable Vertex Buffer"),
            size: (capacity * std::mem::size_of::<Vec3>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn add(
        &mut self,
        primitive: Primitive,
        positions: &[Vec3],
        material: Material,
    ) -> RenderableId {
        let capacity = positions.len().next_power_of_two().max(MIN_VERTEX_CAPACITY);
        let vertex_buffer = self.create_vertex_buffer(capacity);
        if !positions.is_empty() {
            self.queue
                .write_buffer(&vertex_buffer, 0, bytemuck::cast_slice(positions));
        }

        let uniform_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Renderable Uniform Buffer"),
            contents: bytemuck::bytes_of(&RenderUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Renderable Bind Group"),
            layout: &self.pipelines.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        self.renderables.push(Renderable {
            primitive,
            material,
            vertex_buffer,
            capacity,
            count: positions.len() as u32,
            uniform_buffer,
            bind_group,
        });
        RenderableId::new(self.renderables.len() - 1)
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

impl SceneAdapter for GpuRenderer {
    fn add_points(&mut self, positions: &[Vec3], material: Material) -> RenderableId {
        self.add(Primitive::Points, positions, material)
    }

    fn add_lines(&mut self, positions: &[Vec3], material: Material) -> RenderableId {
        self.add(Primitive::Lines, positions, material)
    }

    fn set_positions(&mut self, id: RenderableId, positions: &[Vec3]) {
        let needed = positions.len();
        if needed > self.renderables[id.index()].capacity {
            let capacity = needed.next_power_of_two();
            let buffer = self.create_vertex_buffer(capacity);
            let renderable = &mut self.renderables[id.index()];
            renderable.vertex_buffer = buffer;
            renderable.capacity = capacity;
        }

        let renderable = &mut self.renderables[id.index()];
        if needed > 0 {
            self.queue
                .write_buffer(&renderable.vertex_buffer, 0, bytemuck::cast_slice(positions));
        }
        renderable.count = needed as u32;
    }

    fn set_material(&mut self, id: RenderableId, material: Material) {
        self.renderables[id.index()].material = material;
    }

    fn set_output_size(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.reconfigure();
    }

    fn render(
        &mut self,
        camera: &PerspectiveCamera,
        rotation: SceneRotation,
    ) -> Result<(), RenderError> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let view_proj = camera.view_proj().to_cols_array_2d();
        let model = rotation.matrix().to_cols_array_2d();
        let proj_scale = camera.projection_scale().to_array();

        for renderable in &self.renderables {
            let material = renderable.material;
            let uniforms = RenderUniforms {
                view_proj,
                model,
                color: material.color.extend(material.opacity).to_array(),
                proj_scale,
                point_size: material.size,
                _pad: 0.0,
            };
            self.queue
                .write_buffer(&renderable.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for renderable in self.renderables.iter().filter(|r| r.count > 0) {
                render_pass.set_bind_group(0, &renderable.bind_group, &[]);
                render_pass.set_vertex_buffer(0, renderable.vertex_buffer.slice(..));
                match renderable.primitive {
                    Primitive::Points => {
                        render_pass.set_pipeline(&self.pipelines.points);
                        render_pass.draw(0..POINT_QUAD_VERTICES, 0..renderable.count);
                    }
                    Primitive::Lines => {
                        render_pass.set_pipeline(&self.pipelines.lines);
                        render_pass.draw(0..renderable.count, 0..1);
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
