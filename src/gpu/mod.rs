//! GPU state and the per-frame draw call.
//!
//! The renderer owns the wgpu surface, device and buffers. Particle
//! integration happens on the CPU; each frame uploads the pool's model
//! matrices and material colors, then draws one wireframe batch per shape.

mod wireframe;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::GpuError;
use crate::mesh::Shape;
use crate::particle::Particle;
use crate::scene::Scene;
use wireframe::ShapeBatch;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
/// Line half-thickness in world units.
const LINE_THICKNESS: f32 = 0.008;
/// The draw surface never renders at more than twice logical resolution.
const MAX_PIXEL_RATIO: f64 = 2.0;

/// Per-frame scene uniforms: camera plus the light rig.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    key_dir: [f32; 4],
    key_color: [f32; 4],
    fill_dir: [f32; 4],
    fill_color: [f32; 4],
    ambient: [f32; 4],
}

/// GPU-side particle record: world transform plus color/opacity.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ParticleGpu {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

impl ParticleGpu {
    fn from_particle(particle: &Particle) -> Self {
        Self {
            model: particle.model_matrix().to_cols_array_2d(),
            color: particle
                .material
                .color
                .extend(particle.material.opacity)
                .to_array(),
        }
    }
}

fn scene_uniforms(scene: &Scene) -> SceneUniforms {
    let rig = &scene.lights;
    SceneUniforms {
        view_proj: scene.camera.view_proj().to_cols_array_2d(),
        key_dir: rig.key.direction.extend(0.0).to_array(),
        key_color: rig.key.color.extend(rig.key.intensity).to_array(),
        fill_dir: rig.fill.direction.extend(0.0).to_array(),
        fill_color: rig.fill.color.extend(rig.fill.intensity).to_array(),
        ambient: rig.ambient.color.extend(rig.ambient.intensity).to_array(),
    }
}

/// Surface extent after capping the platform pixel ratio.
fn capped_extent(width: u32, height: u32, scale_factor: f64) -> (u32, u32) {
    let cap = (MAX_PIXEL_RATIO / scale_factor.max(1.0)).min(1.0);
    (
        (width as f64 * cap).round() as u32,
        (height as f64 * cap).round() as u32,
    )
}

pub(crate) struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    particle_buffer: wgpu::Buffer,
    batches: Vec<ShapeBatch>,
    depth_texture: wgpu::TextureView,
    /// Particle indices grouped by shape, in batch order.
    draw_order: Vec<usize>,
    /// Reused CPU staging for the per-frame particle upload.
    staging: Vec<ParticleGpu>,
}

impl GpuState {
    /// Acquire the GPU and build every static resource for `scene`.
    ///
    /// This is the backdrop's only fallible setup step; on error the caller
    /// must never start the animation loop.
    pub(crate) async fn new(
        window: Arc<Window>,
        scene: &Scene,
        scale_factor: f64,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let (width, height) = capped_extent(size.width.max(1), size.height.max(1), scale_factor);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let uniforms = scene_uniforms(scene);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Group particles by shape so each mesh draws as one instanced batch.
        // Shapes never change after build, so the grouping is computed once.
        let mut draw_order = Vec::with_capacity(scene.particles.len());
        let mut ranges = Vec::new();
        for shape in Shape::ALL {
            let first = draw_order.len() as u32;
            draw_order.extend(
                scene
                    .particles
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.shape == shape)
                    .map(|(i, _)| i),
            );
            let count = draw_order.len() as u32 - first;
            if count > 0 {
                ranges.push((shape, first, count));
            }
        }

        let staging: Vec<ParticleGpu> = draw_order
            .iter()
            .map(|&i| ParticleGpu::from_particle(&scene.particles[i]))
            .collect();

        let particle_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Buffer"),
            contents: bytemuck::cast_slice(&staging),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let layout = wireframe::create_bind_group_layout(&device);
        let pipeline = wireframe::create_pipeline(&device, &layout, config.format);

        let batches = ranges
            .iter()
            .map(|&(shape, first, count)| {
                ShapeBatch::new(
                    &device,
                    &layout,
                    &uniform_buffer,
                    &particle_buffer,
                    &shape.mesh(),
                    LINE_THICKNESS,
                    first,
                    count,
                )
            })
            .collect();

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            particle_buffer,
            batches,
            depth_texture,
            draw_order,
            staging,
        })
    }

    /// Reconfigure the surface and depth buffer for a new window size.
    pub(crate) fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>, scale_factor: f64) {
        if new_size.width > 0 && new_size.height > 0 {
            let (width, height) = capped_extent(new_size.width, new_size.height, scale_factor);
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    /// Upload the frame's state and draw the scene once.
    pub(crate) fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let uniforms = scene_uniforms(scene);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        self.staging.clear();
        self.staging.extend(
            self.draw_order
                .iter()
                .map(|&i| ParticleGpu::from_particle(&scene.particles[i])),
        );
        self.queue
            .write_buffer(&self.particle_buffer, 0, bytemuck::cast_slice(&self.staging));

        let output = self.surface.get_current_texture()?;
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
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.01,
                            b: 0.04,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            for batch in &self.batches {
                render_pass.set_bind_group(0, batch.bind_group(), &[]);
                render_pass.draw(0..6, 0..batch.instance_count());
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneConfig;

    #[test]
    fn test_uniform_layout() {
        // mat4 + five vec4s, 16-byte aligned throughout.
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 144);
        assert_eq!(std::mem::size_of::<ParticleGpu>(), 80);
    }

    #[test]
    fn test_particle_gpu_packs_material() {
        let scene = Scene::build(&SceneConfig::default(), 1.0);
        let gpu = ParticleGpu::from_particle(&scene.particles[0]);
        assert_eq!(gpu.color[3], scene.particles[0].material.opacity);
    }

    #[test]
    fn test_pixel_ratio_cap() {
        // At or below the cap the surface matches the window.
        assert_eq!(capped_extent(800, 600, 1.0), (800, 600));
        assert_eq!(capped_extent(1600, 1200, 2.0), (1600, 1200));
        // Beyond the cap the surface shrinks proportionally.
        assert_eq!(capped_extent(2400, 1800, 3.0), (1600, 1200));
    }
}
