//! Wireframe rendering of the particle pool.
//!
//! Each particle is drawn as the edge set of its polyhedron. Line segments
//! live in a storage buffer per shape; the vertex shader expands every
//! segment into a thin quad built from two perpendiculars so edges stay
//! visible from any camera angle, then shades it with the scene's light rig.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::DEPTH_FORMAT;
use crate::mesh::WireframeMesh;

/// GPU parameters for one shape batch.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct WireframeParams {
    /// Line half-thickness in world units.
    line_thickness: f32,
    /// Number of lines per mesh.
    lines_per_mesh: u32,
    /// Index of the batch's first particle in the pool buffer.
    first_particle: u32,
    /// Padding for alignment.
    _pad: u32,
}

/// One draw batch: every particle sharing a polyhedron kind.
pub(crate) struct ShapeBatch {
    /// Buffer storing mesh line segments (6 floats per line: x0,y0,z0,x1,y1,z1).
    _mesh_buffer: wgpu::Buffer,
    _params_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    lines_per_mesh: u32,
    particle_count: u32,
}

impl ShapeBatch {
    pub(crate) fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        particle_buffer: &wgpu::Buffer,
        mesh: &WireframeMesh,
        line_thickness: f32,
        first_particle: u32,
        particle_count: u32,
    ) -> Self {
        let mesh_data = mesh.to_vertices();
        let lines_per_mesh = mesh.line_count();

        let mesh_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wireframe Mesh Buffer"),
            contents: bytemuck::cast_slice(&mesh_data),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let params = WireframeParams {
            line_thickness,
            lines_per_mesh,
            first_particle,
            _pad: 0,
        };
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wireframe Params Buffer"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Wireframe Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: particle_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: mesh_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        Self {
            _mesh_buffer: mesh_buffer,
            _params_buffer: params_buffer,
            bind_group,
            lines_per_mesh,
            particle_count,
        }
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Total line instances to draw (lines_per_mesh * particle_count).
    pub(crate) fn instance_count(&self) -> u32 {
        self.lines_per_mesh * self.particle_count
    }
}

/// Bind group layout shared by every shape batch.
pub(crate) fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Wireframe Bind Group Layout"),
        entries: &[
            // Scene uniforms (view_proj + lights)
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            // Particle transforms + colors
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            // Mesh line segments
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            // Batch params
            wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    })
}

/// Create the alpha-blended wireframe pipeline shared by all batches.
pub(crate) fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Wireframe Shader"),
        source: wgpu::ShaderSource::Wgsl(WIREFRAME_SHADER.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Wireframe Pipeline Layout"),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Wireframe Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Vertex/fragment shader for the quad-expanded wireframe lines.
///
/// The pseudo-normal trick relies on every mesh being a convex polyhedron
/// centered on its own origin: the rotated vertex position points away
/// from the center and stands in for a surface normal.
pub(crate) const WIREFRAME_SHADER: &str = r#"struct SceneUniforms {
    view_proj: mat4x4<f32>,
    key_dir: vec4<f32>,
    key_color: vec4<f32>,
    fill_dir: vec4<f32>,
    fill_color: vec4<f32>,
    ambient: vec4<f32>,
};

struct ParticleData {
    model: mat4x4<f32>,
    color: vec4<f32>,
};

struct WireframeParams {
    line_thickness: f32,
    lines_per_mesh: u32,
    first_particle: u32,
};

@group(0) @binding(0) var<uniform> uniforms: SceneUniforms;
@group(0) @binding(1) var<storage, read> particles: array<ParticleData>;
@group(0) @binding(2) var<storage, read> mesh_lines: array<f32>;
@group(0) @binding(3) var<uniform> params: WireframeParams;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @builtin(instance_index) instance_index: u32,
) -> VertexOutput {
    var out: VertexOutput;

    // Decode particle index and line index from instance
    let particle_idx = params.first_particle + instance_index / params.lines_per_mesh;
    let line_idx = instance_index % params.lines_per_mesh;
    let particle = particles[particle_idx];

    // Read line endpoints from mesh buffer (6 floats per line)
    let line_base = line_idx * 6u;
    let local_a = vec3<f32>(
        mesh_lines[line_base],
        mesh_lines[line_base + 1u],
        mesh_lines[line_base + 2u]
    );
    let local_b = vec3<f32>(
        mesh_lines[line_base + 3u],
        mesh_lines[line_base + 4u],
        mesh_lines[line_base + 5u]
    );

    let world_a = (particle.model * vec4<f32>(local_a, 1.0)).xyz;
    let world_b = (particle.model * vec4<f32>(local_b, 1.0)).xyz;

    // Create thin quad along the line
    let line_dir = world_b - world_a;
    let line_len = length(line_dir);

    if line_len < 0.0001 {
        out.clip_position = vec4<f32>(0.0, 0.0, -1000.0, 1.0);
        out.color = vec4<f32>(0.0);
        return out;
    }

    let dir = line_dir / line_len;

    // Find perpendicular direction for line width
    var perp = cross(dir, vec3<f32>(0.0, 1.0, 0.0));
    if length(perp) < 0.001 {
        perp = cross(dir, vec3<f32>(1.0, 0.0, 0.0));
    }
    perp = normalize(perp) * params.line_thickness;

    // Second perpendicular keeps the quad visible from all angles
    let perp2 = normalize(cross(dir, perp)) * params.line_thickness;

    // Build quad vertices (2 triangles, 6 vertices)
    var pos: vec3<f32>;
    var local_pos: vec3<f32>;
    switch vertex_index {
        case 0u: { pos = world_a - perp - perp2; local_pos = local_a; }
        case 1u: { pos = world_a + perp + perp2; local_pos = local_a; }
        case 2u: { pos = world_b - perp - perp2; local_pos = local_b; }
        case 3u: { pos = world_a + perp + perp2; local_pos = local_a; }
        case 4u: { pos = world_b - perp - perp2; local_pos = local_b; }
        default: { pos = world_b + perp + perp2; local_pos = local_b; }
    }

    // Pseudo-normal from the rotated vertex position (w = 0 drops the
    // translation column)
    let normal = normalize((particle.model * vec4<f32>(local_pos, 0.0)).xyz);
    let key = max(dot(normal, uniforms.key_dir.xyz), 0.0);
    let fill = max(dot(normal, uniforms.fill_dir.xyz), 0.0);
    let lit = uniforms.ambient.rgb * uniforms.ambient.w
        + uniforms.key_color.rgb * uniforms.key_color.w * key
        + uniforms.fill_color.rgb * uniforms.fill_color.w * fill;

    out.clip_position = uniforms.view_proj * vec4<f32>(pos, 1.0);
    out.color = vec4<f32>(particle.color.rgb * lit, particle.color.a);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use naga::valid::{Capabilities, ValidationFlags, Validator};

    #[test]
    fn test_wireframe_shader_is_valid_wgsl() {
        let module = naga::front::wgsl::parse_str(WIREFRAME_SHADER)
            .expect("wireframe shader failed to parse");

        Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .expect("wireframe shader failed validation");
    }

    #[test]
    fn test_params_layout() {
        // Uniform buffers round up to 16 bytes; the WGSL struct reads 12.
        assert_eq!(std::mem::size_of::<WireframeParams>(), 16);
    }
}
