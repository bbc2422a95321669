//! Flat-colored material for the sun and the star field.
//!
//! Unlit draws output the color as-is. Lit draws apply a single Lambert term
//! from a directional light. Meshes are drawn instanced with a per-instance
//! world offset at vertex location 3.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::depth::DepthBuffer;
use crate::mesh::MeshBuffer;
use crate::msaa::multisample_state;
use crate::sphere::SphereVertex;

/// Per-draw uniform. `light_dir.w` is 1.0 for lit draws and 0.0 for unlit.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BasicUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub light_dir: [f32; 4],
}

impl BasicUniform {
    pub fn unlit(view_proj: Mat4, model: Mat4, color: [f32; 3]) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            color: [color[0], color[1], color[2], 1.0],
            light_dir: [0.0; 4],
        }
    }

    /// `light_dir` points from the surface toward the light.
    pub fn lambert(view_proj: Mat4, model: Mat4, color: [f32; 3], light_dir: Vec3) -> Self {
        let dir = light_dir.normalize_or_zero();
        Self {
            light_dir: [dir.x, dir.y, dir.z, 1.0],
            ..Self::unlit(view_proj, model, color)
        }
    }

    pub fn is_lit(&self) -> bool {
        self.light_dir[3] > 0.5
    }
}

/// World-space offset of one instance.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceOffset {
    pub offset: [f32; 3],
}

impl InstanceOffset {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![3 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<Vec3> for InstanceOffset {
    fn from(v: Vec3) -> Self {
        Self {
            offset: v.to_array(),
        }
    }
}

/// Pipeline for [`BASIC_SHADER_SOURCE`].
pub struct BasicMaterial {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl BasicMaterial {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("basic-shader"),
            source: wgpu::ShaderSource::Wgsl(BASIC_SHADER_SOURCE.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("basic-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<BasicUniform>() as u64),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("basic-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("basic-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[SphereVertex::layout(), InstanceOffset::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::stencil_state(true)),
            multisample: multisample_state(sample_count),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
        }
    }

    /// Buffers for one draw call covering `instances`.
    pub fn create_draw(
        &self,
        device: &wgpu::Device,
        label: &str,
        instances: &[InstanceOffset],
    ) -> BasicDraw {
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label}-uniform")),
            size: std::mem::size_of::<BasicUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-instances")),
            contents: bytemuck::cast_slice(instances),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-bind-group")),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        BasicDraw {
            uniform_buffer,
            instance_buffer,
            bind_group,
            instance_count: instances.len() as u32,
        }
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, draw: &BasicDraw, mesh: &MeshBuffer) {
        if draw.instance_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &draw.bind_group, &[]);
        mesh.bind(render_pass);
        render_pass.set_vertex_buffer(1, draw.instance_buffer.slice(..));
        mesh.draw_instanced(render_pass, draw.instance_count);
    }
}

/// Buffers for one instanced basic draw.
pub struct BasicDraw {
    pub uniform_buffer: wgpu::Buffer,
    pub instance_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub instance_count: u32,
}

impl BasicDraw {
    pub fn write(&self, queue: &wgpu::Queue, uniform: &BasicUniform) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniform));
    }
}

pub const BASIC_SHADER_SOURCE: &str = r#"
struct BasicUniform {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    color: vec4<f32>,
    light_dir: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> basic: BasicUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) offset: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = basic.model * vec4<f32>(in.position, 1.0) + vec4<f32>(in.offset, 0.0);
    out.clip_position = basic.view_proj * world;
    out.normal = normalize((basic.model * vec4<f32>(in.normal, 0.0)).xyz);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    if basic.light_dir.w < 0.5 {
        return basic.color;
    }
    let n_dot_l = max(dot(normalize(in.normal), basic.light_dir.xyz), 0.0);
    return vec4<f32>(basic.color.rgb * n_dot_l, basic.color.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size_is_16_aligned() {
        assert_eq!(std::mem::size_of::<BasicUniform>(), 160);
    }

    #[test]
    fn test_unlit_and_lit_flags() {
        let unlit = BasicUniform::unlit(Mat4::IDENTITY, Mat4::IDENTITY, [1.0, 1.0, 1.0]);
        assert!(!unlit.is_lit());
        assert_eq!(unlit.color, [1.0, 1.0, 1.0, 1.0]);

        let lit = BasicUniform::lambert(
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            [1.0, 1.0, 0.9],
            Vec3::new(1000.0, 1000.0, 1000.0),
        );
        assert!(lit.is_lit());
        let dir = Vec3::new(lit.light_dir[0], lit.light_dir[1], lit.light_dir[2]);
        assert!((dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_shader_declares_entry_points() {
        assert!(BASIC_SHADER_SOURCE.contains("fn vs_main"));
        assert!(BASIC_SHADER_SOURCE.contains("fn fs_main"));
        assert!(BASIC_SHADER_SOURCE.contains("@location(3) offset"));
    }

    #[test]
    fn test_instance_offset_from_vec3() {
        let inst = InstanceOffset::from(Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(inst.offset, [1.0, -2.0, 3.0]);
        assert_eq!(std::mem::size_of::<InstanceOffset>(), 12);
    }
}
