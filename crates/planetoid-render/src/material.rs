//! Shader-backed sphere materials.
//!
//! Every surface shader shares one bind group layout at group 0:
//! binding 0 is the [`TransformUniform`] (vertex stage), binding 1 is the
//! surface's own uniform struct (both stages), packed on the CPU from its
//! uniform table.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::depth::DepthBuffer;
use crate::mesh::MeshBuffer;
use crate::msaa::multisample_state;
use crate::shader::CompiledShader;
use crate::sphere::SphereVertex;

/// Camera and model matrices for one draw.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TransformUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn new(view_proj: Mat4, model: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        }
    }
}

/// How a material's fragments combine with what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Opaque,
    /// Standard source-over using the fragment alpha.
    Alpha,
    /// `src * alpha + dst`, for glows.
    Additive,
}

impl BlendMode {
    pub fn blend_state(self) -> Option<wgpu::BlendState> {
        match self {
            BlendMode::Opaque => None,
            BlendMode::Alpha => Some(wgpu::BlendState::ALPHA_BLENDING),
            BlendMode::Additive => Some(wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            }),
        }
    }

    pub fn is_transparent(self) -> bool {
        self != BlendMode::Opaque
    }
}

/// Pipeline settings for one surface material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    pub label: String,
    /// Byte size of the packed surface uniform struct.
    pub uniform_size: u64,
    pub blend: BlendMode,
    pub depth_write: bool,
    pub cull_mode: Option<wgpu::Face>,
    /// Samples per pixel of the color and depth targets.
    pub sample_count: u32,
}

impl MaterialDesc {
    pub fn opaque(label: impl Into<String>, uniform_size: u64) -> Self {
        Self {
            label: label.into(),
            uniform_size,
            blend: BlendMode::Opaque,
            depth_write: true,
            cull_mode: Some(wgpu::Face::Back),
            sample_count: 1,
        }
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_depth_write(mut self, depth_write: bool) -> Self {
        self.depth_write = depth_write;
        self
    }

    pub fn with_samples(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count.max(1);
        self
    }
}

/// A render pipeline built from a compiled surface shader.
pub struct ShaderMaterial {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
    desc: MaterialDesc,
}

impl ShaderMaterial {
    pub fn new(
        device: &wgpu::Device,
        shader: &CompiledShader,
        surface_format: wgpu::TextureFormat,
        desc: MaterialDesc,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{}-bgl", desc.label)),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<TransformUniform>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(desc.uniform_size),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{}-pipeline-layout", desc.label)),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{}-pipeline", desc.label)),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader.vertex,
                entry_point: Some("vs_main"),
                buffers: &[SphereVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: desc.cull_mode,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(DepthBuffer::stencil_state(desc.depth_write)),
            multisample: multisample_state(desc.sample_count),
            fragment: Some(wgpu::FragmentState {
                module: &shader.fragment,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: desc.blend.blend_state(),
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
            desc,
        }
    }

    pub fn desc(&self) -> &MaterialDesc {
        &self.desc
    }

    /// Allocate the per-mesh uniform buffers and bind group.
    pub fn create_binding(&self, device: &wgpu::Device) -> MaterialBinding {
        let transform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{}-transform", self.desc.label)),
            size: std::mem::size_of::<TransformUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{}-uniforms", self.desc.label)),
            size: self.desc.uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{}-bind-group", self.desc.label)),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: transform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });

        MaterialBinding {
            transform_buffer,
            uniform_buffer,
            bind_group,
        }
    }

    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        binding: &MaterialBinding,
        mesh: &MeshBuffer,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &binding.bind_group, &[]);
        mesh.bind(render_pass);
        mesh.draw(render_pass);
    }
}

/// GPU buffers feeding one mesh drawn with a [`ShaderMaterial`].
pub struct MaterialBinding {
    pub transform_buffer: wgpu::Buffer,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl MaterialBinding {
    pub fn write_transform(&self, queue: &wgpu::Queue, transform: &TransformUniform) {
        queue.write_buffer(&self.transform_buffer, 0, bytemuck::bytes_of(transform));
    }

    /// Upload a packed surface uniform struct.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, bytes: &[u8]) {
        queue.write_buffer(&self.uniform_buffer, 0, bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_uniform_size() {
        assert_eq!(std::mem::size_of::<TransformUniform>(), 128);
    }

    #[test]
    fn test_transform_uniform_column_major() {
        let model = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let uniform = TransformUniform::new(Mat4::IDENTITY, model);
        assert_eq!(uniform.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.view_proj, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn test_blend_modes() {
        assert!(BlendMode::Opaque.blend_state().is_none());
        assert_eq!(
            BlendMode::Alpha.blend_state(),
            Some(wgpu::BlendState::ALPHA_BLENDING)
        );
        let additive = BlendMode::Additive.blend_state().unwrap();
        assert_eq!(additive.color.dst_factor, wgpu::BlendFactor::One);
        assert!(BlendMode::Additive.is_transparent());
        assert!(!BlendMode::Opaque.is_transparent());
    }

    #[test]
    fn test_desc_builders() {
        let desc = MaterialDesc::opaque("atmosphere", 64)
            .with_blend(BlendMode::Additive)
            .with_depth_write(false);
        assert_eq!(desc.uniform_size, 64);
        assert_eq!(desc.blend, BlendMode::Additive);
        assert!(!desc.depth_write);
        assert_eq!(desc.cull_mode, Some(wgpu::Face::Back));
        assert_eq!(desc.sample_count, 1);
        assert_eq!(desc.with_samples(4).sample_count, 4);
    }
}
