//! Vertex and index buffers for sphere meshes.

use wgpu::util::DeviceExt;

use crate::sphere::SphereGeometry;

/// A sphere uploaded to the GPU.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    pub fn from_sphere(device: &wgpu::Device, label: &str, geometry: &SphereGeometry) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        }
    }

    /// Bind the vertex buffer to slot 0 and the index buffer.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        self.draw_instanced(render_pass, 1);
    }

    pub fn draw_instanced(&self, render_pass: &mut wgpu::RenderPass<'_>, instances: u32) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..instances);
    }
}
