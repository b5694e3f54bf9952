//! Vertex and index upload for baked [`Geometry`].

use hexisle_mesh::Geometry;
use wgpu::util::DeviceExt;

/// One uploaded geometry, drawn with a single indexed call.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Uploads `geometry`. Returns `None` when there is nothing to draw, since
    /// wgpu rejects zero-sized vertex buffers.
    pub fn create_mesh(&self, label: &str, geometry: &Geometry) -> Option<MeshBuffer> {
        if geometry.is_empty() || geometry.indices.is_empty() {
            return None;
        }
        let vertex_buffer = self.create_buffer(
            &format!("{label}-vertices"),
            bytemuck::cast_slice(&geometry.vertices),
            wgpu::BufferUsages::VERTEX,
        );
        let index_buffer = self.create_buffer(
            &format!("{label}-indices"),
            bytemuck::cast_slice(&geometry.indices),
            wgpu::BufferUsages::INDEX,
        );
        Some(MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        })
    }

    /// A uniform buffer initialised with `value` and writable afterwards.
    pub fn create_uniform<T: bytemuck::Pod>(&self, label: &str, value: &T) -> wgpu::Buffer {
        self.create_buffer(label, bytemuck::bytes_of(value), wgpu::BufferUsages::UNIFORM)
    }

    fn create_buffer(
        &self,
        label: &str,
        contents: &[u8],
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            })
    }
}
