use wgpu::util::DeviceExt;

use crate::math::GeometryBuffer;

pub const POSITION_STRIDE: wgpu::BufferAddress = 3 * 4;
pub const TEX_COORD_STRIDE: wgpu::BufferAddress = 2 * 4;

pub struct GpuMesh {
    position_buffer: wgpu::Buffer,
    tex_coord_buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl GpuMesh {
    pub fn from_geometry(device: &wgpu::Device, label: &str, geometry: &GeometryBuffer) -> Self {
        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Position Buffer")),
            contents: bytemuck::cast_slice(&geometry.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let tex_coord_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} TexCoord Buffer")),
            contents: bytemuck::cast_slice(&geometry.tex_coords),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            position_buffer,
            tex_coord_buffer,
            vertex_count: geometry.vertex_count() as u32,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.vertex_count == 0 {
            return;
        }
        render_pass.set_vertex_buffer(0, self.position_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.tex_coord_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }
}

pub fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: POSITION_STRIDE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

pub fn tex_coord_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: TEX_COORD_STRIDE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x2,
        }],
    }
}
