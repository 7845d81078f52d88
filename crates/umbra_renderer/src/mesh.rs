use std::mem;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use umbra_assets::PrimitiveData;
use wgpu::util::DeviceExt;

// #[repr(C)] ensures the compiler doesn't reorder fields.
// Pod (Plain Old Data) and Zeroable allow us to cast this struct to raw bytes safely.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3], // X, Y, Z
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl From<&umbra_assets::Vertex> for Vertex {
    fn from(v: &umbra_assets::Vertex) -> Self {
        Self {
            position: v.position,
            normal: v.normal,
            uv: v.uv,
        }
    }
}

impl Vertex {
    pub const STRIDE: wgpu::BufferAddress = mem::size_of::<Vertex>() as wgpu::BufferAddress;

    // position, normal, uv at @location(0..3)
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-draw push constants, 32 floats.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawConstants {
    /// camera * normalization * node world
    pub model_view: [[f32; 4]; 4],
    /// node world, the space the TLAS and the lights live in
    pub model: [[f32; 4]; 4],
}

impl DrawConstants {
    pub const SIZE: u32 = mem::size_of::<DrawConstants>() as u32;

    pub fn new(view: Mat4, world: Mat4) -> Self {
        Self {
            model_view: (view * world).to_cols_array_2d(),
            model: world.to_cols_array_2d(),
        }
    }
}

/// Vertex and index buffers of one primitive. Both are also readable by the
/// acceleration structure build.
pub struct GpuGeometry {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl GpuGeometry {
    pub fn new(device: &wgpu::Device, data: &PrimitiveData, label: &str) -> Self {
        let vertices: Vec<Vertex> = data.vertices.iter().map(Vertex::from).collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::BLAS_INPUT,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::BLAS_INPUT,
        });

        Self {
            vertex_buffer,
            index_buffer,
            vertex_count: vertices.len() as u32,
            index_count: data.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;

    #[test]
    fn draw_constants_fill_the_push_constant_block() {
        assert_eq!(DrawConstants::SIZE, 128);
    }

    #[test]
    fn model_view_composes_view_after_world() {
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0));
        let world = Mat4::from_scale(Vec3::splat(2.0));
        let constants = DrawConstants::new(view, world);

        let model_view = Mat4::from_cols_array_2d(&constants.model_view);
        let p = model_view * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(p, Vec4::new(2.0, 0.0, 5.0, 1.0));
        assert_eq!(Mat4::from_cols_array_2d(&constants.model), world);
    }

    #[test]
    fn vertex_layout_matches_the_struct() {
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 32);
        assert_eq!(desc.attributes.len(), 3);
        assert_eq!(desc.attributes[2].offset, 24);
    }
}
