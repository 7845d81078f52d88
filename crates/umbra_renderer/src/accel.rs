//! Ray tracing acceleration structures for the shadow queries.
//!
//! Every mesh primitive gets one bottom-level structure, every scene draw one
//! top-level instance. The structures are built once after upload; the scene
//! is static for the whole session.

use glam::Mat4;
use umbra_scene::SceneDraw;

use crate::mesh::{GpuGeometry, Vertex};

/// Row-major 3x4 affine transform, the layout TLAS instances expect.
pub fn tlas_transform(world: Mat4) -> [f32; 12] {
    let rows = world.transpose().to_cols_array();
    let mut out = [0.0; 12];
    out.copy_from_slice(&rows[..12]);
    out
}

fn geometry_size(geometry: &GpuGeometry) -> wgpu::BlasTriangleGeometrySizeDescriptor {
    wgpu::BlasTriangleGeometrySizeDescriptor {
        vertex_format: wgpu::VertexFormat::Float32x3,
        vertex_count: geometry.vertex_count,
        index_format: Some(wgpu::IndexFormat::Uint32),
        index_count: Some(geometry.index_count),
        flags: wgpu::AccelerationStructureGeometryFlags::OPAQUE,
    }
}

pub struct SceneAccelerationStructure {
    pub tlas: wgpu::Tlas,
    // Instances reference these, keep them alive with the TLAS.
    _blases: Vec<wgpu::Blas>,
}

impl SceneAccelerationStructure {
    /// `geometry[mesh][primitive]` holds the uploaded buffers, `draws` the
    /// world-space instances referencing them.
    pub fn build(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        geometry: &[Vec<GpuGeometry>],
        draws: &[SceneDraw],
    ) -> Self {
        let mut blas_offsets = Vec::with_capacity(geometry.len());
        let mut sizes = Vec::new();
        for primitives in geometry {
            blas_offsets.push(sizes.len());
            sizes.extend(primitives.iter().map(geometry_size));
        }

        let blases: Vec<wgpu::Blas> = sizes
            .iter()
            .enumerate()
            .map(|(index, size)| {
                device.create_blas(
                    &wgpu::CreateBlasDescriptor {
                        label: Some(&format!("Primitive BLAS [{index}]")),
                        flags: wgpu::AccelerationStructureFlags::PREFER_FAST_TRACE,
                        update_mode: wgpu::AccelerationStructureUpdateMode::Build,
                    },
                    wgpu::BlasGeometrySizeDescriptors::Triangles {
                        descriptors: vec![size.clone()],
                    },
                )
            })
            .collect();

        // An empty TLAS is still bindable, it just never reports a hit.
        let mut tlas = device.create_tlas(&wgpu::CreateTlasDescriptor {
            label: Some("Scene TLAS"),
            max_instances: draws.len().max(1) as u32,
            flags: wgpu::AccelerationStructureFlags::PREFER_FAST_TRACE,
            update_mode: wgpu::AccelerationStructureUpdateMode::Build,
        });

        for (slot, draw) in draws.iter().enumerate() {
            let blas_index = blas_offsets[draw.mesh] + draw.primitive;
            tlas[slot] = Some(wgpu::TlasInstance::new(
                &blases[blas_index],
                tlas_transform(draw.world),
                slot as u32,
                0xff,
            ));
        }

        let flat_geometry = geometry.iter().flatten();
        let triangle_geometries: Vec<Vec<wgpu::BlasTriangleGeometry<'_>>> = flat_geometry
            .zip(&sizes)
            .map(|(gpu, size)| {
                vec![wgpu::BlasTriangleGeometry {
                    size,
                    vertex_buffer: &gpu.vertex_buffer,
                    first_vertex: 0,
                    vertex_stride: Vertex::STRIDE,
                    index_buffer: Some(&gpu.index_buffer),
                    first_index: Some(0),
                    transform_buffer: None,
                    transform_buffer_offset: None,
                }]
            })
            .collect();

        let entries: Vec<wgpu::BlasBuildEntry<'_>> = blases
            .iter()
            .zip(triangle_geometries)
            .map(|(blas, triangles)| wgpu::BlasBuildEntry {
                blas,
                geometry: wgpu::BlasGeometries::TriangleGeometries(triangles),
            })
            .collect();

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Acceleration Structure Build"),
        });
        encoder.build_acceleration_structures(entries.iter(), std::iter::once(&tlas));
        queue.submit(std::iter::once(encoder.finish()));

        log::info!(
            "built {} BLAS and a TLAS with {} instances",
            blases.len(),
            draws.len()
        );

        Self {
            tlas,
            _blases: blases,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;

    #[test]
    fn tlas_transform_is_row_major() {
        let world = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            tlas_transform(world),
            [1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 2.0, 0.0, 0.0, 1.0, 3.0]
        );
    }

    #[test]
    fn tlas_transform_maps_points_like_the_matrix() {
        let world = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 1.0, 0.5),
            Quat::from_rotation_y(0.7),
            Vec3::new(-4.0, 0.5, 9.0),
        );
        let m = tlas_transform(world);
        let p = Vec3::new(0.3, -1.2, 2.0);

        let expected = world.transform_point3(p);
        for row in 0..3 {
            let r = &m[row * 4..row * 4 + 4];
            let value = r[0] * p.x + r[1] * p.y + r[2] * p.z + r[3];
            assert!((value - expected[row]).abs() < 1e-5);
        }
    }
}
