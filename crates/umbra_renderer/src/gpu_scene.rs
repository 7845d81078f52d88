use glam::Mat4;
use umbra_assets::{MaterialSettings, SceneData};
use umbra_scene::{SceneDraw, SceneGraph};

use crate::{
    bindings::MATERIAL_GROUP,
    material::GpuMaterial,
    mesh::{DrawConstants, GpuGeometry},
    texture::{GpuTexture, TextureHelper},
};

/// Index into the uploaded materials, `None` meaning the default material.
fn resolve_material(material: Option<usize>, material_count: usize) -> Option<usize> {
    material.filter(|&index| index < material_count)
}

/// Draw order grouped by material, so each material is bound once per frame.
/// Draws keep their scene order within a group.
fn draw_order(draws: &[SceneDraw], material_count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..draws.len()).collect();
    order.sort_by_key(|&i| resolve_material(draws[i].material, material_count));
    order
}

pub struct GpuScene {
    pub geometry: Vec<Vec<GpuGeometry>>,
    materials: Vec<GpuMaterial>,
    default_material: GpuMaterial,
    draws: Vec<SceneDraw>,
    order: Vec<usize>,
    normalization: Mat4,
}

impl GpuScene {
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material_layout: &wgpu::BindGroupLayout,
        scene: &SceneData,
        graph: &SceneGraph,
    ) -> Self {
        let geometry: Vec<Vec<GpuGeometry>> = scene
            .meshes
            .iter()
            .map(|mesh| {
                mesh.primitives
                    .iter()
                    .enumerate()
                    .map(|(i, primitive)| {
                        GpuGeometry::new(device, primitive, &format!("{} [{i}]", mesh.name))
                    })
                    .collect()
            })
            .collect();

        let textures: Vec<Option<GpuTexture>> = scene
            .textures
            .iter()
            .map(|texture| {
                if !texture.is_consistent() {
                    log::warn!("texture '{}' has a bad pixel buffer, using white", texture.name);
                    return None;
                }
                Some(GpuTexture::from_image(device, queue, texture, Some(&texture.name)))
            })
            .collect();
        let white = GpuTexture::white_pixel(device, queue);
        let sampler = TextureHelper::create_point_sampler(device);

        let materials = scene
            .materials
            .iter()
            .map(|material| {
                let texture = material
                    .base_color_texture
                    .and_then(|index| textures.get(index))
                    .and_then(Option::as_ref)
                    .unwrap_or(&white);
                GpuMaterial::new(
                    device,
                    material_layout,
                    &material.settings,
                    texture,
                    &sampler,
                    &material.name,
                )
            })
            .collect::<Vec<_>>();

        let default_material = GpuMaterial::new(
            device,
            material_layout,
            &MaterialSettings::default(),
            &white,
            &sampler,
            "Default Material",
        );

        let draws = graph.draws().to_vec();
        let order = draw_order(&draws, materials.len());

        log::info!(
            "uploaded {} primitives, {} materials, {} textures, {} draws",
            scene.primitive_count(),
            materials.len(),
            textures.iter().flatten().count(),
            draws.len()
        );

        Self {
            geometry,
            materials,
            default_material,
            draws,
            order,
            normalization: graph.normalization_transform(),
        }
    }

    pub fn draws(&self) -> &[SceneDraw] {
        &self.draws
    }

    /// Records all draws. `camera` is the examiner transform; the scene
    /// normalization is applied underneath it.
    pub fn record(&self, render_pass: &mut wgpu::RenderPass<'_>, camera: Mat4) {
        let view = camera * self.normalization;
        let mut bound_material = None;

        for &draw_index in &self.order {
            let draw = &self.draws[draw_index];
            let Some(gpu) = self
                .geometry
                .get(draw.mesh)
                .and_then(|primitives| primitives.get(draw.primitive))
            else {
                continue;
            };

            let material = resolve_material(draw.material, self.materials.len());
            if bound_material != Some(material) {
                let gpu_material = match material {
                    Some(index) => &self.materials[index],
                    None => &self.default_material,
                };
                render_pass.set_bind_group(MATERIAL_GROUP, &gpu_material.bind_group, &[]);
                bound_material = Some(material);
            }

            render_pass.set_push_constants(
                wgpu::ShaderStages::VERTEX,
                0,
                bytemuck::bytes_of(&DrawConstants::new(view, draw.world)),
            );
            render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            render_pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..gpu.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(material: Option<usize>) -> SceneDraw {
        SceneDraw {
            mesh: 0,
            primitive: 0,
            material,
            world: Mat4::IDENTITY,
        }
    }

    #[test]
    fn unknown_materials_fall_back_to_the_default() {
        assert_eq!(resolve_material(Some(1), 2), Some(1));
        assert_eq!(resolve_material(Some(2), 2), None);
        assert_eq!(resolve_material(None, 2), None);
    }

    #[test]
    fn draws_are_grouped_by_material_and_stable() {
        let draws = [
            draw(Some(1)),
            draw(None),
            draw(Some(0)),
            draw(Some(1)),
            draw(Some(7)),
        ];
        // default material first (None < Some), then 0, then 1
        assert_eq!(draw_order(&draws, 2), vec![1, 4, 2, 0, 3]);
    }
}
