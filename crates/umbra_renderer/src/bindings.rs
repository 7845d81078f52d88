//! How shader-visible resources map to bind slots.
//!
//! | group | binding | resource                          | stages          |
//! |-------|---------|-----------------------------------|-----------------|
//! | 0     | 0       | [`SceneUniform`] (per frame)      | vertex+fragment |
//! | 0     | 1       | [`PointLightUniform`] (per frame) | fragment        |
//! | 0     | 2       | scene TLAS                        | fragment        |
//! | 1     | 0       | material uniform                  | fragment        |
//! | 1     | 1       | base colour texture               | fragment        |
//! | 1     | 2       | point / wrap sampler              | fragment        |
//!
//! plus [`DrawConstants`] as vertex push constants.

use crate::{
    frame_ring::FrameRing,
    light::PointLightUniform,
    mesh::DrawConstants,
    scene_uniform::SceneUniform,
};

pub const FRAME_GROUP: u32 = 0;
pub const MATERIAL_GROUP: u32 = 1;

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn frame_layout_entries() -> [wgpu::BindGroupLayoutEntry; 3] {
    [
        // --- BINDING 0: projection + shadow bias ---
        uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
        // --- BINDING 1: point lights ---
        uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
        // --- BINDING 2: shadow ray acceleration structure ---
        wgpu::BindGroupLayoutEntry {
            binding: 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::AccelerationStructure {
                vertex_return: false,
            },
            count: None,
        },
    ]
}

pub fn material_layout_entries() -> [wgpu::BindGroupLayoutEntry; 3] {
    [
        uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
        wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
    ]
}

pub fn push_constant_ranges() -> [wgpu::PushConstantRange; 1] {
    [wgpu::PushConstantRange {
        stages: wgpu::ShaderStages::VERTEX,
        range: 0..DrawConstants::SIZE,
    }]
}

/// The static part of the binding model, built once at startup.
pub struct BindingLayout {
    pub frame: wgpu::BindGroupLayout,
    pub material: wgpu::BindGroupLayout,
    pub pipeline_layout: wgpu::PipelineLayout,
}

impl BindingLayout {
    pub fn new(device: &wgpu::Device) -> Self {
        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &frame_layout_entries(),
        });

        let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Bind Group Layout"),
            entries: &material_layout_entries(),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shadowed Mesh Pipeline Layout"),
            bind_group_layouts: &[&frame, &material],
            push_constant_ranges: &push_constant_ranges(),
        });

        Self {
            frame,
            material,
            pipeline_layout,
        }
    }
}

/// One frame bind group per ring slot, so binding frame `i` only ever exposes
/// the buffers of slot `i`.
pub struct FrameBindings {
    groups: Vec<wgpu::BindGroup>,
}

impl FrameBindings {
    pub fn new(
        device: &wgpu::Device,
        layout: &BindingLayout,
        scene: &FrameRing<SceneUniform>,
        lights: &FrameRing<PointLightUniform>,
        tlas: &wgpu::Tlas,
    ) -> Self {
        assert_eq!(
            scene.len(),
            lights.len(),
            "scene and light rings must have the same number of slots"
        );

        let groups = scene
            .storages()
            .zip(lights.storages())
            .enumerate()
            .map(|(index, (scene_buffer, light_buffer))| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("Frame Bind Group [{index}]")),
                    layout: &layout.frame,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: scene_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: light_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::AccelerationStructure(tlas),
                        },
                    ],
                })
            })
            .collect();

        Self { groups }
    }

    pub fn get(&self, frame_index: usize) -> &wgpu::BindGroup {
        &self.groups[frame_index]
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn assert_unique_bindings(entries: &[wgpu::BindGroupLayoutEntry]) {
        let bindings: HashSet<u32> = entries.iter().map(|e| e.binding).collect();
        assert_eq!(bindings.len(), entries.len());
    }

    #[test]
    fn frame_group_exposes_uniforms_and_tlas() {
        let entries = frame_layout_entries();
        assert_unique_bindings(&entries);

        assert!(entries[0].visibility.contains(wgpu::ShaderStages::VERTEX));
        assert!(entries[1].visibility.contains(wgpu::ShaderStages::FRAGMENT));
        assert!(matches!(
            entries[2].ty,
            wgpu::BindingType::AccelerationStructure { .. }
        ));
        assert_eq!(entries[2].visibility, wgpu::ShaderStages::FRAGMENT);
    }

    #[test]
    fn material_group_is_fragment_only() {
        let entries = material_layout_entries();
        assert_unique_bindings(&entries);
        assert!(
            entries
                .iter()
                .all(|e| e.visibility == wgpu::ShaderStages::FRAGMENT)
        );
    }

    #[test]
    fn push_constants_cover_the_draw_constants() {
        let [range] = push_constant_ranges();
        assert_eq!(range.range, 0..128);
        assert_eq!(range.stages, wgpu::ShaderStages::VERTEX);
    }
}
