use umbra_assets::MaterialSettings;
use wgpu::util::DeviceExt;

use crate::texture::GpuTexture;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuMaterialUniform {
    pub base_color: [f32; 4], // 16 bytes
    pub roughness: f32,       // 4 bytes
    pub metallic: f32,        // 4 bytes
    pub _padding: [f32; 2],   // 8 bytes (Total: 32 bytes, aligned to 16)
}

impl From<&MaterialSettings> for GpuMaterialUniform {
    fn from(s: &MaterialSettings) -> Self {
        Self {
            base_color: s.base_color,
            roughness: s.roughness,
            metallic: s.metallic,
            _padding: [0.0; 2],
        }
    }
}

/// Bind group 1: material constants, base colour texture and sampler.
pub struct GpuMaterial {
    pub bind_group: wgpu::BindGroup,
    _uniform_buffer: wgpu::Buffer,
}

impl GpuMaterial {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        settings: &MaterialSettings,
        base_color: &GpuTexture,
        sampler: &wgpu::Sampler,
        label: &str,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Uniforms")),
            contents: bytemuck::bytes_of(&GpuMaterialUniform::from(settings)),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Bind Group")),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&base_color.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            bind_group,
            _uniform_buffer: uniform_buffer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_32_bytes() {
        assert_eq!(std::mem::size_of::<GpuMaterialUniform>(), 32);
    }

    #[test]
    fn copies_the_factors() {
        let settings = MaterialSettings {
            base_color: [0.5, 0.25, 1.0, 1.0],
            roughness: 0.8,
            metallic: 0.1,
        };
        let uniform = GpuMaterialUniform::from(&settings);
        assert_eq!(uniform.base_color, settings.base_color);
        assert_eq!(uniform.roughness, 0.8);
        assert_eq!(uniform.metallic, 0.1);
    }
}
