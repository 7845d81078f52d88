use glam::Mat4;

// The per-frame scene data we send to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub projection: [[f32; 4]; 4],
    pub shadow_bias: f32,
    pub _padding: [f32; 3], // uniform blocks are 16-byte aligned
}

impl Default for SceneUniform {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

impl SceneUniform {
    pub fn new(projection: Mat4, shadow_bias: f32) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            shadow_bias,
            _padding: [0.0; 3],
        }
    }
}
