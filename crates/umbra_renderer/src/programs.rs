pub mod shadowed_mesh_program;

pub use shadowed_mesh_program::ShadowedMeshProgram;

/// Holds common WGPU references to simplify function signatures.
pub struct GpuProgramRenderContext<'a> {
    pub device: &'a wgpu::Device,
    pub format: wgpu::TextureFormat, // The output format (swapchain)
}

pub trait GpuProgram {
    /// Data required to initialize the pipeline (e.g., global layouts)
    type InitData;

    /// Compiles shaders and creates the pipeline.
    fn new(ctx: &GpuProgramRenderContext, init_data: &Self::InitData) -> Self;
}
