use thiserror::Error;

/// Failures while bringing up the GPU. All of them end the session.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create a surface for the window")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    #[error("adapter '{adapter}' lacks required features: {missing:?}")]
    MissingFeatures {
        adapter: String,
        missing: wgpu::Features,
    },
    #[error("failed to open the GPU device")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported texture format")]
    NoSurfaceFormat,
}
