use std::sync::Arc;

use umbra_core::FramePacer;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::window::Window;

use crate::{error::RenderError, texture::TextureHelper};

pub fn required_features() -> wgpu::Features {
    wgpu::Features::EXPERIMENTAL_RAY_QUERY | wgpu::Features::PUSH_CONSTANTS
}

pub struct RenderContext {
    pub device: Device,
    pub queue: Queue,
    pub surface: Surface<'static>,
    pub config: SurfaceConfiguration,
    pub depth_texture: wgpu::TextureView,
    pub pacer: FramePacer,
}

pub fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| format.is_srgb())
        .or_else(|| formats.first().copied())
}

impl RenderContext {
    pub fn new(window: Arc<Window>, frame_count: usize, vsync: bool) -> Result<Self, RenderError> {
        log::info!("initializing GPU ({frame_count} frames in flight)");

        // 1. Create the Instance (Vulkan/Metal/DX12)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        // 2. Create Surface (The canvas on the window)
        let surface = instance.create_surface(window.clone())?;

        // 3. Request Adapter (Physical GPU)
        // We use 'pollster' to block on this async function
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;

        let info = adapter.get_info();
        log::info!("using adapter '{}' ({:?})", info.name, info.backend);

        let required_features = required_features();
        if !adapter.features().contains(required_features) {
            return Err(RenderError::MissingFeatures {
                adapter: info.name,
                missing: required_features.difference(adapter.features()),
            });
        }

        // 4. Request Device (Logical GPU connection)
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Umbra Device"),
            required_features,
            required_limits: wgpu::Limits {
                max_push_constant_size: crate::mesh::DrawConstants::SIZE,
                ..wgpu::Limits::default().using_minimum_supported_acceleration_structure_values()
            },
            // SAFETY: ray queries are the only experimental feature requested,
            // and the adapter reported support for it above.
            experimental_features: unsafe { wgpu::ExperimentalFeatures::enabled() },
            ..Default::default()
        }))?;

        // 5. Configure the Surface
        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&caps.formats).ok_or(RenderError::NoSurfaceFormat)?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            // frames the CPU may queue behind the one on screen
            desired_maximum_frame_latency: frame_count.saturating_sub(1).max(1) as u32,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or_default(),
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth_texture = TextureHelper::create_depth_texture(&device, &config, "Depth Texture");

        log::info!(
            "surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        Ok(Self {
            device,
            queue,
            surface,
            config,
            depth_texture,
            pacer: FramePacer::new(frame_count),
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        // Minimized windows report zero sizes, keep the last valid surface.
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureHelper::create_depth_texture(&self.device, &self.config, "Depth Texture");
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

pub struct FrameTarget {
    pub texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl FrameTarget {
    pub fn present(self) {
        self.texture.present();
    }
}

impl RenderContext {
    /// Acquires the next swapchain image. `None` means skip this frame: the
    /// surface was reconfigured or the acquire timed out.
    pub fn acquire_frame(&mut self) -> Option<FrameTarget> {
        match self.surface.get_current_texture() {
            Ok(texture) => {
                let view = texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                Some(FrameTarget { texture, view })
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.reconfigure();
                None
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("timed out acquiring the next swapchain image");
                None
            }
            Err(err) => {
                log::error!("failed to acquire the next swapchain image: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_formats_are_preferred() {
        let formats = [
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ];
        assert_eq!(
            pick_surface_format(&formats),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn falls_back_to_the_first_format() {
        let formats = [wgpu::TextureFormat::Rgba16Float];
        assert_eq!(
            pick_surface_format(&formats),
            Some(wgpu::TextureFormat::Rgba16Float)
        );
        assert_eq!(pick_surface_format(&[]), None);
    }

    #[test]
    fn ray_queries_and_push_constants_are_required() {
        let features = required_features();
        assert!(features.contains(wgpu::Features::EXPERIMENTAL_RAY_QUERY));
        assert!(features.contains(wgpu::Features::PUSH_CONSTANTS));
    }
}
