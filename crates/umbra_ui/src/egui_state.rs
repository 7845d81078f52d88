use egui_wgpu::{RendererOptions, ScreenDescriptor};
use umbra_renderer::RenderContext;
use winit::{event::WindowEvent, window::Window};

pub struct EguiState {
    pub context: egui::Context,
    pub state: egui_winit::State,
    pub renderer: egui_wgpu::Renderer,
}

impl EguiState {
    pub fn new(render_context: &RenderContext, window: &Window) -> Self {
        let context = egui::Context::default();

        let viewport_id = context.viewport_id();
        let state = egui_winit::State::new(
            context.clone(),
            viewport_id,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        // Create the WGPU Renderer (Handles drawing triangles)
        let renderer = egui_wgpu::Renderer::new(
            &render_context.device,
            render_context.config.format,
            RendererOptions::PREDICTABLE,
        );

        Self {
            context,
            state,
            renderer,
        }
    }

    pub fn handle_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    pub fn wants_pointer_input(&self) -> bool {
        self.context.wants_pointer_input()
    }

    pub fn begin_frame(&mut self, window: &Window) -> egui::Context {
        let raw_input = self.state.take_egui_input(window);
        self.context.begin_pass(raw_input);
        self.context.clone()
    }

    /// Ends the egui pass and records it on top of `view`.
    ///
    /// The returned command buffers come from egui paint callbacks and must be
    /// submitted before `encoder`.
    pub fn end_frame(
        &mut self,
        window: &Window,
        render_context: &RenderContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) -> Vec<wgpu::CommandBuffer> {
        let full_output = self.context.end_pass();
        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = render_context.size();
        let screen_descriptor = ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(&render_context.device, &render_context.queue, *id, delta);
        }

        let callback_buffers = self.renderer.update_buffers(
            &render_context.device,
            &render_context.queue,
            encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            let mut pass = pass.forget_lifetime();
            self.renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }

        callback_buffers
    }
}
