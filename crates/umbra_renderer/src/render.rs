use glam::Mat4;
use umbra_assets::SceneData;
use umbra_scene::SceneGraph;

use crate::{
    accel::SceneAccelerationStructure,
    bindings::{BindingLayout, FrameBindings},
    context::RenderContext,
    frame_ring::FrameRing,
    gpu_scene::GpuScene,
    light::PointLightUniform,
    programs::{GpuProgram, GpuProgramRenderContext, ShadowedMeshProgram},
    scene_uniform::SceneUniform,
};

pub fn clear_color(rgb: [f32; 3]) -> wgpu::Color {
    wgpu::Color {
        r: rgb[0] as f64,
        g: rgb[1] as f64,
        b: rgb[2] as f64,
        a: 1.0,
    }
}

pub struct SceneRenderer {
    program: ShadowedMeshProgram,
    scene_ring: FrameRing<SceneUniform>,
    light_ring: FrameRing<PointLightUniform>,
    frame_bindings: FrameBindings,
    gpu_scene: GpuScene,
    _accel: SceneAccelerationStructure,
    _layout: BindingLayout,
}

impl SceneRenderer {
    pub fn new(context: &RenderContext, scene: &SceneData, graph: &SceneGraph) -> Self {
        let device = &context.device;
        let frame_count = context.pacer.frame_count();

        let layout = BindingLayout::new(device);
        let program = ShadowedMeshProgram::new(
            &GpuProgramRenderContext {
                device,
                format: context.config.format,
            },
            &layout,
        );

        let gpu_scene = GpuScene::upload(device, &context.queue, &layout.material, scene, graph);
        let accel = SceneAccelerationStructure::build(
            device,
            &context.queue,
            &gpu_scene.geometry,
            gpu_scene.draws(),
        );

        let scene_ring: FrameRing<SceneUniform> = FrameRing::new(device, frame_count, "Scene Uniform");
        let light_ring: FrameRing<PointLightUniform> =
            FrameRing::new(device, frame_count, "Point Light Uniform");
        let frame_bindings =
            FrameBindings::new(device, &layout, &scene_ring, &light_ring, &accel.tlas);

        log::info!("scene pass ready ({} frame slots)", frame_bindings.len());

        Self {
            program,
            scene_ring,
            light_ring,
            frame_bindings,
            gpu_scene,
            _accel: accel,
            _layout: layout,
        }
    }

    pub fn draw_count(&self) -> usize {
        self.gpu_scene.draws().len()
    }

    /// Writes this frame's constants into slot `frame_index` of both rings.
    pub fn refresh_buffers(
        &mut self,
        queue: &wgpu::Queue,
        frame_index: usize,
        scene: SceneUniform,
        lights: PointLightUniform,
    ) {
        self.scene_ring.update_for_frame(queue, frame_index, scene);
        self.light_ring.update_for_frame(queue, frame_index, lights);
    }

    pub fn begin_pass<'e>(
        encoder: &'e mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        background: [f32; 3],
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color(background)),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0), // Clear to "Far" (1.0)
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        })
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>, frame_index: usize) {
        self.program
            .bind(render_pass, self.frame_bindings.get(frame_index));
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, camera: Mat4) {
        self.program.draw(render_pass, &self.gpu_scene, camera);
    }
}
