use glam::Mat4;
use wgpu::RenderPipeline;

use crate::{
    bindings::{BindingLayout, FRAME_GROUP},
    gpu_scene::GpuScene,
    mesh::Vertex,
    programs::{GpuProgram, GpuProgramRenderContext},
    texture::TextureHelper,
};

/// Rasterizes the scene and shades every fragment against the point lights,
/// casting one shadow ray per light through the TLAS.
pub struct ShadowedMeshProgram {
    pipeline: RenderPipeline,
}

impl ShadowedMeshProgram {
    /// Sets the pipeline and the frame bind group of the current slot.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>, frame_bind_group: &wgpu::BindGroup) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(FRAME_GROUP, frame_bind_group, &[]);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, scene: &GpuScene, camera: Mat4) {
        scene.record(render_pass, camera);
    }
}

impl GpuProgram for ShadowedMeshProgram {
    type InitData = BindingLayout;

    fn new(ctx: &GpuProgramRenderContext, layout: &Self::InitData) -> Self {
        let shader = ctx
            .device
            .create_shader_module(wgpu::include_wgsl!("shadowed_mesh.wgsl"));

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                cache: None,
                label: Some("Shadowed Mesh Pipeline"),
                layout: Some(&layout.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::desc()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: TextureHelper::DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less, // Closer pixels win
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            });

        Self { pipeline }
    }
}
