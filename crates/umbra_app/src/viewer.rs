use std::sync::Arc;

use umbra_assets::SceneData;
use umbra_core::{ExaminerController, FrameCycle, FramePhase, FrameStats, Projection, Time};
use umbra_input::{PointerState, drive_examiner};
use umbra_renderer::{
    LightList, PointLightUniform, RenderContext, SceneRenderer, SceneUniform,
};
use umbra_scene::SceneGraph;
use umbra_ui::{ControlsState, ControlsView, EguiState, draw_controls};
use umbra_window::{InitError, ViewerHandler};
use winit::{event::WindowEvent, window::Window};

use crate::config::ViewerConfig;

/// Everything a frame is computed from, free of GPU handles.
pub struct ViewerState {
    pub lights: LightList,
    pub controls: ControlsState,
    pub examiner: ExaminerController,
    pub pointer: PointerState,
    pub projection: Projection,
    pub cycle: FrameCycle,
    pub stats: FrameStats,
    pub time: Time,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig) -> Self {
        let lights = LightList::with_startup_lights();
        let controls = ControlsState::new(config.background_color, config.shadow_bias, &lights);

        Self {
            lights,
            controls,
            examiner: ExaminerController::new(config.camera_translation()),
            pointer: PointerState::default(),
            projection: config.projection(),
            cycle: FrameCycle::new(),
            stats: FrameStats::new(),
            time: Time::default(),
        }
    }

    /// Hands this frame's pointer activity to the examiner, unless the UI
    /// wants it. A drag the examiner already owns keeps going even when the
    /// pointer passes over the UI.
    pub fn apply_input(&mut self, ui_wants_pointer: bool) {
        let ui_captures = ui_wants_pointer && !self.examiner.active();
        drive_examiner(&self.pointer, &mut self.examiner, ui_captures);
        self.pointer.end_frame();
        self.cycle.advance(FramePhase::InputApplied);
    }

    pub fn frame_constants(&self, width: u32, height: u32) -> (SceneUniform, PointLightUniform) {
        (
            SceneUniform::new(
                self.projection.matrix(width, height),
                self.controls.shadow_bias,
            ),
            PointLightUniform::from_lights(&self.lights),
        )
    }

    pub fn finish_frame(&mut self, width: u32, height: u32) {
        if self.stats.tick(
            self.time.elapsed_seconds(),
            width,
            height,
            self.lights.len(),
        ) {
            log::debug!(
                "{:.1} fps, {:.2} million rays/s",
                self.stats.fps(),
                self.stats.million_rays_per_second()
            );
        }
        self.cycle.advance(FramePhase::Idle);
    }
}

struct GpuSession {
    context: RenderContext,
    renderer: SceneRenderer,
    egui: EguiState,
}

pub struct Viewer {
    config: ViewerConfig,
    scene: SceneData,
    graph: SceneGraph,
    state: ViewerState,
    gpu: Option<GpuSession>,
}

impl Viewer {
    pub fn new(config: ViewerConfig, scene: SceneData) -> Self {
        let graph = SceneGraph::from_scene_data(&scene);
        log::info!(
            "scene graph: {} draws, bounds {:?}",
            graph.draws().len(),
            graph.aabb()
        );

        Self {
            state: ViewerState::new(&config),
            config,
            scene,
            graph,
            gpu: None,
        }
    }

    fn render_frame(&mut self, window: &Window) {
        let Self { state, gpu, .. } = self;
        let Some(gpu) = gpu else {
            return;
        };

        state.time.update();

        // --- InputApplied ---
        state.apply_input(gpu.egui.wants_pointer_input());

        let Some(target) = gpu.context.acquire_frame() else {
            state.cycle.abort();
            return;
        };

        // UI edits land in this frame's constants.
        let ui = gpu.egui.begin_frame(window);
        draw_controls(
            &ui,
            &mut state.controls,
            &mut state.lights,
            &ControlsView {
                frame_time_ms: state.time.delta_seconds() * 1000.0,
                million_rays_per_second: state.stats.million_rays_per_second(),
                interactable: !state.examiner.active(),
            },
        );

        // --- BuffersRefreshed ---
        let (width, height) = gpu.context.size();
        let frame_index = gpu.context.pacer.frame_index();
        let (scene_uniform, light_uniform) = state.frame_constants(width, height);
        gpu.renderer.refresh_buffers(
            &gpu.context.queue,
            frame_index,
            scene_uniform,
            light_uniform,
        );
        state.cycle.advance(FramePhase::BuffersRefreshed);

        let mut encoder = gpu
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = SceneRenderer::begin_pass(
                &mut encoder,
                &target.view,
                &gpu.context.depth_texture,
                state.controls.background_color,
            );

            // --- ResourcesBound ---
            gpu.renderer.bind(&mut render_pass, frame_index);
            state.cycle.advance(FramePhase::ResourcesBound);

            gpu.renderer
                .draw(&mut render_pass, state.examiner.transformation_matrix());
        }

        let callback_buffers =
            gpu.egui
                .end_frame(window, &gpu.context, &mut encoder, &target.view);

        // --- Submitted ---
        gpu.context.queue.submit(
            callback_buffers
                .into_iter()
                .chain(std::iter::once(encoder.finish())),
        );
        state.cycle.advance(FramePhase::Submitted);

        window.pre_present_notify();
        target.present();
        gpu.context.pacer.advance();

        state.finish_frame(width, height);
    }
}

impl ViewerHandler for Viewer {
    fn init(&mut self, window: Arc<Window>) -> Result<(), InitError> {
        let context = RenderContext::new(window.clone(), self.config.frame_count, self.config.vsync)?;
        let renderer = SceneRenderer::new(&context, &self.scene, &self.graph);
        let egui = EguiState::new(&context, &window);

        let (width, height) = context.size();
        self.state.pointer.set_viewport(width, height);

        log::info!(
            "viewer ready: {} draws, {} lights",
            renderer.draw_count(),
            self.state.lights.len()
        );

        self.gpu = Some(GpuSession {
            context,
            renderer,
            egui,
        });
        Ok(())
    }

    fn window_event(&mut self, window: &Window, event: &WindowEvent) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        gpu.egui.handle_window_event(window, event);
        self.state.pointer.handle_window_event(event);

        if let WindowEvent::Resized(size) = event {
            gpu.context.resize(size.width, size.height);
        }
    }

    fn redraw(&mut self, window: &Window) {
        self.render_frame(window);
    }
}

#[cfg(test)]
mod tests {
    use umbra_core::FramePacer;
    use umbra_input::MouseButtonId;
    use umbra_renderer::FrameRing;

    use super::*;

    fn state() -> ViewerState {
        let mut state = ViewerState::new(&ViewerConfig::default());
        state.pointer.set_viewport(800, 600);
        state
    }

    fn drag(state: &mut ViewerState, ui_wants_pointer: bool) {
        state.pointer.set_cursor(400.0, 300.0);
        state.pointer.press(MouseButtonId::Left);
        state.apply_input(ui_wants_pointer);
        state.cycle.abort();
        state.pointer.set_cursor(600.0, 300.0);
        state.apply_input(ui_wants_pointer);
        state.cycle.abort();
    }

    #[test]
    fn starts_from_the_configured_session() {
        let state = state();
        assert_eq!(state.lights.len(), 2);
        assert_eq!(state.controls.selected_light, Some(0));
        assert_eq!(state.controls.shadow_bias, 0.5);
        assert_eq!(state.cycle.phase(), FramePhase::Idle);
    }

    #[test]
    fn ui_pointer_capture_leaves_the_camera_alone() {
        let mut captured = state();
        let before = captured.examiner.transformation_matrix();
        drag(&mut captured, true);
        assert_eq!(captured.examiner.transformation_matrix(), before);

        let mut free = state();
        drag(&mut free, false);
        assert_ne!(free.examiner.transformation_matrix(), before);
    }

    #[test]
    fn constants_reflect_viewport_bias_and_lights() {
        let mut state = state();
        state.controls.shadow_bias = 2.0;
        state.controls.add_light(&mut state.lights);

        let (scene, lights) = state.frame_constants(800, 600);
        assert_eq!(
            scene.projection,
            Projection::default().matrix(800, 600).to_cols_array_2d()
        );
        assert_eq!(scene.shadow_bias, 2.0);
        assert_eq!(lights.count, 3);
    }

    #[test]
    fn each_frame_writes_only_its_own_slot() {
        let mut state = state();
        let mut pacer = FramePacer::new(3);
        let mut scene_ring = FrameRing::<SceneUniform, ()>::host(3);
        let mut light_ring = FrameRing::<PointLightUniform, ()>::host(3);

        for frame in 0..7usize {
            state.apply_input(false);

            // a different light count per frame makes each write recognizable
            if frame % 2 == 1 {
                state.controls.add_light(&mut state.lights);
            }
            let index = pacer.frame_index();
            assert_eq!(index, frame % 3);

            let untouched: Vec<PointLightUniform> = (0..3)
                .filter(|&slot| slot != index)
                .map(|slot| *light_ring.slot(slot))
                .collect();

            let (scene, lights) = state.frame_constants(640, 480);
            scene_ring.update_for_frame(&(), index, scene);
            light_ring.update_for_frame(&(), index, lights);
            state.cycle.advance(FramePhase::BuffersRefreshed);
            state.cycle.advance(FramePhase::ResourcesBound);
            state.cycle.advance(FramePhase::Submitted);
            pacer.advance();
            state.finish_frame(640, 480);

            assert_eq!(light_ring.slot(index).count as usize, state.lights.len());
            let others: Vec<PointLightUniform> = (0..3)
                .filter(|&slot| slot != index)
                .map(|slot| *light_ring.slot(slot))
                .collect();
            assert_eq!(others, untouched);
        }

        assert_eq!(state.cycle.completed_frames(), 7);
        assert_eq!(state.cycle.phase(), FramePhase::Idle);
    }
}
