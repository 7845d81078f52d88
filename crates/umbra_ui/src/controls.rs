use std::ops::RangeInclusive;

use glam::Vec3;
use umbra_renderer::{LightList, MAX_POINT_LIGHTS, PointLight, selection_after_remove};

pub const SHADOW_BIAS_RANGE: RangeInclusive<f32> = 0.0..=5.0;
const POSITION_RANGE: RangeInclusive<f32> = -100.0..=100.0;
const INTENSITY_RANGE: RangeInclusive<f32> = 0.0..=100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ControlsState {
    pub background_color: [f32; 3],
    pub shadow_bias: f32,
    pub selected_light: Option<usize>,
    /// Set by a rejected "add", cleared by the next successful list change.
    pub capacity_reached: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ControlsView {
    pub frame_time_ms: f32,
    pub million_rays_per_second: f32,
    /// `false` while the examiner owns the pointer.
    pub interactable: bool,
}

impl ControlsState {
    pub fn new(background_color: [f32; 3], shadow_bias: f32, lights: &LightList) -> Self {
        Self {
            background_color,
            shadow_bias: shadow_bias.clamp(*SHADOW_BIAS_RANGE.start(), *SHADOW_BIAS_RANGE.end()),
            selected_light: (!lights.is_empty()).then_some(0),
            capacity_reached: false,
        }
    }

    /// Appends a default light and selects it. Returns `false` if the list
    /// was already full.
    pub fn add_light(&mut self, lights: &mut LightList) -> bool {
        match lights.add(PointLight::default()) {
            Ok(index) => {
                log::debug!("added light {index}");
                self.selected_light = Some(index);
                self.capacity_reached = false;
                true
            }
            Err(err) => {
                log::warn!("cannot add light: {err}");
                self.capacity_reached = true;
                false
            }
        }
    }

    pub fn remove_selected_light(&mut self, lights: &mut LightList) -> Option<PointLight> {
        let index = self.selected_light?;
        match lights.remove(index) {
            Ok(light) => {
                log::debug!("removed light {index}");
                self.selected_light = selection_after_remove(Some(index), index, lights.len());
                self.capacity_reached = false;
                Some(light)
            }
            Err(err) => {
                log::warn!("cannot remove light: {err}");
                self.selected_light = None;
                None
            }
        }
    }

    pub fn selected_index(&self, lights: &LightList) -> Option<usize> {
        self.selected_light.filter(|&index| index < lights.len())
    }
}

fn light_editor(ui: &mut egui::Ui, light: &mut PointLight) {
    ui.horizontal(|ui| {
        for axis in 0..3 {
            ui.add(
                egui::DragValue::new(&mut light.position[axis])
                    .speed(0.5)
                    .range(POSITION_RANGE),
            );
        }
        ui.label("Position");
    });

    ui.add(egui::Slider::new(&mut light.intensity, INTENSITY_RANGE).text("Intensity"));

    let mut color = light.color.to_array();
    ui.horizontal(|ui| {
        if ui.color_edit_button_rgb(&mut color).changed() {
            light.color = Vec3::from(color);
        }
        ui.label("Color");
    });
}

pub fn draw_controls(
    ctx: &egui::Context,
    state: &mut ControlsState,
    lights: &mut LightList,
    view: &ControlsView,
) {
    egui::Window::new("Controls")
        .interactable(view.interactable)
        .show(ctx, |ui| {
            ui.label(format!("Frametime: {:.3} ms", view.frame_time_ms));
            ui.label(format!(
                "Million Primary Rays/s: {:.3}",
                view.million_rays_per_second
            ));

            ui.horizontal(|ui| {
                ui.color_edit_button_rgb(&mut state.background_color);
                ui.label("Background Color");
            });
            ui.add(egui::Slider::new(&mut state.shadow_bias, SHADOW_BIAS_RANGE).text("Shadow bias"));

            egui::CollapsingHeader::new("Point Lights")
                .default_open(true)
                .show(ui, |ui| {
                    for index in 0..lights.len() {
                        let selected = state.selected_light == Some(index);
                        if ui
                            .selectable_label(selected, format!("Light {}", index + 1))
                            .clicked()
                        {
                            state.selected_light = Some(index);
                        }
                    }
                });

            if ui
                .button(format!("Add Light (max. {MAX_POINT_LIGHTS})"))
                .clicked()
            {
                state.add_light(lights);
            }
            if state.capacity_reached {
                ui.colored_label(egui::Color32::YELLOW, "Maximum number of lights reached");
            }

            if state.selected_index(lights).is_some()
                && ui.button("Remove Selected Light").clicked()
            {
                state.remove_selected_light(lights);
            }

            if let Some(index) = state.selected_index(lights) {
                if let Some(&original) = lights.get(index) {
                    let mut edited = original;
                    light_editor(ui, &mut edited);
                    if edited != original {
                        // index was just validated
                        let _ = lights.update(index, edited);
                    }
                }
            }
        });
}
