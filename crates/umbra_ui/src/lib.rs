//! Immediate-mode overlay: the egui integration and the "Controls" window
//! editing the background, the shadow bias and the point lights.

mod controls;
mod egui_state;

pub use controls::{ControlsState, ControlsView, draw_controls};
pub use egui_state::EguiState;
