use std::collections::HashMap;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};

use crate::logical::ButtonPhase;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MouseButtonId {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl From<MouseButton> for MouseButtonId {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => MouseButtonId::Left,
            MouseButton::Right => MouseButtonId::Right,
            MouseButton::Middle => MouseButtonId::Middle,
            MouseButton::Back => MouseButtonId::Back,
            MouseButton::Forward => MouseButtonId::Forward,
            MouseButton::Other(id) => MouseButtonId::Other(id),
        }
    }
}

#[derive(Default, Debug)]
pub struct PointerState {
    buttons: HashMap<MouseButtonId, ButtonPhase>,
    cursor: Vec2,
    viewport: (u32, u32),
    ctrl: bool,
}

impl PointerState {
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.set_cursor(position.x as f32, position.y as f32);
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                match state {
                    ElementState::Pressed => self.press((*button).into()),
                    ElementState::Released => self.release((*button).into()),
                }
                true
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.set_ctrl(modifiers.state().control_key());
                false
            }
            WindowEvent::Resized(size) => {
                self.set_viewport(size.width, size.height);
                false
            }
            _ => false,
        }
    }

    pub fn press(&mut self, button: MouseButtonId) {
        let phase = self.buttons.entry(button).or_default();
        if !phase.contains(ButtonPhase::HELD) {
            *phase |= ButtonPhase::PRESSED | ButtonPhase::HELD;
        }
    }

    pub fn release(&mut self, button: MouseButtonId) {
        let phase = self.buttons.entry(button).or_default();
        if phase.contains(ButtonPhase::HELD) {
            phase.remove(ButtonPhase::HELD);
            phase.insert(ButtonPhase::RELEASED);
        }
    }

    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.cursor = Vec2::new(x, y);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    pub fn set_ctrl(&mut self, ctrl: bool) {
        self.ctrl = ctrl;
    }

    pub fn phase(&self, button: MouseButtonId) -> ButtonPhase {
        self.buttons.get(&button).copied().unwrap_or_default()
    }

    pub fn ctrl(&self) -> bool {
        self.ctrl
    }

    /// Cursor position in `[-1, 1]`, `+y` up, relative to the viewport.
    pub fn normalized_position(&self) -> Vec2 {
        let (width, height) = self.viewport;
        let size = Vec2::new(width.max(1) as f32, height.max(1) as f32);
        let uv = self.cursor / size;
        Vec2::new(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0)
    }

    /// Clears the per-frame edges; held buttons stay held.
    pub fn end_frame(&mut self) {
        for phase in self.buttons.values_mut() {
            *phase &= ButtonPhase::HELD;
        }
    }
}
