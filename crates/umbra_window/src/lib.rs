//! The winit event loop and the single window the viewer renders into.

use std::sync::Arc;

use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

pub type InitError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("event loop failed")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create the main window")]
    CreateWindow(#[from] winit::error::OsError),
    #[error("viewer initialization failed")]
    Init(#[source] InitError),
}

pub struct MainWindow(pub Arc<Window>);

#[derive(Clone, Debug, PartialEq)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Umbra".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl WindowSettings {
    pub fn attributes(&self) -> WindowAttributes {
        Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.width.max(1), self.height.max(1)))
    }
}

/// What the runner drives. All calls happen on the event loop thread.
pub trait ViewerHandler {
    /// Called once, as soon as the window exists.
    fn init(&mut self, window: Arc<Window>) -> Result<(), InitError>;

    /// Every window event except redraws and close requests.
    fn window_event(&mut self, window: &Window, event: &WindowEvent);

    fn redraw(&mut self, window: &Window);
}

// The State Machine that holds the viewer while waiting for the OS
struct UmbraRunner<H> {
    handler: H,
    settings: WindowSettings,
    window: Option<MainWindow>,
    error: Option<WindowError>,
}

impl<H: ViewerHandler> UmbraRunner<H> {
    fn new(handler: H, settings: WindowSettings) -> Self {
        Self {
            handler,
            settings,
            window: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: WindowError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }
}

impl<H: ViewerHandler> ApplicationHandler for UmbraRunner<H> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Resumed fires again on some platforms, the window and the GPU
        // state are created only once.
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(self.settings.attributes()) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };

        if let Err(err) = self.handler.init(window.clone()) {
            return self.fail(event_loop, WindowError::Init(err));
        }

        window.request_redraw();
        self.window = Some(MainWindow(window));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.0.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(MainWindow(window)) = &self.window else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested, stopping");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.handler.redraw(window);
            }
            event => self.handler.window_event(window, &event),
        }
    }
}

/// Opens the window and runs the viewer until it is closed.
pub fn run_viewer<H: ViewerHandler>(settings: WindowSettings, handler: H) -> Result<(), WindowError> {
    let event_loop = EventLoop::new()?;

    // ControlFlow::Poll continuously runs the event loop, even if the OS hasn't
    // dispatched any events. The viewer redraws every frame.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runner = UmbraRunner::new(handler, settings);
    event_loop.run_app(&mut runner)?;

    match runner.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::Size;

    use super::*;

    #[test]
    fn settings_become_window_attributes() {
        let settings = WindowSettings {
            title: "Sponza".to_string(),
            width: 800,
            height: 600,
        };
        let attributes = settings.attributes();

        assert_eq!(attributes.title, "Sponza");
        assert_eq!(
            attributes.inner_size,
            Some(Size::Logical(LogicalSize::new(800.0, 600.0)))
        );
    }

    #[test]
    fn zero_sized_windows_are_bumped_to_one_pixel() {
        let settings = WindowSettings {
            width: 0,
            ..Default::default()
        };
        assert_eq!(
            settings.attributes().inner_size,
            Some(Size::Logical(LogicalSize::new(1.0, 720.0)))
        );
    }
}
