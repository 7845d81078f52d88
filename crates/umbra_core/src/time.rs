use std::time::{Duration, Instant};

pub struct Time {
    startup: Instant,
    last_update: Instant,
    delta: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self {
            startup: Instant::now(),
            last_update: Instant::now(),
            delta: Duration::ZERO,
        }
    }
}

impl Time {
    /// Called by the viewer once per frame
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_update;
        self.last_update = now;
    }

    /// Returns time in seconds since last frame (e.g., 0.016 for 60fps)
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Returns total time since the viewer started
    pub fn elapsed_seconds(&self) -> f64 {
        self.startup.elapsed().as_secs_f64()
    }
}

/// Frame-rate statistics averaged over one-second windows.
///
/// The ray throughput assumes one primary shadow ray per pixel and light.
#[derive(Clone, Debug, Default)]
pub struct FrameStats {
    frames_in_window: u32,
    window_start: f64,
    fps: f32,
    million_rays_per_second: f32,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame at `total_seconds` since startup.
    ///
    /// Returns `true` when a window closed and the averages were refreshed.
    pub fn tick(&mut self, total_seconds: f64, width: u32, height: u32, light_count: usize) -> bool {
        self.frames_in_window += 1;

        let window = total_seconds - self.window_start;
        if window < 1.0 {
            return false;
        }

        self.fps = self.frames_in_window as f32 / window as f32;
        self.million_rays_per_second =
            (width as f32 * height as f32 * self.fps * light_count as f32) / 1e6;

        self.frames_in_window = 0;
        self.window_start = total_seconds;
        true
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn million_rays_per_second(&self) -> f32 {
        self.million_rays_per_second
    }
}
