//! Engine-agnostic building blocks of the viewer: camera projection, the
//! examiner (orbit) controller, frame sequencing and timing, transforms.

pub use glam;

pub mod camera;
pub mod examiner;
pub mod frame;
pub mod time;
pub mod transform;

pub use camera::Projection;
pub use examiner::{ExaminerButton, ExaminerController};
pub use frame::{FrameCycle, FramePacer, FramePhase};
pub use time::{FrameStats, Time};
pub use transform::Transform;
