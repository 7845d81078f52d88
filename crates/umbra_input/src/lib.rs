//! Pointer input for the viewer: raw window events are collected into
//! [`PointerState`], folded into [`PointerAction`]s once per frame and handed
//! to the examiner camera unless the UI claims the pointer.

pub mod examiner;
pub mod logical;
pub mod physical;

pub use examiner::drive_examiner;
pub use logical::{ButtonPhase, PointerAction};
pub use physical::{MouseButtonId, PointerState};
