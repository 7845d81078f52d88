//! Examiner (orbit) camera controller.
//!
//! Pointer coordinates are normalized to `[-1, 1]` with `+y` pointing up.
//! The produced matrix maps scene space into a left-handed view space where the
//! camera sits at the origin looking down `+z`.

use glam::{Mat4, Quat, Vec2, Vec3};

const PAN_SPEED: f32 = 0.5;
const DOLLY_SPEED: f32 = 1.5;
const MIN_DISTANCE: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExaminerButton {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DragMode {
    Rotate,
    Pan,
    Dolly,
}

#[derive(Clone, Copy, Debug)]
struct Drag {
    mode: DragMode,
    start: Vec2,
    start_rotation: Quat,
    start_translation: Vec3,
}

#[derive(Clone, Debug)]
pub struct ExaminerController {
    rotation: Quat,
    translation: Vec3,
    drag: Option<Drag>,
}

impl Default for ExaminerController {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
            drag: None,
        }
    }
}

impl ExaminerController {
    pub fn new(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn active(&self) -> bool {
        self.drag.is_some()
    }

    /// Starts (`pressed`) or ends a drag at `position`.
    ///
    /// Left rotates, left with ctrl pans, right dollies along the view axis.
    pub fn click(&mut self, pressed: bool, button: ExaminerButton, ctrl: bool, position: Vec2) {
        if !pressed {
            if self.drag.is_some() {
                self.move_to(position);
            }
            self.drag = None;
            return;
        }

        let mode = match (button, ctrl) {
            (ExaminerButton::Left, false) => DragMode::Rotate,
            (ExaminerButton::Left, true) => DragMode::Pan,
            (ExaminerButton::Right, _) => DragMode::Dolly,
        };

        self.drag = Some(Drag {
            mode,
            start: position,
            start_rotation: self.rotation,
            start_translation: self.translation,
        });
    }

    pub fn move_to(&mut self, position: Vec2) {
        let Some(drag) = self.drag else {
            return;
        };

        let delta = position - drag.start;
        match drag.mode {
            DragMode::Rotate => {
                let from = arcball_point(drag.start);
                let to = arcball_point(position);
                let arc = Quat::from_rotation_arc(from, to);
                self.rotation = (arc * drag.start_rotation).normalize();
            }
            DragMode::Pan => {
                let scale = drag.start_translation.z.abs().max(MIN_DISTANCE) * PAN_SPEED;
                self.translation =
                    drag.start_translation + Vec3::new(delta.x * scale, delta.y * scale, 0.0);
            }
            DragMode::Dolly => {
                let z = drag.start_translation.z - delta.y * DOLLY_SPEED;
                self.translation = Vec3::new(
                    drag.start_translation.x,
                    drag.start_translation.y,
                    z.max(MIN_DISTANCE),
                );
            }
        }
    }

    /// Scene-to-view transform: rotate about the scene origin, then translate.
    pub fn transformation_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * Mat4::from_quat(self.rotation)
    }
}

/// Projects a normalized pointer position onto the unit sphere facing the
/// viewer (`-z` in left-handed view space).
fn arcball_point(position: Vec2) -> Vec3 {
    let len_sq = position.length_squared();
    if len_sq <= 1.0 {
        Vec3::new(position.x, position.y, -(1.0 - len_sq).sqrt())
    } else {
        position.normalize().extend(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_the_given_translation() {
        let examiner = ExaminerController::new(Vec3::new(0.0, -0.25, 1.5));
        let m = examiner.transformation_matrix();
        assert!(m.abs_diff_eq(Mat4::from_translation(Vec3::new(0.0, -0.25, 1.5)), 1e-6));
        assert!(!examiner.active());
    }

    #[test]
    fn move_without_click_is_ignored() {
        let mut examiner = ExaminerController::new(Vec3::Z);
        examiner.move_to(Vec2::new(0.5, 0.5));
        assert_eq!(examiner.rotation(), Quat::IDENTITY);
        assert_eq!(examiner.translation(), Vec3::Z);
    }

    #[test]
    fn horizontal_left_drag_rotates_about_the_vertical_axis() {
        let mut examiner = ExaminerController::new(Vec3::Z);
        examiner.click(true, ExaminerButton::Left, false, Vec2::ZERO);
        assert!(examiner.active());
        examiner.move_to(Vec2::new(0.5, 0.0));

        let (axis, angle) = examiner.rotation().to_axis_angle();
        assert!(angle > 0.1);
        assert!(axis.y.abs() > 0.99, "axis {axis:?}");
        assert_eq!(examiner.translation(), Vec3::Z);

        examiner.click(false, ExaminerButton::Left, false, Vec2::new(0.5, 0.0));
        assert!(!examiner.active());
    }

    #[test]
    fn ctrl_left_drag_pans() {
        let mut examiner = ExaminerController::new(Vec3::new(0.0, 0.0, 2.0));
        examiner.click(true, ExaminerButton::Left, true, Vec2::ZERO);
        examiner.move_to(Vec2::new(0.2, -0.1));
        let t = examiner.translation();
        assert!(t.x > 0.0 && t.y < 0.0);
        assert_eq!(t.z, 2.0);
        assert_eq!(examiner.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn right_drag_dollies_and_never_crosses_the_camera() {
        let mut examiner = ExaminerController::new(Vec3::new(0.0, 0.0, 1.0));
        examiner.click(true, ExaminerButton::Right, false, Vec2::ZERO);
        examiner.move_to(Vec2::new(0.0, -0.5));
        assert!(examiner.translation().z > 1.0);
        examiner.move_to(Vec2::new(0.0, 10.0));
        assert!(examiner.translation().z >= MIN_DISTANCE);
    }

    #[test]
    fn drags_are_relative_to_their_start() {
        let mut examiner = ExaminerController::new(Vec3::new(0.0, 0.0, 2.0));
        examiner.click(true, ExaminerButton::Right, false, Vec2::new(0.0, 0.3));
        examiner.move_to(Vec2::new(0.0, 0.3));
        assert_eq!(examiner.translation().z, 2.0);
    }
}
