use umbra_core::ExaminerController;

use crate::{logical::PointerAction, physical::PointerState};

/// Feeds this frame's pointer activity to the examiner.
///
/// While the UI wants the pointer the input is swallowed and the camera stays
/// untouched. Returns `true` if the examiner received the input.
pub fn drive_examiner(
    pointer: &PointerState,
    examiner: &mut ExaminerController,
    ui_wants_pointer: bool,
) -> bool {
    if ui_wants_pointer {
        return false;
    }

    for action in PointerAction::for_frame(pointer) {
        match action {
            PointerAction::Click {
                pressed,
                button,
                ctrl,
                position,
            } => examiner.click(pressed, button, ctrl, position),
            PointerAction::Move { position } => examiner.move_to(position),
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::physical::MouseButtonId;

    fn dragging_pointer() -> PointerState {
        let mut pointer = PointerState::default();
        pointer.set_viewport(100, 100);
        pointer.set_cursor(50.0, 50.0);
        pointer.press(MouseButtonId::Left);
        pointer
    }

    #[test]
    fn input_is_swallowed_while_the_ui_captures_the_pointer() {
        let mut examiner = ExaminerController::new(Vec3::Z);
        let mut pointer = dragging_pointer();

        assert!(!drive_examiner(&pointer, &mut examiner, true));
        assert!(!examiner.active());

        pointer.end_frame();
        pointer.set_cursor(90.0, 50.0);
        drive_examiner(&pointer, &mut examiner, true);
        assert_eq!(
            examiner.transformation_matrix(),
            ExaminerController::new(Vec3::Z).transformation_matrix()
        );
    }

    #[test]
    fn drag_reaches_the_examiner_when_the_ui_is_idle() {
        let mut examiner = ExaminerController::new(Vec3::Z);
        let mut pointer = dragging_pointer();

        assert!(drive_examiner(&pointer, &mut examiner, false));
        assert!(examiner.active());

        pointer.end_frame();
        pointer.set_cursor(90.0, 50.0);
        drive_examiner(&pointer, &mut examiner, false);
        assert_ne!(examiner.rotation(), glam::Quat::IDENTITY);

        pointer.release(MouseButtonId::Left);
        drive_examiner(&pointer, &mut examiner, false);
        assert!(!examiner.active());
    }

    #[test]
    fn tap_within_one_frame_leaves_no_drag_behind() {
        let mut examiner = ExaminerController::new(Vec3::Z);
        let mut pointer = PointerState::default();
        pointer.set_viewport(100, 100);
        pointer.set_cursor(50.0, 50.0);
        pointer.press(MouseButtonId::Left);
        pointer.release(MouseButtonId::Left);

        assert!(drive_examiner(&pointer, &mut examiner, false));
        assert!(!examiner.active());

        pointer.end_frame();
        pointer.set_cursor(90.0, 50.0);
        drive_examiner(&pointer, &mut examiner, false);
        assert!(!examiner.active());
        assert!(examiner.rotation().abs_diff_eq(glam::Quat::IDENTITY, 1e-6));
    }
}
