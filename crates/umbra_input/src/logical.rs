use glam::Vec2;
use umbra_core::ExaminerButton;

use crate::physical::{MouseButtonId, PointerState};

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ButtonPhase: u8 {
        const NONE     = 0;
        const PRESSED  = 1 << 0;
        const HELD     = 1 << 1;
        const RELEASED = 1 << 2;
    }
}

/// What the pointer did this frame, from the examiner's point of view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerAction {
    Click {
        pressed: bool,
        button: ExaminerButton,
        ctrl: bool,
        position: Vec2,
    },
    Move {
        position: Vec2,
    },
}

impl PointerAction {
    /// This frame's pointer state as examiner actions, in the order they
    /// happened. A press and a release within one frame yield two clicks.
    pub fn for_frame(pointer: &PointerState) -> Vec<Self> {
        let position = pointer.normalized_position();
        let left = pointer.phase(MouseButtonId::Left);
        let right = pointer.phase(MouseButtonId::Right);
        let edges = ButtonPhase::PRESSED | ButtonPhase::RELEASED;

        let (button, phase) = if left.intersects(edges) {
            (ExaminerButton::Left, left)
        } else if right.intersects(edges) {
            (ExaminerButton::Right, right)
        } else {
            return vec![PointerAction::Move { position }];
        };

        let click = |pressed: bool| PointerAction::Click {
            pressed,
            button,
            ctrl: pointer.ctrl(),
            position,
        };

        match (
            phase.contains(ButtonPhase::PRESSED),
            phase.contains(ButtonPhase::RELEASED),
        ) {
            (true, true) if phase.contains(ButtonPhase::HELD) => vec![click(false), click(true)],
            (true, true) => vec![click(true), click(false)],
            (pressed, _) => vec![click(pressed)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer() -> PointerState {
        let mut pointer = PointerState::default();
        pointer.set_viewport(200, 100);
        pointer.set_cursor(150.0, 25.0);
        pointer
    }

    #[test]
    fn plain_motion_is_a_move() {
        let action = PointerAction::for_frame(&pointer());
        assert_eq!(
            action,
            vec![PointerAction::Move {
                position: Vec2::new(0.5, 0.5)
            }]
        );
    }

    #[test]
    fn right_press_with_ctrl_is_a_click() {
        let mut pointer = pointer();
        pointer.set_ctrl(true);
        pointer.press(MouseButtonId::Right);
        match PointerAction::for_frame(&pointer).as_slice() {
            [PointerAction::Click {
                pressed,
                button,
                ctrl,
                ..
            }] => {
                assert!(*pressed);
                assert_eq!(*button, ExaminerButton::Right);
                assert!(*ctrl);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn left_release_is_reported_after_the_frame_of_the_press() {
        let mut pointer = pointer();
        pointer.press(MouseButtonId::Left);
        pointer.end_frame();
        assert!(matches!(
            PointerAction::for_frame(&pointer).as_slice(),
            [PointerAction::Move { .. }]
        ));

        pointer.release(MouseButtonId::Left);
        assert!(matches!(
            PointerAction::for_frame(&pointer).as_slice(),
            [PointerAction::Click {
                pressed: false,
                button: ExaminerButton::Left,
                ..
            }]
        ));
    }

    fn pressed_flags(actions: &[PointerAction]) -> Vec<bool> {
        actions
            .iter()
            .map(|action| match action {
                PointerAction::Click { pressed, .. } => *pressed,
                PointerAction::Move { .. } => panic!("unexpected move"),
            })
            .collect()
    }

    #[test]
    fn tap_within_one_frame_is_a_press_then_a_release() {
        let mut pointer = pointer();
        pointer.press(MouseButtonId::Left);
        pointer.release(MouseButtonId::Left);

        let actions = PointerAction::for_frame(&pointer);
        assert_eq!(pressed_flags(&actions), vec![true, false]);
        assert!(actions.iter().all(|action| matches!(
            action,
            PointerAction::Click {
                button: ExaminerButton::Left,
                ..
            }
        )));
    }

    #[test]
    fn release_and_repress_within_one_frame_ends_held() {
        let mut pointer = pointer();
        pointer.press(MouseButtonId::Right);
        pointer.end_frame();
        pointer.release(MouseButtonId::Right);
        pointer.press(MouseButtonId::Right);

        assert_eq!(
            pressed_flags(&PointerAction::for_frame(&pointer)),
            vec![false, true]
        );
    }
}
