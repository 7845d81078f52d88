//! Per-frame sequencing.
//!
//! [`FramePacer`] hands out the ring slot index of the frame being recorded and
//! [`FrameCycle`] tracks where the current frame is in its fixed sequence of
//! phases. Both are owned by the orchestrating viewer, nothing is global.

use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FramePhase {
    #[default]
    Idle,
    InputApplied,
    BuffersRefreshed,
    ResourcesBound,
    Submitted,
}

impl FramePhase {
    pub fn next(self) -> Self {
        match self {
            FramePhase::Idle => FramePhase::InputApplied,
            FramePhase::InputApplied => FramePhase::BuffersRefreshed,
            FramePhase::BuffersRefreshed => FramePhase::ResourcesBound,
            FramePhase::ResourcesBound => FramePhase::Submitted,
            FramePhase::Submitted => FramePhase::Idle,
        }
    }
}

impl fmt::Display for FramePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FramePhase::Idle => "idle",
            FramePhase::InputApplied => "input applied",
            FramePhase::BuffersRefreshed => "buffers refreshed",
            FramePhase::ResourcesBound => "resources bound",
            FramePhase::Submitted => "submitted",
        };
        f.write_str(name)
    }
}

/// State machine of a single frame.
///
/// Transitions must follow [`FramePhase::next`]; anything else means the
/// orchestration code is broken and trips a debug assertion.
#[derive(Debug, Default)]
pub struct FrameCycle {
    phase: FramePhase,
    completed_frames: u64,
}

impl FrameCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn completed_frames(&self) -> u64 {
        self.completed_frames
    }

    pub fn advance(&mut self, to: FramePhase) {
        debug_assert_eq!(
            self.phase.next(),
            to,
            "frame phase '{}' cannot be followed by '{}'",
            self.phase,
            to
        );

        if to == FramePhase::Idle {
            self.completed_frames += 1;
        }
        self.phase = to;
    }

    /// Drops a frame that could not be completed (e.g. the surface was lost)
    /// and returns to [`FramePhase::Idle`] without counting it.
    pub fn abort(&mut self) {
        if self.phase != FramePhase::Idle {
            log::debug!("frame aborted in phase '{}'", self.phase);
        }
        self.phase = FramePhase::Idle;
    }
}

/// Cycles the ring slot index `0..frame_count`.
#[derive(Clone, Debug)]
pub struct FramePacer {
    frame_count: usize,
    frame_index: usize,
}

impl FramePacer {
    pub fn new(frame_count: usize) -> Self {
        assert!(frame_count > 0, "at least one frame in flight is required");
        Self {
            frame_count,
            frame_index: 0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Moves to the next slot; called once the current frame is presented.
    pub fn advance(&mut self) -> usize {
        self.frame_index = (self.frame_index + 1) % self.frame_count;
        self.frame_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQUENCE: [FramePhase; 5] = [
        FramePhase::InputApplied,
        FramePhase::BuffersRefreshed,
        FramePhase::ResourcesBound,
        FramePhase::Submitted,
        FramePhase::Idle,
    ];

    #[test]
    fn full_sequence_returns_to_idle_and_counts_the_frame() {
        let mut cycle = FrameCycle::new();
        for _ in 0..3 {
            for phase in SEQUENCE {
                cycle.advance(phase);
            }
        }
        assert_eq!(cycle.phase(), FramePhase::Idle);
        assert_eq!(cycle.completed_frames(), 3);
    }

    #[test]
    #[should_panic(expected = "cannot be followed by")]
    fn skipping_a_phase_is_a_contract_violation() {
        let mut cycle = FrameCycle::new();
        cycle.advance(FramePhase::InputApplied);
        cycle.advance(FramePhase::ResourcesBound);
    }

    #[test]
    fn abort_resets_without_counting() {
        let mut cycle = FrameCycle::new();
        cycle.advance(FramePhase::InputApplied);
        cycle.advance(FramePhase::BuffersRefreshed);
        cycle.abort();
        assert_eq!(cycle.phase(), FramePhase::Idle);
        assert_eq!(cycle.completed_frames(), 0);
        cycle.advance(FramePhase::InputApplied);
    }

    #[test]
    fn pacer_cycles_through_every_slot() {
        let mut pacer = FramePacer::new(3);
        let seen: Vec<usize> = (0..7).map(|_| pacer.advance()).collect();
        assert_eq!(seen, vec![1, 2, 0, 1, 2, 0, 1]);
        assert_eq!(pacer.frame_count(), 3);
    }
}
