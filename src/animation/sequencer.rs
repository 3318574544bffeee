// src/animation/sequencer.rs
//
// Walks the frame sequence: one pass where every frame is captured, then
// endless playback paced by the frame clock.

use super::clock::FrameClock;
use crate::models::FrameSequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Recording, // one animation frame per update, every frame captured
    Playback,  // looping in the window at the recording frame rate
}

/// The frame to draw next and whether it goes to the video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    pub frame: f64,
    pub capture: bool,
}

pub struct FrameSequencer {
    frames: FrameSequence,
    cursor: usize,
    run_state: RunState,
    clock: FrameClock,
}

impl FrameSequencer {
    pub fn new(frames: FrameSequence, fps: u32) -> Self {
        Self {
            frames,
            cursor: 0,
            run_state: RunState::Recording,
            clock: FrameClock::new(fps),
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// True once every frame of the recording pass has been handed out.
    pub fn recording_complete(&self) -> bool {
        self.run_state == RunState::Recording && self.cursor >= self.frames.len()
    }

    /// Advances by `dt` seconds. Recording ignores the clock and hands out each
    /// frame exactly once; playback waits for the clock and wraps around.
    pub fn next_frame(&mut self, dt: f32) -> Option<FrameStep> {
        match self.run_state {
            RunState::Recording => {
                let frame = self.frames.get(self.cursor)?;
                self.cursor += 1;
                Some(FrameStep {
                    frame,
                    capture: true,
                })
            }
            RunState::Playback => {
                if self.frames.is_empty() || !self.clock.tick(dt) {
                    return None;
                }
                let frame = self.frames.get(self.cursor)?;
                self.cursor = (self.cursor + 1) % self.frames.len();
                Some(FrameStep {
                    frame,
                    capture: false,
                })
            }
        }
    }

    /// Ends the recording pass, early or not, and rewinds for playback.
    /// Returns false when playback had already started.
    pub fn finish_recording(&mut self) -> bool {
        if self.run_state == RunState::Playback {
            return false;
        }
        self.run_state = RunState::Playback;
        self.cursor = 0;
        self.clock.reset();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_sequencer() -> FrameSequencer {
        FrameSequencer::new(FrameSequence::new(0.0, 10.0, 100), 5)
    }

    #[test]
    fn test_recording_captures_every_frame_once_in_order() {
        let mut sequencer = reference_sequencer();
        let expected: Vec<f64> = FrameSequence::new(0.0, 10.0, 100).iter().collect();

        let mut captured = Vec::new();
        while let Some(step) = sequencer.next_frame(0.0) {
            assert!(step.capture);
            captured.push(step.frame);
        }
        assert_eq!(captured, expected);
        assert!(sequencer.recording_complete());
        assert_eq!(sequencer.next_frame(1.0), None);
    }

    #[test]
    fn test_playback_wraps_without_capturing() {
        let mut sequencer = reference_sequencer();
        while sequencer.next_frame(0.0).is_some() {}
        assert!(sequencer.finish_recording());
        assert_eq!(sequencer.run_state(), RunState::Playback);
        assert!(!sequencer.recording_complete());

        // not due yet at 5 fps
        assert_eq!(sequencer.next_frame(0.1), None);

        let mut played = Vec::new();
        while played.len() < 150 {
            if let Some(step) = sequencer.next_frame(0.1) {
                assert!(!step.capture);
                played.push(step.frame);
            }
        }
        assert_eq!(played[0], 0.0);
        assert_eq!(played[99], 10.0);
        assert_eq!(played[100], 0.0);
    }

    #[test]
    fn test_early_finish_switches_once() {
        let mut sequencer = reference_sequencer();
        for _ in 0..10 {
            assert!(sequencer.next_frame(0.0).is_some());
        }
        assert!(sequencer.finish_recording());
        assert!(!sequencer.finish_recording());
        assert_eq!(sequencer.run_state(), RunState::Playback);

        let step = sequencer.next_frame(0.2).unwrap();
        assert_eq!(step.frame, 0.0);
        assert!(!step.capture);
    }

    #[test]
    fn test_empty_sequence() {
        let mut sequencer = FrameSequencer::new(FrameSequence::new(0.0, 10.0, 0), 5);
        assert!(sequencer.is_empty());
        assert!(sequencer.recording_complete());
        assert_eq!(sequencer.next_frame(0.0), None);
        assert!(sequencer.finish_recording());
        assert_eq!(sequencer.next_frame(1.0), None);
    }
}
