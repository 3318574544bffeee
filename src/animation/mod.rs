pub mod animator;
pub mod clock;
pub mod sequencer;

pub use animator::{Animator, FrameState, Phase};
pub use clock::FrameClock;
pub use sequencer::{FrameStep, FrameSequencer, RunState};
