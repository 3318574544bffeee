pub mod frame_recorder;
pub mod timeline;

pub use frame_recorder::{encode_progress, FrameRecorder};
pub use timeline::Timeline;
