pub mod frames;
pub mod scene;
pub mod signal;
pub mod trace;

pub use frames::{linspace, FrameSequence};
pub use scene::{AxisRange, PanelKind, PanelLayout, Scene};
pub use signal::{SignalTable, SignalTables};
pub use trace::Trace;
