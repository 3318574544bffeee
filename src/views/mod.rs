// src/views/mod.rs

pub mod figure;
pub mod plot_panel;
pub mod style;

pub use figure::{stack_panels, Figure, FigureMargins};
pub use plot_panel::{nice_ticks, PlotPanel};
pub use style::{FigureStyle, Swatch};
