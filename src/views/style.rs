// src/views/style.rs
//
// Colors and marker shapes for the figure artifacts

use nannou::prelude::*;

use crate::config::StyleConfig;

// marker sizes are given in points, the figure is rendered at 100 dpi
pub const POINTS_TO_PIXELS: f32 = 100.0 / 72.0;

#[derive(Debug, Clone, Copy)]
pub enum Swatch {
    Circle { color: Rgba, diameter: f32 },
    Square { color: Rgba, side: f32 },
    Line { color: Rgba, weight: f32 },
}

impl Swatch {
    pub fn color(&self) -> Rgba {
        match self {
            Swatch::Circle { color, .. } | Swatch::Square { color, .. } | Swatch::Line { color, .. } => {
                *color
            }
        }
    }

    /// Draws the swatch as a point marker centred on `at`.
    pub fn draw_marker(&self, draw: &Draw, at: Point2) {
        match *self {
            Swatch::Circle { color, diameter } => {
                draw.ellipse().xy(at).radius(diameter / 2.0).color(color);
            }
            Swatch::Square { color, side } => {
                draw.rect().xy(at).w_h(side, side).color(color);
            }
            Swatch::Line { color, weight } => {
                draw.ellipse().xy(at).radius(weight).color(color);
            }
        }
    }

    /// Draws the swatch as a legend key of the given width.
    pub fn draw_legend_key(&self, draw: &Draw, at: Point2, width: f32) {
        match *self {
            Swatch::Line { color, weight } => {
                draw.line()
                    .start(pt2(at.x - width / 2.0, at.y))
                    .end(pt2(at.x + width / 2.0, at.y))
                    .stroke_weight(weight)
                    .color(color);
            }
            _ => self.draw_marker(draw, at),
        }
    }
}

/// One swatch per artifact of the figure.
#[derive(Debug, Clone)]
pub struct FigureStyle {
    pub target: Swatch,
    pub rubble: Swatch,
    pub drone: Swatch,
    pub probe: Swatch,
    pub emi: Swatch,
    pub ert: Swatch,
    pub font_size: u32,
}

impl FigureStyle {
    pub fn new(config: &StyleConfig) -> Self {
        let px = |points: f32| points * POINTS_TO_PIXELS;
        Self {
            target: Swatch::Circle {
                color: rgba(0.75, 0.75, 0.0, 1.0),
                diameter: px(config.target_size),
            },
            rubble: Swatch::Square {
                color: rgba(0.0, 0.0, 0.0, 0.5),
                side: px(config.rubble_size),
            },
            drone: Swatch::Circle {
                color: rgba(0.0, 0.0, 1.0, 1.0),
                diameter: px(config.drone_size),
            },
            probe: Swatch::Circle {
                color: rgba(1.0, 0.0, 0.0, 1.0),
                diameter: px(config.probe_size),
            },
            emi: Swatch::Line {
                color: rgba(0.0, 0.5, 0.0, 1.0),
                weight: config.line_weight,
            },
            ert: Swatch::Line {
                color: rgba(1.0, 0.0, 0.0, 1.0),
                weight: config.line_weight,
            },
            font_size: config.font_size,
        }
    }
}
