// src/views/plot_panel.rs
//
// One set of axes: maps data coordinates into its screen rectangle and
// draws the frame, ticks, labels and legend around it.

use nannou::prelude::*;
use std::f32::consts::PI;

use super::style::Swatch;
use crate::models::{AxisRange, PanelLayout, Trace};

const TICK_LENGTH: f32 = 5.0;
const LEGEND_ROW_HEIGHT: f32 = 18.0;
const LEGEND_KEY_WIDTH: f32 = 24.0;
const LEGEND_TEXT_WIDTH: f32 = 110.0;

pub struct PlotPanel {
    pub layout: PanelLayout,
    pub area: Rect,
    x_ticks: Vec<f64>,
    y_ticks: Vec<f64>,
}

impl PlotPanel {
    pub fn new(layout: PanelLayout, area: Rect) -> Self {
        // short panels get fewer y ticks so the labels don't collide
        let max_y_ticks = if layout.height_ratio > 1.0 { 5 } else { 2 };
        Self {
            x_ticks: nice_ticks(layout.x_range, 5),
            y_ticks: nice_ticks(layout.y_range, max_y_ticks),
            layout,
            area,
        }
    }

    pub fn to_screen(&self, x: f64, y: f64) -> Point2 {
        let fx = ((x - self.layout.x_range.min) / self.layout.x_range.span()) as f32;
        let fy = ((y - self.layout.y_range.min) / self.layout.y_range.span()) as f32;
        pt2(
            self.area.left() + fx * self.area.w(),
            self.area.bottom() + fy * self.area.h(),
        )
    }

    /// Screen points of the finite samples of a trace.
    pub fn screen_points(&self, trace: &Trace) -> Vec<Point2> {
        trace
            .finite_points()
            .map(|(x, y)| self.to_screen(x, y))
            .collect()
    }

    pub fn draw_markers(&self, draw: &Draw, trace: &Trace, swatch: &Swatch) {
        for point in self.screen_points(trace) {
            swatch.draw_marker(draw, point);
        }
    }

    pub fn draw_curve(&self, draw: &Draw, trace: &Trace, swatch: &Swatch) {
        let weight = match swatch {
            Swatch::Line { weight, .. } => *weight,
            _ => 1.0,
        };
        let points = self.screen_points(trace);
        for window in points.windows(2) {
            if let [p1, p2] = window {
                draw.line()
                    .start(*p1)
                    .end(*p2)
                    .stroke_weight(weight)
                    .color(swatch.color())
                    .caps_round();
            }
        }
    }

    pub fn draw_axes(&self, draw: &Draw, font_size: u32) {
        let area = self.area;

        // axes frame
        draw.rect()
            .xy(area.xy())
            .wh(area.wh())
            .no_fill()
            .stroke(BLACK)
            .stroke_weight(1.0);

        let x_decimals = tick_decimals(&self.x_ticks);
        for &tick in &self.x_ticks {
            let p = self.to_screen(tick, self.layout.y_range.min);
            draw.line()
                .start(p)
                .end(pt2(p.x, p.y - TICK_LENGTH))
                .stroke_weight(1.0)
                .color(BLACK);
            draw.text(&format!("{:.*}", x_decimals, tick))
                .xy(pt2(p.x, p.y - TICK_LENGTH - font_size as f32 * 0.8))
                .wh(vec2(60.0, font_size as f32 * 1.5))
                .font_size(font_size)
                .color(BLACK);
        }

        let y_decimals = tick_decimals(&self.y_ticks);
        for &tick in &self.y_ticks {
            let p = self.to_screen(self.layout.x_range.min, tick);
            draw.line()
                .start(p)
                .end(pt2(p.x - TICK_LENGTH, p.y))
                .stroke_weight(1.0)
                .color(BLACK);
            draw.text(&format!("{:.*}", y_decimals, tick))
                .xy(pt2(p.x - TICK_LENGTH - 22.0, p.y))
                .wh(vec2(40.0, font_size as f32 * 1.5))
                .font_size(font_size)
                .right_justify()
                .color(BLACK);
        }

        // title
        draw.text(self.layout.title)
            .xy(pt2(area.x(), area.top() + font_size as f32 * 1.2))
            .wh(vec2(area.w(), font_size as f32 * 2.0))
            .font_size(font_size + 2)
            .color(BLACK);

        if let Some(x_label) = self.layout.x_label {
            draw.text(x_label)
                .xy(pt2(area.x(), area.bottom() - TICK_LENGTH - font_size as f32 * 2.4))
                .wh(vec2(area.w(), font_size as f32 * 1.5))
                .font_size(font_size)
                .color(BLACK);
        }

        draw.text(self.layout.y_label)
            .xy(pt2(area.left() - 62.0, area.y()))
            .wh(vec2(area.h().max(120.0), font_size as f32 * 1.5))
            .font_size(font_size)
            .rotate(PI / 2.0)
            .color(BLACK);
    }

    /// Legend box in the upper-left corner of the axes.
    pub fn draw_legend(&self, draw: &Draw, entries: &[(&str, Swatch)], font_size: u32) {
        if entries.is_empty() {
            return;
        }
        let width = LEGEND_KEY_WIDTH + LEGEND_TEXT_WIDTH + 12.0;
        let height = LEGEND_ROW_HEIGHT * entries.len() as f32 + 8.0;
        let legend = Rect::from_w_h(width, height)
            .top_left_of(self.area.pad(6.0));

        draw.rect()
            .xy(legend.xy())
            .wh(legend.wh())
            .color(rgba(1.0, 1.0, 1.0, 0.8))
            .stroke(rgba(0.8, 0.8, 0.8, 1.0))
            .stroke_weight(1.0);

        for (row, (label, swatch)) in entries.iter().enumerate() {
            let y = legend.top() - 4.0 - LEGEND_ROW_HEIGHT * (row as f32 + 0.5);
            let key_x = legend.left() + 6.0 + LEGEND_KEY_WIDTH / 2.0;
            swatch.draw_legend_key(draw, pt2(key_x, y), LEGEND_KEY_WIDTH);

            let text_x = legend.left() + 6.0 + LEGEND_KEY_WIDTH + 6.0 + LEGEND_TEXT_WIDTH / 2.0;
            draw.text(label)
                .xy(pt2(text_x, y))
                .wh(vec2(LEGEND_TEXT_WIDTH, LEGEND_ROW_HEIGHT))
                .font_size(font_size.saturating_sub(2).max(8))
                .left_justify()
                .color(BLACK);
        }
    }
}

/// Tick positions on round steps (1, 2, 2.5 or 5 times a power of ten),
/// at most roughly `max_ticks` intervals across the range.
pub fn nice_ticks(range: AxisRange, max_ticks: usize) -> Vec<f64> {
    let span = range.span();
    if !span.is_finite() || span <= 0.0 {
        return vec![range.min];
    }

    let rough = span / max_ticks.max(1) as f64;
    let magnitude = 10f64.powf(rough.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&step| step >= rough * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude);

    let first = (range.min / step - 1e-9).ceil() as i64;
    let last = (range.max / step + 1e-9).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Decimal places needed to print every tick exactly.
pub fn tick_decimals(ticks: &[f64]) -> usize {
    (0..6)
        .find(|&d| {
            let scale = 10f64.powi(d as i32);
            ticks.iter().all(|t| ((t * scale).round() - t * scale).abs() < 1e-6)
        })
        .unwrap_or(6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PanelKind;

    fn test_panel(y_max: f64, height_ratio: f32) -> PlotPanel {
        let layout = PanelLayout {
            kind: PanelKind::Emi,
            title: "test",
            x_label: None,
            y_label: "y",
            x_range: AxisRange::new(0.0, 10.0),
            y_range: AxisRange::new(0.0, y_max),
            height_ratio,
        };
        PlotPanel::new(layout, Rect::from_x_y_w_h(0.0, 0.0, 100.0, 50.0))
    }

    #[test]
    fn test_to_screen_corners() {
        let panel = test_panel(10.0, 1.0);
        assert_eq!(panel.to_screen(0.0, 0.0), pt2(-50.0, -25.0));
        assert_eq!(panel.to_screen(10.0, 10.0), pt2(50.0, 25.0));
        assert_eq!(panel.to_screen(5.0, 5.0), pt2(0.0, 0.0));
    }

    #[test]
    fn test_to_screen_fractional_values() {
        let panel = test_panel(1.0, 1.0);
        let p = panel.to_screen(4.2, 0.25);
        assert!((p.x - (-8.0)).abs() < 1e-4);
        assert!((p.y - (-12.5)).abs() < 1e-4);
    }

    #[test]
    fn test_screen_points_skip_hidden() {
        let panel = test_panel(10.0, 1.0);
        assert!(panel.screen_points(&Trace::hidden()).is_empty());
        let trace = Trace::new(vec![0.0, f64::NAN, 10.0], vec![0.0, 1.0, 10.0]);
        assert_eq!(panel.screen_points(&trace).len(), 2);
    }

    #[test]
    fn test_nice_ticks() {
        let tests = vec![
            // (min, max, max_ticks, expected)
            (0.0, 10.0, 5, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]),
            (0.0, 1.0, 2, vec![0.0, 0.5, 1.0]),
            (0.0, 10.0, 2, vec![0.0, 5.0, 10.0]),
            (0.0, 1.0, 5, vec![0.0, 0.2, 0.4, 0.6000000000000001, 0.8, 1.0]),
        ];
        for (min, max, max_ticks, expected) in tests {
            let ticks = nice_ticks(AxisRange::new(min, max), max_ticks);
            assert_eq!(ticks.len(), expected.len(), "for {}..{}", min, max);
            for (t, e) in ticks.iter().zip(expected.iter()) {
                assert!((t - e).abs() < 1e-9, "tick {} != {} for {}..{}", t, e, min, max);
            }
        }
    }

    #[test]
    fn test_nice_ticks_degenerate_range() {
        assert_eq!(nice_ticks(AxisRange::new(3.0, 3.0), 5), vec![3.0]);
    }

    #[test]
    fn test_tick_decimals() {
        assert_eq!(tick_decimals(&[0.0, 2.0, 4.0]), 0);
        assert_eq!(tick_decimals(&[0.0, 0.5, 1.0]), 1);
        assert_eq!(tick_decimals(&[0.0, 0.25, 0.5]), 2);
    }

    #[test]
    fn test_short_panels_get_fewer_ticks() {
        assert_eq!(test_panel(10.0, 1.0).y_ticks, vec![0.0, 5.0, 10.0]);
        assert_eq!(test_panel(10.0, 3.0).y_ticks.len(), 6);
        assert_eq!(test_panel(10.0, 3.0).x_ticks.len(), 6);
    }
}
