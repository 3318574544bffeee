// src/views/figure.rs
//
// The three stacked panels of the detection figure and the drawing of one
// animation frame onto them.

use nannou::prelude::*;

use super::plot_panel::PlotPanel;
use super::style::{FigureStyle, Swatch};
use crate::animation::FrameState;
use crate::models::{PanelKind, Scene, Trace};

#[derive(Debug, Clone, Copy)]
pub struct FigureMargins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub gap: f32, // vertical space between panels, holds titles and x labels
}

impl Default for FigureMargins {
    fn default() -> Self {
        Self {
            left: 90.0,
            right: 25.0,
            top: 40.0,
            bottom: 60.0,
            gap: 80.0,
        }
    }
}

/// Splits `bounds` into vertically stacked rectangles, top to bottom,
/// with heights proportional to `ratios`.
pub fn stack_panels(bounds: Rect, ratios: &[f32], margins: FigureMargins) -> Vec<Rect> {
    let gaps = margins.gap * ratios.len().saturating_sub(1) as f32;
    let usable = (bounds.h() - margins.top - margins.bottom - gaps).max(0.0);
    let width = (bounds.w() - margins.left - margins.right).max(0.0);
    let x = bounds.left() + margins.left + width / 2.0;
    let total: f32 = ratios.iter().sum();

    let mut top = bounds.top() - margins.top;
    ratios
        .iter()
        .map(|ratio| {
            let height = if total > 0.0 { usable * ratio / total } else { 0.0 };
            let rect = Rect::from_x_y_w_h(x, top - height / 2.0, width, height);
            top -= height + margins.gap;
            rect
        })
        .collect()
}

pub struct Figure {
    scene: Scene,
    style: FigureStyle,
    panels: Vec<PlotPanel>,
}

impl Figure {
    pub fn new(scene: Scene, style: FigureStyle, bounds: Rect) -> Self {
        let ratios: Vec<f32> = scene.panels.iter().map(|p| p.height_ratio).collect();
        let areas = stack_panels(bounds, &ratios, FigureMargins::default());
        let panels = scene
            .panels
            .iter()
            .cloned()
            .zip(areas)
            .map(|(layout, area)| PlotPanel::new(layout, area))
            .collect();

        Self {
            scene,
            style,
            panels,
        }
    }

    pub fn panel(&self, kind: PanelKind) -> Option<&PlotPanel> {
        self.panels.iter().find(|p| p.layout.kind == kind)
    }

    /// Draws the static scene and the artifacts of `state`.
    pub fn draw(&self, draw: &Draw, state: &FrameState) {
        draw.background().color(WHITE);
        let font_size = self.style.font_size;

        for panel in &self.panels {
            panel.draw_axes(draw, font_size);

            match panel.layout.kind {
                PanelKind::Spatial => {
                    let (tx, ty) = self.scene.target;
                    panel.draw_markers(draw, &Trace::point(tx, ty), &self.style.target);
                    let rubble = Trace::new(
                        self.scene.rubble.iter().map(|p| p.0).collect(),
                        self.scene.rubble.iter().map(|p| p.1).collect(),
                    );
                    panel.draw_markers(draw, &rubble, &self.style.rubble);
                    panel.draw_markers(draw, &state.drone, &self.style.drone);
                    for probe in &state.probes {
                        panel.draw_markers(draw, probe, &self.style.probe);
                    }
                }
                PanelKind::Emi => panel.draw_curve(draw, &state.emi, &self.style.emi),
                PanelKind::Ert => panel.draw_curve(draw, &state.ert, &self.style.ert),
            }

            panel.draw_legend(draw, &self.legend_entries(panel.layout.kind), font_size);
        }
    }

    fn legend_entries(&self, kind: PanelKind) -> Vec<(&'static str, Swatch)> {
        match kind {
            PanelKind::Spatial => vec![
                ("Human Body", self.style.target),
                ("Rubble", self.style.rubble),
                ("Drone", self.style.drone),
                ("ERT Probe 1", self.style.probe),
                ("ERT Probe 2", self.style.probe),
            ],
            PanelKind::Emi => vec![("EMI Signal", self.style.emi)],
            PanelKind::Ert => vec![("ERT Signal", self.style.ert)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SceneConfig, SignalConfig, StyleConfig};

    #[test]
    fn test_stack_panels_ratios() {
        let bounds = Rect::from_w_h(1000.0, 800.0);
        let margins = FigureMargins::default();
        let rects = stack_panels(bounds, &[3.0, 1.0, 1.0], margins);
        assert_eq!(rects.len(), 3);

        let heights: Vec<f32> = rects.iter().map(|r| r.h()).collect();
        assert!((heights[0] - 3.0 * heights[1]).abs() < 1e-3);
        assert!((heights[1] - heights[2]).abs() < 1e-3);

        // top to bottom, no overlap, gaps preserved
        for pair in rects.windows(2) {
            let gap = pair[0].bottom() - pair[1].top();
            assert!((gap - margins.gap).abs() < 1e-3);
        }
        assert!((rects[0].top() - (400.0 - margins.top)).abs() < 1e-3);
        assert!((rects[2].bottom() - (-400.0 + margins.bottom)).abs() < 1e-3);
    }

    #[test]
    fn test_stack_panels_share_width() {
        let bounds = Rect::from_w_h(1000.0, 800.0);
        let rects = stack_panels(bounds, &[3.0, 1.0, 1.0], FigureMargins::default());
        for rect in &rects {
            assert_eq!(rect.left(), rects[0].left());
            assert_eq!(rect.w(), 1000.0 - 90.0 - 25.0);
        }
    }

    #[test]
    fn test_stack_panels_too_small_window() {
        let rects = stack_panels(Rect::from_w_h(50.0, 50.0), &[3.0, 1.0, 1.0], FigureMargins::default());
        assert!(rects.iter().all(|r| r.h() == 0.0 && r.w() == 0.0));
    }

    #[test]
    fn test_figure_panels_in_scene_order() {
        let scene = Scene::new(&SceneConfig::default(), &SignalConfig::default());
        let style = FigureStyle::new(&StyleConfig::default());
        let figure = Figure::new(scene, style, Rect::from_w_h(1000.0, 800.0));

        let spatial = figure.panel(PanelKind::Spatial).unwrap();
        let emi = figure.panel(PanelKind::Emi).unwrap();
        let ert = figure.panel(PanelKind::Ert).unwrap();
        assert!(spatial.area.bottom() > emi.area.top());
        assert!(emi.area.bottom() > ert.area.top());

        assert_eq!(figure.legend_entries(PanelKind::Spatial).len(), 5);
        assert_eq!(figure.legend_entries(PanelKind::Ert)[0].0, "ERT Signal");
    }
}
