// src/models/scene.rs
//
// The fixed figure layout: three stacked panels and the static markers.
// Built once from config and never mutated.

use crate::config::{SceneConfig, SignalConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Spatial,
    Emi,
    Ert,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

#[derive(Debug, Clone)]
pub struct PanelLayout {
    pub kind: PanelKind,
    pub title: &'static str,
    pub x_label: Option<&'static str>,
    pub y_label: &'static str,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    pub height_ratio: f32,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub panels: [PanelLayout; 3],
    pub target: (f64, f64),
    pub rubble: Vec<(f64, f64)>,
}

impl Scene {
    pub fn new(scene: &SceneConfig, signals: &SignalConfig) -> Self {
        let x_range = AxisRange::new(scene.x_min, scene.x_max);
        // Leave headroom above the drone cruise altitude
        let spatial_top = (scene.high_altitude + 2.0).max(10.0);

        let panels = [
            PanelLayout {
                kind: PanelKind::Spatial,
                title: "Drone Detection System",
                x_label: Some("X-Position"),
                y_label: "Altitude",
                x_range,
                y_range: AxisRange::new(0.0, spatial_top),
                height_ratio: 3.0,
            },
            PanelLayout {
                kind: PanelKind::Emi,
                title: "EMI Anomaly Detection",
                x_label: None,
                y_label: "EMI Signal",
                x_range,
                y_range: AxisRange::new(0.0, signals.emi_gain),
                height_ratio: 1.0,
            },
            PanelLayout {
                kind: PanelKind::Ert,
                title: "ERT Detection",
                x_label: Some("X-Position"),
                y_label: "ERT Signal",
                x_range,
                y_range: AxisRange::new(0.0, signals.ert_gain),
                height_ratio: 1.0,
            },
        ];

        Self {
            panels,
            target: (scene.target[0], scene.target[1]),
            rubble: scene.rubble.iter().map(|p| (p[0], p[1])).collect(),
        }
    }

    pub fn panel(&self, kind: PanelKind) -> &PanelLayout {
        // panels are stored in PanelKind order
        match kind {
            PanelKind::Spatial => &self.panels[0],
            PanelKind::Emi => &self.panels[1],
            PanelKind::Ert => &self.panels[2],
        }
    }
}
