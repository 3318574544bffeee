// src/models/signal.rs
//
// Precomputed synthetic sensor curves. Built once, read-only during playback.

use super::frames::linspace;
use super::trace::Trace;
use crate::config::{SceneConfig, SignalConfig};

#[derive(Debug, Clone)]
pub struct SignalTable {
    xs: Vec<f64>,
    values: Vec<f64>,
}

impl SignalTable {
    /// `gain * exp(-(x - center)^2 / width)` sampled at `xs`.
    pub fn gaussian(xs: Vec<f64>, center: f64, width: f64, gain: f64) -> Self {
        let values = xs
            .iter()
            .map(|x| (-(x - center).powi(2) / width).exp() * gain)
            .collect();
        Self { xs, values }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// The first `count` samples as a trace, clamped to the table length.
    pub fn reveal(&self, count: usize) -> Trace {
        let count = count.min(self.len());
        Trace::new(self.xs[..count].to_vec(), self.values[..count].to_vec())
    }
}

/// The EMI and ERT tables, both centred on the buried target.
#[derive(Debug, Clone)]
pub struct SignalTables {
    pub emi: SignalTable,
    pub ert: SignalTable,
}

impl SignalTables {
    pub fn new(scene: &SceneConfig, signals: &SignalConfig) -> Self {
        let xs = linspace(scene.x_min, scene.x_max, signals.samples);
        let center = scene.target[0];
        Self {
            emi: SignalTable::gaussian(xs.clone(), center, signals.emi_width, signals.emi_gain),
            ert: SignalTable::gaussian(xs, center, signals.ert_width, signals.ert_gain),
        }
    }
}
