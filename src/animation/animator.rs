// src/animation/animator.rs
//
// The per-frame update: moves the drone, reveals the signal curves and
// deploys the probes once the drone is past the detection threshold.

use serde::Serialize;

use crate::config::SceneConfig;
use crate::models::{SignalTables, Trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Searching,
    Probing,
}

impl Phase {
    pub fn at(frame: f64, threshold: f64) -> Self {
        if frame < threshold {
            Phase::Searching
        } else {
            Phase::Probing
        }
    }
}

/// Visible data of every mutable artifact for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameState {
    pub frame: f64,
    pub phase: Phase,
    pub drone: Trace,
    pub probes: [Trace; 2],
    pub emi: Trace,
    pub ert: Trace,
}

impl FrameState {
    fn empty() -> Self {
        Self {
            frame: 0.0,
            phase: Phase::Searching,
            drone: Trace::hidden(),
            probes: [Trace::hidden(), Trace::hidden()],
            emi: Trace::hidden(),
            ert: Trace::hidden(),
        }
    }

    pub fn drone_position(&self) -> (f64, f64) {
        (self.drone.xs[0], self.drone.ys[0])
    }

    pub fn emi_revealed(&self) -> usize {
        self.emi.finite_points().count()
    }

    pub fn ert_revealed(&self) -> usize {
        self.ert.finite_points().count()
    }
}

pub struct Animator {
    signals: SignalTables,
    threshold: f64,
    high_altitude: f64,
    low_altitude: f64,
    probes: [(f64, f64); 2],
    x_min: f64,
    samples_per_unit: f64,
    state: FrameState,
}

impl Animator {
    pub fn new(scene: &SceneConfig, signals: SignalTables) -> Self {
        let span = scene.x_max - scene.x_min;
        let samples_per_unit = if span > 0.0 {
            signals.emi.len() as f64 / span
        } else {
            0.0
        };

        Self {
            threshold: scene.threshold,
            high_altitude: scene.high_altitude,
            low_altitude: scene.low_altitude,
            probes: [
                (scene.probes[0][0], scene.probes[0][1]),
                (scene.probes[1][0], scene.probes[1][1]),
            ],
            x_min: scene.x_min,
            samples_per_unit,
            signals,
            state: FrameState::empty(),
        }
    }

    pub fn altitude(&self, frame: f64) -> f64 {
        match Phase::at(frame, self.threshold) {
            Phase::Searching => self.high_altitude,
            Phase::Probing => self.low_altitude,
        }
    }

    /// Number of leading table samples visible at `frame`, never more than the table holds.
    pub fn reveal_count(&self, frame: f64) -> usize {
        let count = ((frame - self.x_min) * self.samples_per_unit).floor();
        if count.is_nan() || count <= 0.0 {
            return 0;
        }
        (count as usize).min(self.signals.emi.len())
    }

    /// Overwrites every mutable artifact for `frame` and returns the new state.
    pub fn update(&mut self, frame: f64) -> &FrameState {
        let phase = Phase::at(frame, self.threshold);
        if self.state.phase == Phase::Searching && phase == Phase::Probing {
            // recurs on every playback loop
            log::debug!("Anomaly reached at x = {:.2}, deploying ERT probes", frame);
        }

        let count = self.reveal_count(frame);

        self.state.frame = frame;
        self.state.phase = phase;
        self.state.drone = Trace::point(frame, self.altitude(frame));
        self.state.emi = self.signals.emi.reveal(count);

        match phase {
            Phase::Searching => {
                self.state.probes = [Trace::hidden(), Trace::hidden()];
                self.state.ert = Trace::hidden();
            }
            Phase::Probing => {
                let [(x1, y1), (x2, y2)] = self.probes;
                self.state.probes = [Trace::point(x1, y1), Trace::point(x2, y2)];
                self.state.ert = self.signals.ert.reveal(count);
            }
        }

        &self.state
    }
}
