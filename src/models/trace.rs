// src/models/trace.rs
//
// The (x, y) data held by a plot artifact

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Trace {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        debug_assert_eq!(xs.len(), ys.len());
        Self { xs, ys }
    }

    pub fn point(x: f64, y: f64) -> Self {
        Self {
            xs: vec![x],
            ys: vec![y],
        }
    }

    /// A single non-plottable point. Renderers draw nothing for it.
    pub fn hidden() -> Self {
        Self::point(f64::NAN, f64::NAN)
    }

    pub fn is_hidden(&self) -> bool {
        self.finite_points().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    pub fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}
