// src/models/frames.rs
//
// Evenly spaced sample positions, shared by the frame sequence and the signal tables

/// `count` values from `start` to `stop` inclusive. The last value is exactly `stop`.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
            values[count - 1] = stop;
            values
        }
    }
}

/// The fixed, monotonic sequence of frame values that drives the animation.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    values: Vec<f64>,
}

impl FrameSequence {
    pub fn new(start: f64, stop: f64, count: usize) -> Self {
        Self {
            values: linspace(start, stop, count),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}
