//! Magnitude, rolling variance and delta scoring
//!
//! Both scorers are streaming accumulators: state is bounded by the
//! window size and nothing is allocated after construction.

use super::types::{Acceleration, AxisDelta};

// ============================================================================
// ROLLING VARIANCE
// ============================================================================

/// Sample variance over the last `window_size` magnitudes.
///
/// The window is a fixed circular buffer. A missing magnitude anywhere in
/// the window makes the window's variance missing.
#[derive(Debug, Clone)]
pub struct RollingVariance {
    window: Box<[Option<f64>]>,
    head: usize,
    filled: usize,
}

impl RollingVariance {
    /// `window_size` must be at least 2 (see `DetectionParams::validate`)
    pub fn new(window_size: usize) -> Self {
        Self {
            window: vec![None; window_size].into_boxed_slice(),
            head: 0,
            filled: 0,
        }
    }

    pub fn window_size(&self) -> usize {
        self.window.len()
    }

    /// Push the next magnitude and return the variance of the window ending at it
    pub fn push(&mut self, magnitude: Option<f64>) -> Option<f64> {
        let size = self.window.len();
        if size == 0 {
            return None;
        }

        self.window[self.head] = magnitude;
        self.head = (self.head + 1) % size;
        if self.filled < size {
            self.filled += 1;
        }

        self.variance()
    }

    /// Variance of the current window, if the window is full and complete
    pub fn variance(&self) -> Option<f64> {
        let size = self.window.len();
        if size < 2 || self.filled < size {
            return None;
        }

        let mut sum = 0.0;
        for value in self.window.iter() {
            sum += (*value)?;
        }
        let mean = sum / size as f64;

        let squares: f64 = self
            .window
            .iter()
            .flatten()
            .map(|v| (v - mean).powi(2))
            .sum();

        Some(squares / (size - 1) as f64)
    }

    pub fn reset(&mut self) {
        self.window.iter_mut().for_each(|v| *v = None);
        self.head = 0;
        self.filled = 0;
    }
}

// ============================================================================
// DELTA
// ============================================================================

/// Absolute per-axis change between consecutive readings
#[derive(Debug, Clone, Default)]
pub struct DeltaScorer {
    previous: Option<Acceleration>,
}

impl DeltaScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score `current` against the previous reading, then remember it
    pub fn push(&mut self, current: Acceleration) -> AxisDelta {
        let delta = match self.previous {
            Some(prev) => AxisDelta {
                x: abs_diff(current.x, prev.x),
                y: abs_diff(current.y, prev.y),
                z: abs_diff(current.z, prev.z),
            },
            None => AxisDelta::MISSING,
        };

        self.previous = Some(current);
        delta
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }
}

fn abs_diff(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    Some((current? - previous?).abs())
}
