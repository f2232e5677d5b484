//! Detection tuning parameters

use serde::{Deserialize, Serialize};

use super::DetectionError;

pub const DEFAULT_WINDOW_SIZE: usize = 8;
pub const DEFAULT_VAR_THRESHOLD: f64 = 0.5;
pub const DEFAULT_DELTA_THRESHOLD: f64 = 0.6;
pub const DEFAULT_DURATION_THRESHOLD: u32 = 3;

/// Upper bound on the variance window; the buffer is allocated up front
pub const MAX_WINDOW_SIZE: usize = 4096;

/// Tunable knobs of the detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionParams {
    /// Number of consecutive magnitudes in the rolling variance window
    pub window_size: usize,

    /// Rolling variance above this marks a sample anomalous
    pub var_threshold: f64,

    /// Per-axis delta above this counts toward the two-axis rule
    pub delta_threshold: f64,

    /// Consecutive anomalous samples required to confirm an episode
    pub duration_threshold: u32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            var_threshold: DEFAULT_VAR_THRESHOLD,
            delta_threshold: DEFAULT_DELTA_THRESHOLD,
            duration_threshold: DEFAULT_DURATION_THRESHOLD,
        }
    }
}

impl DetectionParams {
    /// Reject parameter sets the detector cannot run with
    pub fn validate(&self) -> Result<(), DetectionError> {
        if self.window_size < 2 {
            return Err(DetectionError::WindowTooSmall(self.window_size));
        }
        if self.window_size > MAX_WINDOW_SIZE {
            return Err(DetectionError::WindowTooLarge {
                value: self.window_size,
                max: MAX_WINDOW_SIZE,
            });
        }
        if self.duration_threshold == 0 {
            return Err(DetectionError::ZeroDuration);
        }
        check_threshold("var_threshold", self.var_threshold)?;
        check_threshold("delta_threshold", self.delta_threshold)?;
        Ok(())
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), DetectionError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DetectionError::InvalidThreshold { name, value });
    }
    Ok(())
}
