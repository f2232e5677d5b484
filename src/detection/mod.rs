//! Fall / unstable-gait detection core
//!
//! Pure, synchronous signal processing over one device's accelerometer
//! stream:
//!
//! ```text
//! RawSample ──extract──▶ Sample ──partition──▶ DeviceStream
//!                                                   │
//!          ┌────────────────────────────────────────┘
//!          ▼
//!   magnitude ─▶ RollingVariance ─┐
//!                                 ├─▶ AnomalyClassifier ─▶ RunLengthCounter ─▶ EpisodeVerdict
//!   DeltaScorer ──────────────────┘
//! ```
//!
//! Missing values propagate instead of being zero-filled, so sensor
//! dropouts can only suppress a detection, never cause one.

pub mod classifier;
pub mod episode;
pub mod evaluator;
pub mod features;
pub mod params;
pub mod scoring;
pub mod stream;
pub mod types;

pub use classifier::AnomalyClassifier;
pub use episode::{RunLengthCounter, RunState};
pub use evaluator::{detect, evaluate, StreamEvaluator, StreamReport};
pub use features::{extract_acceleration, RawSample};
pub use params::{DetectionParams, MAX_WINDOW_SIZE};
pub use scoring::{DeltaScorer, RollingVariance};
pub use stream::{partition_by_device, DeviceStream};
pub use types::{Acceleration, AxisDelta, EpisodeVerdict, Sample, ScoredSample};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    #[error("window_size must be at least 2, got {0}")]
    WindowTooSmall(usize),

    #[error("window_size must be at most {max}, got {value}")]
    WindowTooLarge { value: usize, max: usize },

    #[error("duration_threshold must be at least 1")]
    ZeroDuration,

    #[error("{name} must be a finite, non-negative number, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("stream for device {expected} contains a sample from device {found}")]
    MixedDevices { expected: String, found: String },
}
