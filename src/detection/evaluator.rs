//! Streaming evaluation of one device stream
//!
//! Chains the scorers, classifier and run-length counter. A single
//! left-to-right pass, no I/O, no shared state.

use serde::Serialize;

use super::classifier::AnomalyClassifier;
use super::episode::RunLengthCounter;
use super::params::DetectionParams;
use super::scoring::{DeltaScorer, RollingVariance};
use super::stream::DeviceStream;
use super::types::{Acceleration, EpisodeVerdict, ScoredSample};

/// Incremental evaluator, fed one reading at a time in timestamp order
#[derive(Debug, Clone)]
pub struct StreamEvaluator {
    variance: RollingVariance,
    delta: DeltaScorer,
    classifier: AnomalyClassifier,
    runs: RunLengthCounter,
}

impl StreamEvaluator {
    pub fn new(params: &DetectionParams) -> Self {
        Self {
            variance: RollingVariance::new(params.window_size),
            delta: DeltaScorer::new(),
            classifier: AnomalyClassifier::from_params(params),
            runs: RunLengthCounter::new(params.duration_threshold),
        }
    }

    pub fn push(&mut self, timestamp: i64, acceleration: Acceleration) -> ScoredSample {
        let magnitude = acceleration.magnitude();
        let variance = self.variance.push(magnitude);
        let delta = self.delta.push(acceleration);
        let is_anomalous = self.classifier.classify(variance, &delta);
        let run_length = self.runs.push(is_anomalous);

        ScoredSample {
            timestamp,
            acceleration,
            magnitude,
            variance,
            delta,
            is_anomalous,
            run_length,
        }
    }

    pub fn verdict(&self) -> EpisodeVerdict {
        self.runs.verdict()
    }

    pub fn reset(&mut self) {
        self.variance.reset();
        self.delta.reset();
        self.runs.reset();
    }
}

/// Full per-sample trace of an evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamReport {
    pub device_id: String,
    pub samples: Vec<ScoredSample>,
    pub verdict: EpisodeVerdict,
}

/// Evaluate a stream and keep every scored sample
pub fn evaluate(stream: &DeviceStream, params: &DetectionParams) -> StreamReport {
    let mut evaluator = StreamEvaluator::new(params);
    let samples = stream
        .samples()
        .iter()
        .map(|s| evaluator.push(s.timestamp, s.acceleration))
        .collect();

    StreamReport {
        device_id: stream.device_id().to_string(),
        samples,
        verdict: evaluator.verdict(),
    }
}

/// Evaluate a stream for its verdict only, without materializing scores
pub fn detect(stream: &DeviceStream, params: &DetectionParams) -> EpisodeVerdict {
    let mut evaluator = StreamEvaluator::new(params);
    for sample in stream.samples() {
        evaluator.push(sample.timestamp, sample.acceleration);
    }
    evaluator.verdict()
}
