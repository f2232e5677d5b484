//! Per-sample anomaly classification

use super::params::DetectionParams;
use super::types::AxisDelta;

/// Axes that must jump together for the delta rule to fire
pub const MIN_AXES_OVER_THRESHOLD: usize = 2;

/// Flags a sample when the rolling variance is high or when at least two
/// axes jumped past the delta threshold. Missing inputs never satisfy a
/// comparison.
#[derive(Debug, Clone, Copy)]
pub struct AnomalyClassifier {
    var_threshold: f64,
    delta_threshold: f64,
}

impl AnomalyClassifier {
    pub fn new(var_threshold: f64, delta_threshold: f64) -> Self {
        Self { var_threshold, delta_threshold }
    }

    pub fn from_params(params: &DetectionParams) -> Self {
        Self::new(params.var_threshold, params.delta_threshold)
    }

    pub fn variance_exceeded(&self, variance: Option<f64>) -> bool {
        variance.is_some_and(|v| v > self.var_threshold)
    }

    pub fn axes_over_threshold(&self, delta: &AxisDelta) -> usize {
        delta
            .axes()
            .iter()
            .filter(|d| matches!(d, Some(v) if *v > self.delta_threshold))
            .count()
    }

    pub fn classify(&self, variance: Option<f64>, delta: &AxisDelta) -> bool {
        self.variance_exceeded(variance)
            || self.axes_over_threshold(delta) >= MIN_AXES_OVER_THRESHOLD
    }
}

impl Default for AnomalyClassifier {
    fn default() -> Self {
        Self::from_params(&DetectionParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(x: f64, y: f64, z: f64) -> AxisDelta {
        AxisDelta { x: Some(x), y: Some(y), z: Some(z) }
    }

    #[test]
    fn test_variance_rule() {
        let c = AnomalyClassifier::default();
        assert!(c.classify(Some(0.51), &AxisDelta::MISSING));
        assert!(!c.classify(Some(0.5), &AxisDelta::MISSING)); // strictly greater
        assert!(!c.classify(None, &AxisDelta::MISSING));
    }

    #[test]
    fn test_delta_rule_needs_two_axes() {
        let c = AnomalyClassifier::default();
        assert!(!c.classify(None, &delta(5.0, 0.1, 0.1)));
        assert!(c.classify(None, &delta(0.7, 0.7, 0.1)));
        assert!(c.classify(None, &delta(0.7, 0.7, 0.7)));
        assert!(!c.classify(None, &delta(0.6, 0.6, 0.6))); // strictly greater
    }

    #[test]
    fn test_missing_axis_does_not_count() {
        let c = AnomalyClassifier::default();
        let d = AxisDelta { x: Some(1.0), y: None, z: None };
        assert_eq!(c.axes_over_threshold(&d), 1);
        assert!(!c.classify(None, &d));
    }

    #[test]
    fn test_custom_thresholds() {
        let c = AnomalyClassifier::new(2.0, 0.1);
        assert!(!c.classify(Some(1.5), &delta(0.2, 0.0, 0.0)));
        assert!(c.classify(Some(1.5), &delta(0.2, 0.2, 0.0)));
    }
}
