//! Behavioural properties of the detection core

use serde_json::json;

use stickwatch_cloud::detection::{
    detect, evaluate, partition_by_device, Acceleration, DetectionParams, DeviceStream, RawSample,
    Sample,
};

const STICK: &str = "STICK-001";

fn stream(points: &[Acceleration]) -> DeviceStream {
    let samples = points
        .iter()
        .enumerate()
        .map(|(i, a)| Sample::new(STICK, 1_700_000_000_000 + i as i64 * 250, *a))
        .collect();
    DeviceStream::new(STICK, samples).unwrap()
}

fn rest() -> Acceleration {
    Acceleration::new(0.0, 0.0, 1.0)
}

fn jolt() -> Acceleration {
    Acceleration::new(1.0, 1.0, 1.0)
}

/// Readings that alternate jolt/rest over `range`. Every sample in the
/// range jumps on two axes; with an even-length range the reading after it
/// is at rest again, so the run is exactly `range.len()` long.
fn wobble(len: usize, range: std::ops::Range<usize>) -> Vec<Acceleration> {
    let mut points = vec![rest(); len];
    for (n, i) in range.enumerate() {
        points[i] = if n % 2 == 0 { jolt() } else { rest() };
    }
    points
}

#[test]
fn test_stream_shorter_than_window_never_has_variance() {
    let params = DetectionParams::default();
    let points: Vec<Acceleration> = (0..params.window_size - 1)
        .map(|i| Acceleration::new(0.0, 0.0, (i * 10) as f64))
        .collect();

    let report = evaluate(&stream(&points), &params);
    assert!(report.samples.iter().all(|s| s.variance.is_none()));
    assert!(report.samples.iter().all(|s| !s.is_anomalous));
}

#[test]
fn test_constant_acceleration_is_never_anomalous() {
    let points = vec![Acceleration::new(0.3, -0.7, 9.81); 40];
    let report = evaluate(&stream(&points), &DetectionParams::default());

    for s in report.samples.iter().skip(7) {
        assert!(s.variance.unwrap().abs() < 1e-12);
    }
    assert!(report.samples.iter().all(|s| !s.is_anomalous));
    assert!(!report.verdict.confirmed);
}

#[test]
fn test_magnitude_spike_at_end_of_window() {
    // magnitudes 1.0 x7 then 5.0
    let mut points = vec![rest(); 7];
    points.push(Acceleration::new(0.0, 0.0, 5.0));

    let report = evaluate(&stream(&points), &DetectionParams::default());
    let last = &report.samples[7];

    assert!(last.variance.unwrap() > 0.5);
    assert!(last.is_anomalous);
    assert_eq!(last.run_length, 1);
    assert!(!report.verdict.confirmed);
}

#[test]
fn test_four_sample_wobble_confirms_at_third_sample() {
    let points = wobble(10, 4..8);
    let report = evaluate(&stream(&points), &DetectionParams::default());

    let flags: Vec<bool> = report.samples.iter().map(|s| s.is_anomalous).collect();
    assert_eq!(
        flags,
        vec![false, false, false, false, true, true, true, true, false, false]
    );

    let runs: Vec<u32> = report.samples.iter().map(|s| s.run_length).collect();
    assert_eq!(runs, vec![0, 0, 0, 0, 1, 2, 3, 4, 0, 0]);

    assert!(report.verdict.confirmed);
    assert_eq!(report.verdict.confirmed_at, Some(6));
    assert_eq!(report.verdict.longest_run, 4);
}

#[test]
fn test_duration_threshold_boundary() {
    let params = DetectionParams {
        duration_threshold: 4,
        // keep the variance term out of the picture
        window_size: 64,
        ..Default::default()
    };

    // run of exactly duration - 1, ended by a dropout
    let mut below = vec![rest(); 12];
    below[3] = jolt();
    below[5] = jolt();
    below[6] = Acceleration::MISSING;
    let report = evaluate(&stream(&below), &params);
    assert_eq!(report.verdict.longest_run, 3);
    assert!(!report.verdict.confirmed);

    // run of exactly duration
    let exact = wobble(12, 3..7);
    let report = evaluate(&stream(&exact), &params);
    assert_eq!(report.verdict.longest_run, 4);
    assert!(report.verdict.confirmed);
}

#[test]
fn test_isolated_spikes_never_confirm() {
    // one jolt every few samples: each produces a run of 2 (up, then down)
    let mut points = vec![rest(); 30];
    for i in [3, 10, 17, 24] {
        points[i] = jolt();
    }
    let params = DetectionParams { window_size: 64, ..Default::default() };
    let report = evaluate(&stream(&points), &params);

    assert_eq!(report.verdict.longest_run, 2);
    assert!(!report.verdict.confirmed);
}

#[test]
fn test_evaluation_is_idempotent() {
    let points = wobble(24, 6..12);
    let s = stream(&points);
    let params = DetectionParams::default();

    let first = evaluate(&s, &params);
    let second = evaluate(&s, &params);
    assert_eq!(first, second);
    assert_eq!(detect(&s, &params), first.verdict);
}

#[test]
fn test_missing_reading_breaks_run_like_a_quiet_one() {
    let params = DetectionParams { window_size: 64, ..Default::default() };

    let mut with_missing = wobble(12, 2..10);
    with_missing[5] = Acceleration::MISSING;
    let missing_runs: Vec<u32> = evaluate(&stream(&with_missing), &params)
        .samples
        .iter()
        .map(|s| s.run_length)
        .collect();

    // missing reading: its own deltas and the next sample's deltas are missing
    assert_eq!(missing_runs[5], 0);
    assert_eq!(missing_runs[6], 0);
    assert!(missing_runs[..5].iter().all(|r| *r <= 3));
    assert_eq!(missing_runs[7], 1);

    // same shape with an explicit quiet reading (a repeat of the previous one)
    let mut with_quiet = wobble(12, 2..10);
    with_quiet[5] = with_quiet[4];
    let quiet_runs: Vec<u32> = evaluate(&stream(&with_quiet), &params)
        .samples
        .iter()
        .map(|s| s.run_length)
        .collect();

    assert_eq!(missing_runs, quiet_runs);
}

#[test]
fn test_malformed_records_never_add_anomalies() {
    // a stick that only ever uploads garbage
    let batch: Vec<Sample> = (0..20)
        .map(|i| {
            let imu = if i % 2 == 0 {
                json!({"accelerometer": {"x": "oops", "y": "1", "z": "1"}})
            } else {
                json!({"gyroscope": {}})
            };
            RawSample::new(STICK, i * 100, imu).extract()
        })
        .collect();

    let streams = partition_by_device(batch);
    let report = evaluate(&streams[0], &DetectionParams::default());

    assert!(report.samples.iter().all(|s| s.magnitude.is_none()));
    assert!(report.samples.iter().all(|s| s.variance.is_none()));
    assert!(report.samples.iter().all(|s| !s.is_anomalous));
}

#[test]
fn test_variance_term_alone_confirms_sustained_instability() {
    // magnitude swings on a single axis: the delta rule never fires,
    // the variance rule does once the window fills
    let points: Vec<Acceleration> = (0..16)
        .map(|i| Acceleration::new(0.0, 0.0, if i % 2 == 0 { 1.0 } else { 3.0 }))
        .collect();
    let report = evaluate(&stream(&points), &DetectionParams::default());

    assert!(report.samples[..7].iter().all(|s| !s.is_anomalous));
    assert!(report.samples[7..].iter().all(|s| s.is_anomalous));
    assert_eq!(report.verdict.confirmed_at, Some(9));
}
