//! Episode confirmation over the anomaly flag stream
//!
//! ```text
//!            anomalous                anomalous
//!   NORMAL ────────────▶ IN_RUN(1) ────────────▶ IN_RUN(n+1)
//!     ▲                      │                       │
//!     └──────────────────────┴───── not anomalous ───┘
//! ```
//!
//! Plain consecutive counter, no decay: one quiet sample ends the run.

use super::types::EpisodeVerdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Normal,
    InRun(u32),
}

impl RunState {
    pub fn run_length(&self) -> u32 {
        match self {
            RunState::Normal => 0,
            RunState::InRun(n) => *n,
        }
    }

    fn next(self, anomalous: bool) -> Self {
        match (self, anomalous) {
            (_, false) => RunState::Normal,
            (RunState::Normal, true) => RunState::InRun(1),
            (RunState::InRun(n), true) => RunState::InRun(n.saturating_add(1)),
        }
    }
}

/// Run-length counter with episode bookkeeping
#[derive(Debug, Clone)]
pub struct RunLengthCounter {
    duration_threshold: u32,
    state: RunState,
    position: usize,
    anomalous: usize,
    longest_run: u32,
    confirmed_at: Option<usize>,
}

impl RunLengthCounter {
    pub fn new(duration_threshold: u32) -> Self {
        Self {
            duration_threshold,
            state: RunState::Normal,
            position: 0,
            anomalous: 0,
            longest_run: 0,
            confirmed_at: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Feed the next flag, returning the run length ending at it
    pub fn push(&mut self, anomalous: bool) -> u32 {
        self.state = self.state.next(anomalous);
        let run = self.state.run_length();

        if anomalous {
            self.anomalous += 1;
        }
        self.longest_run = self.longest_run.max(run);
        if self.confirmed_at.is_none() && run >= self.duration_threshold {
            self.confirmed_at = Some(self.position);
        }

        self.position += 1;
        run
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }

    pub fn verdict(&self) -> EpisodeVerdict {
        EpisodeVerdict {
            confirmed: self.is_confirmed(),
            confirmed_at: self.confirmed_at,
            longest_run: self.longest_run,
            anomalous_samples: self.anomalous,
            total_samples: self.position,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.duration_threshold);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(flags: &[bool], threshold: u32) -> (Vec<u32>, EpisodeVerdict) {
        let mut counter = RunLengthCounter::new(threshold);
        let lengths = flags.iter().map(|f| counter.push(*f)).collect();
        (lengths, counter.verdict())
    }

    #[test]
    fn test_run_lengths_reset_on_false() {
        let (lengths, _) = run(&[true, true, false, true, false, false, true, true, true], 3);
        assert_eq!(lengths, vec![1, 2, 0, 1, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn test_threshold_boundary() {
        let (_, verdict) = run(&[false, true, true, false, true, true, false], 3);
        assert!(!verdict.confirmed);
        assert_eq!(verdict.longest_run, 2);

        let (_, verdict) = run(&[false, true, true, true, false], 3);
        assert!(verdict.confirmed);
        assert_eq!(verdict.confirmed_at, Some(3));
    }

    #[test]
    fn test_confirmed_at_is_first_crossing() {
        let (_, verdict) = run(&[true, true, true, true, false, true, true, true], 3);
        assert_eq!(verdict.confirmed_at, Some(2));
        assert_eq!(verdict.longest_run, 4);
        assert_eq!(verdict.anomalous_samples, 7);
        assert_eq!(verdict.total_samples, 8);
    }

    #[test]
    fn test_empty_stream_not_confirmed() {
        let (_, verdict) = run(&[], 3);
        assert_eq!(verdict, EpisodeVerdict::default());
    }

    #[test]
    fn test_state_transitions() {
        let mut counter = RunLengthCounter::new(1);
        assert_eq!(counter.state(), RunState::Normal);
        counter.push(true);
        assert_eq!(counter.state(), RunState::InRun(1));
        assert!(counter.is_confirmed());
        counter.push(false);
        assert_eq!(counter.state(), RunState::Normal);
        counter.reset();
        assert!(!counter.is_confirmed());
    }
}
