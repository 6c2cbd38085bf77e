//! Dwell timing for merge and hover-open gestures.

use std::time::{Duration, Instant};

/// Measures how long the pointer has stayed on the same merge candidate.
///
/// Switching candidates restarts the clock at zero.
#[derive(Debug, Clone, Default)]
pub struct DwellTracker {
    candidate: Option<usize>,
    since: Option<Instant>,
}

impl DwellTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the pointer is over `candidate` at `now`.
    ///
    /// Returns the time spent on it so far.
    pub fn observe(&mut self, candidate: usize, now: Instant) -> Duration {
        if self.candidate != Some(candidate) {
            tracing::trace!(candidate, "dwell candidate changed");
            self.candidate = Some(candidate);
            self.since = Some(now);
        }
        self.elapsed(now)
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.since
            .map(|since| now.saturating_duration_since(since))
            .unwrap_or_default()
    }

    pub fn candidate(&self) -> Option<usize> {
        self.candidate
    }

    pub fn clear(&mut self) {
        self.candidate = None;
        self.since = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dwell_accumulates_on_same_candidate() {
        let start = Instant::now();
        let mut dwell = DwellTracker::new();
        assert_eq!(dwell.observe(2, start), Duration::ZERO);
        assert_eq!(
            dwell.observe(2, start + Duration::from_millis(250)),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_switching_candidate_resets() {
        let start = Instant::now();
        let mut dwell = DwellTracker::new();
        dwell.observe(1, start);
        let later = start + Duration::from_millis(400);
        assert_eq!(dwell.observe(3, later), Duration::ZERO);
        assert_eq!(dwell.candidate(), Some(3));
    }

    #[test]
    fn test_clear() {
        let start = Instant::now();
        let mut dwell = DwellTracker::new();
        dwell.observe(1, start);
        dwell.clear();
        assert!(dwell.candidate().is_none());
        assert_eq!(dwell.elapsed(start + Duration::from_secs(1)), Duration::ZERO);
    }
}
