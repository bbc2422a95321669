//! Session wall clock.

use std::time::Instant;

/// Seconds since the session started, sampled once per frame.
///
/// Samples never go backwards, even if a caller passes an earlier instant.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    start: Instant,
    last: f32,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { start, last: 0.0 }
    }

    pub fn elapsed(&mut self) -> f32 {
        self.elapsed_at(Instant::now())
    }

    pub fn elapsed_at(&mut self, now: Instant) -> f32 {
        let secs = now.saturating_duration_since(self.start).as_secs_f32();
        self.last = self.last.max(secs);
        self.last
    }

    /// Last value handed out.
    pub fn last(&self) -> f32 {
        self.last
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_starts_at_zero() {
        let start = Instant::now();
        let mut clock = SessionClock::starting_at(start);
        assert_eq!(clock.elapsed_at(start), 0.0);
    }

    #[test]
    fn test_measures_seconds() {
        let start = Instant::now();
        let mut clock = SessionClock::starting_at(start);
        let t = clock.elapsed_at(start + Duration::from_millis(1500));
        assert!((t - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_non_decreasing() {
        let start = Instant::now();
        let mut clock = SessionClock::starting_at(start);
        let mut previous = 0.0;
        for ms in [16, 33, 20, 50, 50, 10, 100] {
            let t = clock.elapsed_at(start + Duration::from_millis(ms));
            assert!(t >= previous);
            previous = t;
        }
        assert!((clock.last() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_instant_before_start_is_zero() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = SessionClock::starting_at(start);
        assert_eq!(clock.elapsed_at(Instant::now()), 0.0);
    }
}
