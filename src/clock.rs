//! Frame clock that can be paused while the window is unfocused

use std::time::Instant;

/// Measures the time between frames
///
/// While stopped, [`FrameClock::delta`] returns zero. Starting again resets
/// the reference point, so the paused interval never shows up as a delta.
#[derive(Debug, Clone)]
pub struct FrameClock {
    auto_start: bool,
    running: bool,
    old_time: Option<Instant>,
    elapsed: f32,
}

impl FrameClock {
    /// A clock that starts itself on the first `delta` call
    pub fn new() -> Self {
        Self {
            auto_start: true,
            running: false,
            old_time: None,
            elapsed: 0.0,
        }
    }

    /// A clock that stays stopped until [`FrameClock::start`]
    pub fn manual() -> Self {
        Self {
            auto_start: false,
            ..Self::new()
        }
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        self.old_time = Some(now);
        self.elapsed = 0.0;
        self.running = true;
    }

    /// Stops the clock, folding the time up to now into `elapsed`
    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    pub fn stop_at(&mut self, now: Instant) {
        if self.running {
            self.delta_at(now);
        }
        self.running = false;
        self.auto_start = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds accumulated while running since the last start
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds since the previous call, zero while stopped
    pub fn delta(&mut self) -> f32 {
        self.delta_at(Instant::now())
    }

    pub fn delta_at(&mut self, now: Instant) -> f32 {
        if self.auto_start && !self.running {
            self.start_at(now);
            return 0.0;
        }
        if !self.running {
            return 0.0;
        }

        let delta = self
            .old_time
            .map(|old| now.saturating_duration_since(old).as_secs_f32())
            .unwrap_or(0.0);
        self.old_time = Some(now);
        self.elapsed += delta;
        delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    #[test]
    fn test_auto_start_on_first_delta() {
        let base = Instant::now();
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta_at(base), 0.0);
        assert!(clock.is_running());
        assert!((clock.delta_at(at(base, 16)) - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_stopped_clock_returns_zero() {
        let base = Instant::now();
        let mut clock = FrameClock::new();
        clock.start_at(base);
        clock.stop_at(at(base, 100));

        assert_eq!(clock.delta_at(at(base, 500)), 0.0);
        assert!(!clock.is_running());
        assert!((clock.elapsed() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_restart_does_not_jump() {
        let base = Instant::now();
        let mut clock = FrameClock::new();
        clock.start_at(base);
        clock.delta_at(at(base, 16));
        clock.stop_at(at(base, 20));

        clock.start_at(at(base, 5_000));
        let delta = clock.delta_at(at(base, 5_016));
        assert!((delta - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_manual_clock_waits_for_start() {
        let base = Instant::now();
        let mut clock = FrameClock::manual();
        assert_eq!(clock.delta_at(base), 0.0);
        assert!(!clock.is_running());
    }
}
