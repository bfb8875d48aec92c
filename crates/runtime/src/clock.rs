use std::time::{Duration, Instant};

/// Wall-clock timer for the render loop.
///
/// Started at creation. Each [`delta`](Self::delta) returns the time since
/// the previous call (or since start for the first call). Monotonic, so a
/// delta is never negative.
#[derive(Debug, Clone)]
pub struct Clock {
    last: Instant,
    elapsed: Duration,
    running: bool,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            elapsed: Duration::ZERO,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Restart timing from now and reset the elapsed total.
    pub fn start(&mut self) {
        self.last = Instant::now();
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    /// Freeze the clock. A stopped clock reports zero delta.
    pub fn stop(&mut self) {
        if self.running {
            self.delta();
            self.running = false;
        }
    }

    /// Time since the previous call.
    pub fn delta(&mut self) -> Duration {
        self.delta_at(Instant::now())
    }

    /// Total time accumulated through [`delta`](Self::delta) calls.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub(crate) fn delta_at(&mut self, now: Instant) -> Duration {
        if !self.running {
            return Duration::ZERO;
        }
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        self.elapsed += dt;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_reflects_time_between_calls() {
        let mut clock = Clock::new();
        let t0 = clock.last;
        assert_eq!(clock.delta_at(t0 + Duration::from_millis(16)), Duration::from_millis(16));
        assert_eq!(clock.delta_at(t0 + Duration::from_millis(50)), Duration::from_millis(34));
        assert_eq!(clock.elapsed(), Duration::from_millis(50));
    }

    #[test]
    fn delta_is_never_negative() {
        let mut clock = Clock::new();
        let t0 = clock.last;
        clock.delta_at(t0 + Duration::from_millis(10));
        // An instant earlier than the last sample saturates to zero.
        assert_eq!(clock.delta_at(t0), Duration::ZERO);
    }

    #[test]
    fn real_delta_advances() {
        let mut clock = Clock::new();
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.delta() >= Duration::from_millis(5));
        assert!(clock.delta() < Duration::from_secs(1));
    }

    #[test]
    fn stopped_clock_reports_zero() {
        let mut clock = Clock::new();
        clock.stop();
        assert!(!clock.is_running());
        let frozen = clock.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(clock.delta(), Duration::ZERO);
        assert_eq!(clock.elapsed(), frozen);

        clock.start();
        assert!(clock.is_running());
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }
}
