//! Tick-driven timers for the connected state.
//!
//! Both timers advance only when the session ticks, by the `dt` the tick
//! reports, so tests can drive them without any real clock.

use std::time::Duration;

/// Fires up to `max_attempts` times, `interval` apart, after each arming.
#[derive(Debug, Clone)]
pub struct ResyncTimer {
    interval: Duration,
    max_attempts: u32,
    armed: bool,
    elapsed: Duration,
    attempts: u32,
}

impl ResyncTimer {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            armed: false,
            elapsed: Duration::ZERO,
            attempts: 0,
        }
    }

    /// Starts (or restarts) the sequence from attempt 1.
    pub fn arm(&mut self) {
        self.armed = self.max_attempts > 0;
        self.elapsed = Duration::ZERO;
        self.attempts = 0;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Advances by `dt`; returns the attempt number if one is due.
    ///
    /// At most one attempt fires per call, even after a long stall.
    pub fn advance(&mut self, dt: Duration) -> Option<u32> {
        if !self.armed {
            return None;
        }
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return None;
        }
        self.elapsed = Duration::ZERO;
        self.attempts += 1;
        if self.attempts >= self.max_attempts {
            self.armed = false;
        }
        Some(self.attempts)
    }
}

/// One-shot timeout for the first item delta after the handshake.
#[derive(Debug, Clone)]
pub struct ItemsWaitTimer {
    timeout: Duration,
    waiting: bool,
    elapsed: Duration,
}

impl ItemsWaitTimer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            waiting: false,
            elapsed: Duration::ZERO,
        }
    }

    pub fn start(&mut self) {
        self.waiting = true;
        self.elapsed = Duration::ZERO;
    }

    /// The delta arrived; the timeout no longer applies.
    pub fn satisfy(&mut self) {
        self.waiting = false;
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Advances by `dt`; returns `true` exactly once, when the timeout
    /// expires.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.waiting {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.timeout {
            self.waiting = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(500);

    #[test]
    fn test_resync_fires_three_times_then_stops() {
        let mut timer = ResyncTimer::new(Duration::from_secs(2), 3);
        timer.arm();

        let fired: Vec<u32> = (0..40).filter_map(|_| timer.advance(STEP)).collect();
        assert_eq!(fired, vec![1, 2, 3]);
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_resync_rearm_restarts_sequence() {
        let mut timer = ResyncTimer::new(Duration::from_secs(2), 3);
        timer.arm();
        assert_eq!(timer.advance(Duration::from_secs(2)), Some(1));
        timer.arm();
        assert_eq!(timer.advance(Duration::from_secs(1)), None);
        assert_eq!(timer.advance(Duration::from_secs(1)), Some(1));
    }

    #[test]
    fn test_resync_unarmed_never_fires() {
        let mut timer = ResyncTimer::new(Duration::from_secs(2), 3);
        assert_eq!(timer.advance(Duration::from_secs(60)), None);
    }

    #[test]
    fn test_items_wait_expires_once() {
        let mut timer = ItemsWaitTimer::new(Duration::from_secs(5));
        timer.start();
        let expiries = (0..20).filter(|_| timer.advance(STEP)).count();
        assert_eq!(expiries, 1);
        assert!(!timer.is_waiting());
    }

    #[test]
    fn test_items_wait_satisfied_never_expires() {
        let mut timer = ItemsWaitTimer::new(Duration::from_secs(5));
        timer.start();
        timer.advance(Duration::from_secs(4));
        timer.satisfy();
        assert!(!timer.advance(Duration::from_secs(10)));
    }
}
