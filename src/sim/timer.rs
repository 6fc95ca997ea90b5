//! Timers owned by the session
//!
//! Both timers are driven by the session rather than by host callbacks, so
//! pausing can never leave a stale callback behind:
//! - `PeriodicTimer`: wall-clock periodic task (the HUD countdown)
//! - `OneShot`: frame-counted lock that a new action replaces (last writer wins)

use serde::{Deserialize, Serialize};

/// Periodic timer with idempotent start/stop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodicTimer {
    period: f32,
    accumulated: f32,
    running: bool,
}

impl PeriodicTimer {
    pub fn new(period: f32) -> Self {
        Self {
            period: period.max(f32::EPSILON),
            accumulated: 0.0,
            running: false,
        }
    }

    /// Start (or restart) the timer with a fresh period.
    /// Any partial period from a previous run is discarded.
    pub fn start(&mut self) {
        self.accumulated = 0.0;
        self.running = true;
    }

    /// Stop the timer; a no-op when already stopped
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulated = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feed elapsed wall-clock seconds; returns how many periods fired
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        if !self.running || !(elapsed > 0.0) {
            return 0;
        }
        self.accumulated += elapsed;
        let mut fired = 0;
        while self.accumulated >= self.period {
            self.accumulated -= self.period;
            fired += 1;
        }
        fired
    }
}

/// One-shot lock measured in simulation ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneShot {
    remaining: u32,
}

impl OneShot {
    /// Arm for `ticks`, replacing whatever was pending
    pub fn arm(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    pub fn cancel(&mut self) {
        self.remaining = 0;
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Count down one tick; true exactly on the tick the lock expires
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periodic_fires_once_per_period() {
        let mut timer = PeriodicTimer::new(1.0);
        timer.start();
        assert_eq!(timer.advance(0.5), 0);
        assert_eq!(timer.advance(0.5), 1);
        assert_eq!(timer.advance(2.25), 2);
        assert_eq!(timer.advance(0.75), 1);
    }

    #[test]
    fn test_periodic_stopped_never_fires() {
        let mut timer = PeriodicTimer::new(1.0);
        assert_eq!(timer.advance(10.0), 0);
        timer.start();
        timer.stop();
        timer.stop();
        assert!(!timer.is_running());
        assert_eq!(timer.advance(10.0), 0);
    }

    #[test]
    fn test_restart_discards_partial_period() {
        let mut timer = PeriodicTimer::new(1.0);
        timer.start();
        assert_eq!(timer.advance(0.9), 0);
        timer.start();
        assert!(timer.is_running());
        // The earlier 0.9s is gone; no double scheduling
        assert_eq!(timer.advance(0.2), 0);
        assert_eq!(timer.advance(0.8), 1);
    }

    #[test]
    fn test_periodic_ignores_bad_elapsed() {
        let mut timer = PeriodicTimer::new(1.0);
        timer.start();
        assert_eq!(timer.advance(-5.0), 0);
        assert_eq!(timer.advance(f32::NAN), 0);
        assert_eq!(timer.advance(1.0), 1);
    }

    #[test]
    fn test_one_shot_last_writer_wins() {
        let mut lock = OneShot::default();
        lock.arm(3);
        assert!(!lock.tick());
        // New action before expiry replaces the pending lock
        lock.arm(3);
        assert!(!lock.tick());
        assert!(!lock.tick());
        assert!(lock.is_active());
        assert!(lock.tick());
        assert!(!lock.is_active());
        // Expired lock stays quiet
        assert!(!lock.tick());
    }

    #[test]
    fn test_one_shot_cancel() {
        let mut lock = OneShot::default();
        lock.arm(10);
        lock.cancel();
        assert!(!lock.is_active());
        assert!(!lock.tick());
    }
}
