//! Cooperative Scheduler
//!
//! Fixed-interval tick clock. The application root polls it with the
//! current time and runs the script's scheduler interrupt when it is due.

use std::time::{Duration, Instant};

/// Periodic tick clock
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    next_due: Option<Instant>,
    ticks: u64,
}

impl Scheduler {
    /// A stopped scheduler
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            ticks: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start ticking; the first tick is due one interval after `now`.
    /// Starting a running scheduler does nothing.
    pub fn start(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.interval);
            tracing::debug!("Scheduler started ({:?} interval)", self.interval);
        }
    }

    pub fn stop(&mut self) {
        if self.next_due.take().is_some() {
            tracing::debug!("Scheduler stopped after {} ticks", self.ticks);
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Whether a tick is due at `now`. A due tick is consumed and the next
    /// one scheduled an interval after `now`; missed ticks are not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                self.ticks += 1;
                true
            }
            _ => false,
        }
    }

    /// Time until the next tick, `None` when stopped
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Ticks consumed since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(4);

    #[test]
    fn test_inert_until_started() {
        let mut scheduler = Scheduler::new(INTERVAL);
        let now = Instant::now();
        assert!(!scheduler.is_running());
        assert!(!scheduler.poll(now + Duration::from_secs(1)));
        assert_eq!(scheduler.time_until_next(now), None);
    }

    #[test]
    fn test_ticks_at_interval() {
        let mut scheduler = Scheduler::new(INTERVAL);
        let start = Instant::now();
        scheduler.start(start);

        assert!(!scheduler.poll(start + Duration::from_millis(1)));
        assert!(scheduler.poll(start + INTERVAL));
        assert!(!scheduler.poll(start + INTERVAL));
        assert!(scheduler.poll(start + INTERVAL * 2));
        assert_eq!(scheduler.ticks(), 2);
    }

    #[test]
    fn test_missed_ticks_not_replayed() {
        let mut scheduler = Scheduler::new(INTERVAL);
        let start = Instant::now();
        scheduler.start(start);

        let late = start + Duration::from_millis(100);
        assert!(scheduler.poll(late));
        assert!(!scheduler.poll(late));
        assert_eq!(scheduler.time_until_next(late), Some(INTERVAL));
    }

    #[test]
    fn test_stop() {
        let mut scheduler = Scheduler::new(INTERVAL);
        let start = Instant::now();
        scheduler.start(start);
        scheduler.stop();
        assert!(!scheduler.poll(start + INTERVAL));
    }

    #[test]
    fn test_restart_keeps_schedule() {
        let mut scheduler = Scheduler::new(INTERVAL);
        let start = Instant::now();
        scheduler.start(start);
        scheduler.start(start + Duration::from_millis(3));
        assert_eq!(scheduler.time_until_next(start), Some(INTERVAL));
    }
}
