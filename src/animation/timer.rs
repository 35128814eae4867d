//! Controllable auto-rotation scheduler.
//!
//! The timer never sleeps or spawns: the host's frame callback polls it
//! with the current time, and tests step it by hand. Each `start` opens a new
//! generation, so a tick can always be traced back to the schedule that
//! produced it and at most one schedule is ever live.

use crate::input::events::TickEvent;
use instant::Instant;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AutoRotateTimer {
    interval: Duration,
    running: bool,
    generation: u64,
    sequence: u64,
    next_due: Option<Instant>,
}

impl AutoRotateTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: false,
            generation: 0,
            sequence: 0,
            next_due: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts a new schedule unless one is already live. Returns whether a
    /// schedule was started.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.running {
            return false;
        }
        self.schedule(now);
        true
    }

    /// Cancels the live schedule, if any. Stopping a stopped timer is a no-op.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.next_due = None;
        log::debug!("Auto-rotate timer stopped (generation {})", self.generation);
        true
    }

    /// Cancels any live schedule and starts a fresh one.
    pub fn restart(&mut self, now: Instant) {
        self.stop();
        self.schedule(now);
    }

    /// Yields a tick when the live schedule is due at `now`.
    ///
    /// Missed intervals are not replayed: after a long frame the next tick is
    /// one interval from `now`.
    pub fn poll(&mut self, now: Instant) -> Option<TickEvent> {
        match self.next_due {
            Some(due) if self.running && now >= due => {
                self.next_due = Some(now + self.interval);
                Some(self.emit())
            }
            _ => None,
        }
    }

    /// Yields a tick immediately if the timer is running, ignoring the cadence.
    pub fn step(&mut self) -> Option<TickEvent> {
        if !self.running {
            return None;
        }
        Some(self.emit())
    }

    fn schedule(&mut self, now: Instant) {
        self.generation += 1;
        self.running = true;
        self.next_due = Some(now + self.interval);
        log::debug!(
            "Auto-rotate timer started (generation {}, every {:?})",
            self.generation,
            self.interval
        );
    }

    fn emit(&mut self) -> TickEvent {
        self.sequence += 1;
        TickEvent {
            generation: self.generation,
            sequence: self.sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(16);

    #[test]
    fn test_new_timer_is_stopped() {
        let mut timer = AutoRotateTimer::new(INTERVAL);
        assert!(!timer.is_running());
        assert_eq!(timer.step(), None);
        assert_eq!(timer.poll(Instant::now() + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_poll_respects_cadence() {
        let start = Instant::now();
        let mut timer = AutoRotateTimer::new(INTERVAL);
        assert!(timer.start(start));

        assert_eq!(timer.poll(start), None);
        assert_eq!(timer.poll(start + Duration::from_millis(10)), None);

        let first = timer.poll(start + INTERVAL).expect("due after one interval");
        assert_eq!(first.sequence, 1);
        assert_eq!(timer.poll(start + INTERVAL), None);

        // A long stall produces one tick, not a burst
        let late = start + Duration::from_millis(500);
        assert!(timer.poll(late).is_some());
        assert_eq!(timer.poll(late + Duration::from_millis(1)), None);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut timer = AutoRotateTimer::new(INTERVAL);
        assert!(!timer.stop());
        timer.start(Instant::now());
        assert!(timer.stop());
        assert!(!timer.stop());
        assert!(!timer.is_running());
        assert_eq!(timer.step(), None);
    }

    #[test]
    fn test_start_does_not_duplicate_schedule() {
        let now = Instant::now();
        let mut timer = AutoRotateTimer::new(INTERVAL);
        assert!(timer.start(now));
        assert!(!timer.start(now));
        assert_eq!(timer.generation(), 1);
    }

    #[test]
    fn test_restart_replaces_schedule() {
        let now = Instant::now();
        let mut timer = AutoRotateTimer::new(INTERVAL);
        timer.restart(now);
        timer.restart(now);
        timer.restart(now + Duration::from_millis(8));
        assert!(timer.is_running());
        assert_eq!(timer.generation(), 3);

        // The latest schedule decides when the next tick is due
        assert_eq!(timer.poll(now + INTERVAL), None);
        let tick = timer
            .poll(now + Duration::from_millis(8) + INTERVAL)
            .expect("due on the latest schedule");
        assert_eq!(tick.generation, 3);
    }

    #[test]
    fn test_step_counts_ticks() {
        let mut timer = AutoRotateTimer::new(INTERVAL);
        timer.start(Instant::now());
        let ticks: Vec<u64> = (0..3).filter_map(|_| timer.step()).map(|t| t.sequence).collect();
        assert_eq!(ticks, vec![1, 2, 3]);
    }
}
