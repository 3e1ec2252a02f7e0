// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

/// A repeating deadline on the caller's clock. Nothing fires on its own;
/// the owner asks [`Interval::due`] and calls [`Interval::fire`].
#[derive(Clone, Debug)]
pub struct Interval {
    period: Duration,
    next_due: Instant,
    cancellations: u32,
}

impl Interval {
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next_due: start + period,
            cancellations: 0,
        }
    }

    /// `None` once cancelled.
    pub fn deadline(&self) -> Option<Instant> {
        if self.is_cancelled() {
            None
        } else {
            Some(self.next_due)
        }
    }

    pub fn due(&self, now: Instant) -> Option<Instant> {
        self.deadline().filter(|&d| d <= now)
    }

    /// Books the next deadline one period after the one just served.
    pub fn fire(&mut self) {
        self.next_due += self.period;
    }

    /// Drops missed periods so the next deadline lies after `now`.
    pub fn resync(&mut self, now: Instant) {
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
    }

    /// Returns false if the interval was already cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.is_cancelled() {
            return false;
        }
        self.cancellations += 1;
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellations > 0
    }
}

#[cfg(test)]
impl Interval {
    pub fn cancellations(&self) -> u32 {
        self.cancellations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_deadline_is_one_period_out() {
        let t0 = Instant::now();
        let iv = Interval::new(Duration::from_millis(100), t0);
        assert!(iv.due(t0).is_none());
        assert!(iv.due(t0 + Duration::from_millis(99)).is_none());
        assert_eq!(
            iv.due(t0 + Duration::from_millis(100)),
            Some(t0 + Duration::from_millis(100))
        );
    }

    #[test]
    fn fire_steps_by_period_without_drift() {
        let t0 = Instant::now();
        let mut iv = Interval::new(Duration::from_millis(100), t0);
        iv.fire();
        iv.fire();
        assert_eq!(iv.deadline(), Some(t0 + Duration::from_millis(300)));
    }

    #[test]
    fn resync_skips_missed_periods() {
        let t0 = Instant::now();
        let mut iv = Interval::new(Duration::from_millis(100), t0);
        let late = t0 + Duration::from_secs(5);
        iv.resync(late);
        assert_eq!(iv.deadline(), Some(late + Duration::from_millis(100)));
        iv.resync(t0);
        assert_eq!(iv.deadline(), Some(late + Duration::from_millis(100)));
    }

    #[test]
    fn cancel_is_counted_once() {
        let t0 = Instant::now();
        let mut iv = Interval::new(Duration::from_millis(100), t0);
        assert!(iv.cancel());
        assert!(!iv.cancel());
        assert_eq!(iv.cancellations(), 1);
        assert!(iv.is_cancelled());
        assert!(iv.due(t0 + Duration::from_secs(60)).is_none());
    }
}
