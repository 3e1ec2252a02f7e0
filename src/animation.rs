// Copyright (c) 2026 rezky_nightky

use std::time::Instant;

use log::info;

use crate::rain::Rainfall;
use crate::timer::Interval;

/// Upper bound on timer firings served by one [`Animation::update`]; after
/// that the timers skip ahead instead of replaying a long stall.
pub const MAX_CATCH_UP: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fired {
    Tick,
    ColorChange,
}

/// The mounted rainfall: its state plus the two intervals that drive it.
pub struct Animation {
    rain: Rainfall,
    tick_timer: Interval,
    color_timer: Interval,
    mounted: bool,
}

impl Animation {
    /// Runs the initial scheduling pass and starts both timers at `now`.
    pub fn mount(mut rain: Rainfall, now: Instant) -> Self {
        rain.top_up();
        let tick_timer = Interval::new(rain.config().tick_period, now);
        let color_timer = Interval::new(rain.config().color_change_period, now);
        info!(
            "mounted {}x{} grid, columns {:?}, palette {}",
            rain.config().rows,
            rain.config().cols,
            rain.active_columns().iter().collect::<Vec<_>>(),
            rain.palette()
        );
        Self {
            rain,
            tick_timer,
            color_timer,
            mounted: true,
        }
    }

    pub fn rain(&self) -> &Rainfall {
        &self.rain
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn next_due(&self, now: Instant) -> Option<Fired> {
        match (self.tick_timer.due(now), self.color_timer.due(now)) {
            (None, None) => None,
            (Some(t), Some(c)) if c < t => Some(Fired::ColorChange),
            (Some(_), _) => Some(Fired::Tick),
            (None, Some(_)) => Some(Fired::ColorChange),
        }
    }

    /// Serves every timer due at `now`, earliest deadline first, each
    /// callback running to completion before the next. Returns what fired.
    pub fn update(&mut self, now: Instant) -> Vec<Fired> {
        let mut fired = Vec::new();
        if !self.is_mounted() {
            return fired;
        }

        while let Some(which) = self.next_due(now) {
            if fired.len() >= MAX_CATCH_UP {
                self.tick_timer.resync(now);
                self.color_timer.resync(now);
                break;
            }
            match which {
                Fired::Tick => {
                    self.tick_timer.fire();
                    self.rain.tick();
                }
                Fired::ColorChange => {
                    self.color_timer.fire();
                    self.rain.cycle_palette();
                }
            }
            fired.push(which);
        }
        fired
    }

    /// Earliest pending deadline, `None` after unmount.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.tick_timer.deadline(), self.color_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn take_paint_request(&mut self) -> bool {
        self.is_mounted() && self.rain.take_paint_request()
    }

    pub fn request_paint(&mut self) {
        self.rain.request_paint();
    }

    /// Cancels both timers. Safe to call more than once.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.mounted = false;
        let cancelled = [self.tick_timer.cancel(), self.color_timer.cancel()]
            .into_iter()
            .filter(|&c| c)
            .count();
        info!(
            "unmounted after {} ticks, {} timers cancelled",
            self.rain.ticks(),
            cancelled
        );
    }
}

impl Drop for Animation {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
impl Animation {
    fn tick_timer(&self) -> &Interval {
        &self.tick_timer
    }

    fn color_timer(&self) -> &Interval {
        &self.color_timer
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::RainConfig;

    fn mounted(seed: u64, t0: Instant) -> Animation {
        let rain = Rainfall::with_seed(RainConfig::default(), seed).unwrap();
        Animation::mount(rain, t0)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn mount_seeds_columns_and_requests_paint() {
        let t0 = Instant::now();
        let mut anim = mounted(1, t0);
        assert!((4..=6).contains(&anim.rain().active_columns().len()));
        assert!(anim.take_paint_request());
        assert_eq!(anim.next_deadline(), Some(t0 + ms(100)));
    }

    #[test]
    fn ticks_follow_the_fast_period() {
        let t0 = Instant::now();
        let mut anim = mounted(2, t0);
        assert!(anim.update(t0 + ms(50)).is_empty());
        assert_eq!(anim.update(t0 + ms(100)), vec![Fired::Tick]);
        assert_eq!(anim.update(t0 + ms(350)), vec![Fired::Tick, Fired::Tick]);
        assert_eq!(anim.rain().ticks(), 3);
    }

    #[test]
    fn color_changes_every_five_seconds() {
        let t0 = Instant::now();
        let mut anim = mounted(3, t0);
        let mut now = t0;
        let mut colors = 0;
        for _ in 0..100 {
            now += ms(100);
            colors += anim
                .update(now)
                .iter()
                .filter(|f| **f == Fired::ColorChange)
                .count();
        }
        assert_eq!(colors, 2);
        assert_eq!(anim.rain().ticks(), 100);
    }

    #[test]
    fn tick_fires_before_color_on_same_deadline() {
        let t0 = Instant::now();
        let mut anim = mounted(4, t0);
        let mut now = t0;
        for _ in 0..49 {
            now += ms(100);
            anim.update(now);
        }
        assert_eq!(
            anim.update(t0 + ms(5000)),
            vec![Fired::Tick, Fired::ColorChange]
        );
    }

    #[test]
    fn long_stall_is_capped() {
        let t0 = Instant::now();
        let mut anim = mounted(5, t0);
        let late = t0 + Duration::from_secs(30);
        assert_eq!(anim.update(late).len(), MAX_CATCH_UP);
        assert!(anim.next_deadline().unwrap() > late);
        assert!(anim.update(late).is_empty());
    }

    #[test]
    fn unmount_cancels_each_timer_once_and_freezes_state() {
        let t0 = Instant::now();
        let mut anim = mounted(6, t0);
        anim.update(t0 + ms(300));
        anim.take_paint_request();

        anim.unmount();
        anim.unmount();
        assert!(!anim.is_mounted());
        assert_eq!(anim.tick_timer().cancellations(), 1);
        assert_eq!(anim.color_timer().cancellations(), 1);
        assert_eq!(anim.next_deadline(), None);

        let grid = anim.rain().grid().clone();
        let palette = anim.rain().palette();
        let ticks = anim.rain().ticks();
        assert!(anim.update(t0 + Duration::from_secs(60)).is_empty());
        assert_eq!(anim.rain().grid(), &grid);
        assert_eq!(anim.rain().palette(), palette);
        assert_eq!(anim.rain().ticks(), ticks);
        assert!(!anim.take_paint_request());
    }
}
