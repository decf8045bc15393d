/// Uptime Clock
/// Advanced by a 50 ms tick interrupt. Every field the interrupt touches is a
/// single atomic word, so the main loop never sees a torn value.

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU8, Ordering};

use crate::indicator::Indicator;

pub const TICK_MS: u32 = 50;
pub const TICKS_PER_SECOND: u8 = 20;

pub struct Clock {
    ticks: AtomicU8,
    seconds: AtomicU32,
    countdown: AtomicU16,
    claimed: AtomicBool,
    pub indicator: Indicator,
}

impl Clock {
    pub const fn new() -> Self {
        Clock {
            ticks: AtomicU8::new(0),
            seconds: AtomicU32::new(0),
            countdown: AtomicU16::new(0),
            claimed: AtomicBool::new(false),
            indicator: Indicator::new(),
        }
    }

    /// Tick interrupt body. Must only be called from one context.
    pub fn tick(&self) {
        let _ = self
            .countdown
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |t| t.checked_sub(1));

        let ticks = self.ticks.load(Ordering::Relaxed) + 1;
        if ticks >= TICKS_PER_SECOND {
            self.ticks.store(0, Ordering::Relaxed);
            self.indicator.blink();
            self.seconds.fetch_add(1, Ordering::AcqRel);
        } else {
            self.ticks.store(ticks, Ordering::Relaxed);
        }
    }

    pub fn uptime(&self) -> Uptime {
        Uptime::from_seconds(self.seconds.load(Ordering::Acquire))
    }

    /// Claim the countdown register. Returns `None` while another
    /// [`Countdown`] is alive.
    pub fn countdown(&self) -> Option<Countdown<'_>> {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Countdown { clock: self })
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive use of the clock's countdown register.
pub struct Countdown<'a> {
    clock: &'a Clock,
}

impl<'a> Countdown<'a> {
    pub fn start(&mut self, ticks: u16) {
        self.clock.countdown.store(ticks, Ordering::Release);
    }

    pub fn remaining(&self) -> u16 {
        self.clock.countdown.load(Ordering::Acquire)
    }

    pub fn expired(&self) -> bool {
        self.remaining() == 0
    }
}

impl<'a> Drop for Countdown<'a> {
    fn drop(&mut self) {
        self.clock.countdown.store(0, Ordering::Release);
        self.clock.claimed.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uptime {
    pub hours: u32,
    pub minutes: u8,
    pub seconds: u8,
}

impl Uptime {
    pub fn from_seconds(total: u32) -> Self {
        Uptime {
            hours: total / 3600,
            minutes: ((total / 60) % 60) as u8,
            seconds: (total % 60) as u8,
        }
    }
}

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance(clock: &Clock, ticks: u32) {
        for _ in 0..ticks {
            clock.tick();
        }
    }

    #[test]
    fn test_uptime_counts_seconds() {
        let clock = Clock::new();
        advance(&clock, 19);
        assert_eq!(clock.uptime(), Uptime::from_seconds(0));
        advance(&clock, 1);
        assert_eq!(clock.uptime(), Uptime::from_seconds(1));
    }

    #[test]
    fn test_uptime_rollover() {
        let uptime = Uptime::from_seconds(3600 + 59 * 60 + 59);
        assert_eq!(uptime.hours, 1);
        assert_eq!(uptime.minutes, 59);
        assert_eq!(uptime.seconds, 59);
        assert_eq!(uptime.to_string(), "01:59:59");

        assert_eq!(Uptime::from_seconds(0).to_string(), "00:00:00");
        assert_eq!(Uptime::from_seconds(100 * 3600).to_string(), "100:00:00");
    }

    #[test]
    fn test_countdown_expires() {
        let clock = Clock::new();
        let mut countdown = clock.countdown().unwrap();
        assert!(countdown.expired());

        countdown.start(3);
        assert!(!countdown.expired());
        advance(&clock, 2);
        assert_eq!(countdown.remaining(), 1);
        advance(&clock, 1);
        assert!(countdown.expired());

        // Stays at zero
        advance(&clock, 5);
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn test_countdown_single_owner() {
        let clock = Clock::new();
        let mut first = clock.countdown().unwrap();
        first.start(10);
        assert!(clock.countdown().is_none());

        drop(first);
        let second = clock.countdown().unwrap();
        assert!(second.expired());
    }

    #[test]
    fn test_indicator_blinks_each_second() {
        let clock = Clock::new();
        clock.indicator.enable();
        advance(&clock, 20);
        assert!(clock.indicator.is_lit());
        advance(&clock, 10);
        assert!(clock.indicator.is_lit());
        advance(&clock, 10);
        assert!(!clock.indicator.is_lit());
    }
}
