use std::time::{Duration, Instant};

/// Source of wall-clock time for pacing and calendar advancement.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed point; never decreases.
    fn monotonic_millis(&self) -> u64;

    /// Block for `ms` milliseconds.
    fn sleep_millis(&mut self, ms: u64);
}

/// The real clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// A clock whose zero is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn monotonic_millis(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn sleep_millis(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// A clock that only moves when told to. Sleeping advances it instantly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    /// A clock reading `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self { now_ms: start_ms }
    }

    /// Move the clock forward.
    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    /// Current reading.
    pub fn now(&self) -> u64 {
        self.now_ms
    }
}

impl Clock for ManualClock {
    fn monotonic_millis(&self) -> u64 {
        self.now_ms
    }

    fn sleep_millis(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

/// Bounds the tick rate: each tick lasts at least the frame budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacer {
    budget_ms: u64,
    ticks: u64,
    overruns: u64,
}

impl FramePacer {
    /// A pacer with the given per-tick budget.
    pub fn new(budget_ms: u64) -> Self {
        Self {
            budget_ms,
            ticks: 0,
            overruns: 0,
        }
    }

    /// Sleep out the rest of the budget for a tick that began at
    /// `started_ms`. Returns the tick's total wall duration. A tick that ran
    /// over budget does not sleep.
    pub fn pace(&mut self, clock: &mut dyn Clock, started_ms: u64) -> u64 {
        let spent = clock.monotonic_millis().saturating_sub(started_ms);
        if spent < self.budget_ms {
            clock.sleep_millis(self.budget_ms - spent);
        } else if self.budget_ms > 0 {
            self.overruns += 1;
        }
        self.ticks += 1;
        clock.monotonic_millis().saturating_sub(started_ms)
    }

    /// Number of paced ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of ticks that exceeded the budget.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// The per-tick budget.
    pub fn budget_ms(&self) -> u64 {
        self.budget_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacer_sleeps_out_the_budget() {
        let mut clock = ManualClock::new(1_000);
        let mut pacer = FramePacer::new(50);
        clock.advance(20);
        assert_eq!(pacer.pace(&mut clock, 1_000), 50);
        assert_eq!(clock.now(), 1_050);
        assert_eq!(pacer.ticks(), 1);
    }

    #[test]
    fn pacer_does_not_sleep_on_overrun() {
        let mut clock = ManualClock::new(0);
        let mut pacer = FramePacer::new(50);
        clock.advance(80);
        assert_eq!(pacer.pace(&mut clock, 0), 80);
        assert_eq!(clock.now(), 80);
        assert_eq!(pacer.overruns(), 1);
    }

    #[test]
    fn zero_budget_never_sleeps() {
        let mut clock = ManualClock::new(0);
        let mut pacer = FramePacer::new(0);
        assert_eq!(pacer.pace(&mut clock, 0), 0);
        assert_eq!(pacer.overruns(), 0);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.monotonic_millis();
        let b = clock.monotonic_millis();
        assert!(b >= a);
    }
}
