//! Two fixed-rate timers for the watch loop: full refresh and clock.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Fetch feeds and recompute everything (also updates the clock).
    Refresh,
    /// Update the displayed time only.
    Clock,
}

#[derive(Debug, Clone)]
pub struct Ticker {
    refresh_every: Duration,
    clock_every: Duration,
    next_refresh: Instant,
    next_clock: Instant,
}

impl Ticker {
    /// Timers start counting at `now`; the caller does the initial refresh.
    pub fn new(refresh_every: Duration, clock_every: Duration, now: Instant) -> Self {
        Self {
            refresh_every,
            clock_every,
            next_refresh: now + refresh_every,
            next_clock: now + clock_every,
        }
    }

    pub fn next_due(&self) -> Instant {
        self.next_refresh.min(self.next_clock)
    }

    /// Ticks due at `now`. Missed periods collapse into one tick. A clock
    /// tick due together with a refresh is absorbed by the refresh.
    pub fn poll(&mut self, now: Instant) -> Option<Tick> {
        let refresh_due = now >= self.next_refresh;
        let clock_due = now >= self.next_clock;

        if refresh_due {
            self.next_refresh = advance(self.next_refresh, self.refresh_every, now);
        }
        if clock_due {
            self.next_clock = advance(self.next_clock, self.clock_every, now);
        }

        match (refresh_due, clock_due) {
            (true, _) => Some(Tick::Refresh),
            (false, true) => Some(Tick::Clock),
            (false, false) => None,
        }
    }
}

/// Next deadline strictly after `now`, staying on the original grid.
fn advance(mut deadline: Instant, every: Duration, now: Instant) -> Instant {
    while deadline <= now {
        deadline += every;
    }
    deadline
}
