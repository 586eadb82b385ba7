//! Fixed-rate tick source. It only produces ticks while started; the session
//! stops it whenever the game is not running.

use std::time::{Duration, Instant};

/// Upper bound on ticks delivered by one [`Ticker::due`] call. A terminal that
/// was suspended for a while resumes instead of fast-forwarding.
pub const MAX_CATCH_UP: u32 = 5;

#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    /// Schedules the first tick one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Number of ticks that fell due up to `now`.
    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next else {
            return 0;
        };
        let mut count = 0;
        while next <= now {
            count += 1;
            next += self.interval;
            if count == MAX_CATCH_UP {
                if next <= now {
                    next = now + self.interval;
                }
                break;
            }
        }
        self.next = Some(next);
        count
    }
}
