use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Source of `last_updated` ticks for shipments.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall clock in Unix seconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Clock driven by hand, for tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    tick: AtomicI64,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            tick: AtomicI64::new(start),
        }
    }

    pub fn set(&self, tick: i64) {
        self.tick.store(tick, Ordering::SeqCst);
    }

    pub fn advance(&self, by: i64) -> i64 {
        self.tick.fetch_add(by, Ordering::SeqCst) + by
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.tick.load(Ordering::SeqCst)
    }
}
