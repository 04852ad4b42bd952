// Wall-clock supplier for every increment boundary in the process.
//
// Responsibilities
// - Hand out timestamps that never go backwards within one process.
// - Be injectable so tests can drive time explicitly.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Host clock, clamped so successive readings are non-decreasing.
#[derive(Default)]
pub struct SystemClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let reading = Utc::now();
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = match *last {
            Some(previous) if previous > reading => previous,
            _ => reading,
        };
        *last = Some(now);
        now
    }
}

/// Virtual clock. With a tick, every reading advances time by that step afterwards.
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
    tick: Duration,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
            tick: Duration::zero(),
        }
    }

    pub fn ticking(start: DateTime<Utc>, tick: Duration) -> Self {
        Self {
            current: Mutex::new(start),
            tick,
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *current += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        let mut current = self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = *current;
        *current += self.tick;
        now
    }
}
