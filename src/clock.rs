use std::cell::Cell;

use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};

/// Source of "now" for the annotator.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Offset applied to timestamps that carry no zone of their own.
    fn local_offset(&self) -> FixedOffset;
}

#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    #[cfg(target_arch = "wasm32")]
    fn local_offset(&self) -> FixedOffset {
        // getTimezoneOffset is UTC minus local, in minutes
        let minutes = js_sys::Date::new_0().get_timezone_offset() as i32;
        FixedOffset::west_opt(minutes * 60).unwrap_or(Utc.fix())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn local_offset(&self) -> FixedOffset {
        Utc.fix()
    }
}

/// A settable clock, for driving the annotator in tests or previews.
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
            offset: Utc.fix(),
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn local_offset(&self) -> FixedOffset {
        self.offset
    }
}
