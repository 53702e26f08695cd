//! Injectable time sources
//!
//! The profiler never reads the system time directly. Every timestamp (the
//! run header and both ends of a measured call) comes from a [`Clock`], so a
//! [`FakeClock`] makes timings fully deterministic in tests.

use chrono::{DateTime, FixedOffset, Local, TimeDelta};
use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// A source of the current instant
///
/// Implementations must be safe to share across threads: a single clock is
/// read concurrently by every proxy produced from one profiler.
pub trait Clock: Debug + Send + Sync {
    /// Current instant, including the local UTC offset
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the local timezone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Manually driven clock for tests
///
/// Time only moves when [`advance`](FakeClock::advance) or
/// [`rewind`](FakeClock::rewind) is called, or, for a clock built with
/// [`stepping`](FakeClock::stepping), by a fixed step after every read.
///
/// # Example
///
/// ```
/// use method_profiler::clock::{Clock, FakeClock};
/// use chrono::DateTime;
/// use std::time::Duration;
///
/// let origin = DateTime::parse_from_rfc3339("2026-10-18T09:30:00+02:00").unwrap();
/// let clock = FakeClock::new(origin);
///
/// clock.advance(Duration::from_secs(2));
/// assert_eq!((clock.now() - origin).num_seconds(), 2);
/// ```
#[derive(Debug)]
pub struct FakeClock {
    origin: DateTime<FixedOffset>,
    /// Nanoseconds since `origin`; negative after a rewind past the origin
    offset_nanos: AtomicI64,
    step_nanos: i64,
}

impl FakeClock {
    /// A clock frozen at `origin`
    pub fn new(origin: DateTime<FixedOffset>) -> Self {
        Self {
            origin,
            offset_nanos: AtomicI64::new(0),
            step_nanos: 0,
        }
    }

    /// A clock that moves forward by `step` after each call to `now()`
    ///
    /// The first read returns `origin`, the second `origin + step`, and so on.
    pub fn stepping(origin: DateTime<FixedOffset>, step: Duration) -> Self {
        Self {
            origin,
            offset_nanos: AtomicI64::new(0),
            step_nanos: to_nanos(step),
        }
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.offset_nanos.fetch_add(to_nanos(by), Ordering::SeqCst);
    }

    /// Move time backward, simulating a wall-clock adjustment
    pub fn rewind(&self, by: Duration) {
        self.offset_nanos.fetch_sub(to_nanos(by), Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let nanos = self.offset_nanos.fetch_add(self.step_nanos, Ordering::SeqCst);
        self.origin + TimeDelta::nanoseconds(nanos)
    }
}

fn to_nanos(duration: Duration) -> i64 {
    i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX)
}
