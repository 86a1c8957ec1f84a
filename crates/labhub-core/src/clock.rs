//! Clock abstraction so time-dependent logic can be tested deterministically.

use chrono::{DateTime, Local, Timelike, Utc};

/// Source of "now" for the presence engine.
///
/// The interval policy additionally needs the local wall-clock hour for
/// its working-hours check, which is why it is exposed separately instead
/// of deriving it from the UTC timestamp at each call site.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Current hour of day (0-23) in the server's local timezone.
    fn local_hour(&self) -> u32;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// Deterministic clock for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    /// The instant this clock always reports.
    pub now: DateTime<Utc>,
    /// The local hour this clock always reports.
    pub hour: u32,
}

impl FixedClock {
    /// Create a fixed clock at the given instant and local hour.
    pub fn new(now: DateTime<Utc>, hour: u32) -> Self {
        Self { now, hour }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn local_hour(&self) -> u32 {
        self.hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_reports_configured_values() {
        let now = Utc::now();
        let clock = FixedClock::new(now, 14);
        assert_eq!(clock.now(), now);
        assert_eq!(clock.local_hour(), 14);
    }
}
