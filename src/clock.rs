//! Injectable source of "now"
//!
//! Everything that depends on the current wall-clock time takes a [`Clock`]
//! so tests can pin the time instead of racing the real one.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Supplies the current local wall-clock time
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The host's local clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Convenience constructor; `None` when the parts don't form a valid instant
    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Option<Self> {
        date.and_hms_opt(hour, minute, 0).map(FixedClock)
    }

    pub fn set(&mut self, now: NaiveDateTime) {
        self.0 = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut clock = FixedClock::at(date, 7, 30).unwrap();
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now().format("%H:%M").to_string(), "07:30");

        clock.set(date.and_hms_opt(21, 0, 0).unwrap());
        assert_eq!(clock.now().format("%H:%M").to_string(), "21:00");

        assert!(FixedClock::at(date, 25, 0).is_none());
    }
}
