//! Reminder time computation
//!
//! All arithmetic happens on minutes since midnight within a single local
//! day. `now` is always supplied by the caller, so nothing here reads the
//! system clock. Invalid input (non-positive frequency, malformed or inverted
//! window) produces `None` or an empty plan rather than an error.

use crate::error::{HydrationError, Result};
use crate::models::{AppSettings, TimeOfDay};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Default delay used when the user asks to be reminded later
pub const DEFAULT_SNOOZE_MINUTES: u32 = 15;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// The next moment a reminder should fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextReminder {
    pub fire_time: NaiveDateTime,

    /// True when the active window for today is already exhausted
    pub is_tomorrow: bool,
}

impl NextReminder {
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from(self.fire_time.time())
    }

    /// Whole minutes from `now` (truncated to the minute) until the reminder
    pub fn minutes_until(&self, now: NaiveDateTime) -> i64 {
        let now_floor = now.date().and_time(TimeOfDay::from(now.time()).to_naive_time());
        (self.fire_time - now_floor).num_minutes()
    }

    /// "In 15 minutes", "In 1 hour", "In 2 hours 30 min"
    pub fn countdown_label(&self, now: NaiveDateTime) -> String {
        let minutes = self.minutes_until(now).max(0);
        if minutes < 60 {
            return format!("In {} minutes", minutes);
        }

        let hours = minutes / 60;
        let rest = minutes % 60;
        let mut label = format!("In {} hour{}", hours, if hours > 1 { "s" } else { "" });
        if rest > 0 {
            label.push_str(&format!(" {} min", rest));
        }
        label
    }

    /// Short text for status displays: `"09:00 (In 15 minutes)"` or
    /// `"08:00 (tomorrow)"`
    pub fn summary(&self, now: NaiveDateTime) -> String {
        if self.is_tomorrow {
            format!("{} (tomorrow)", self.time_of_day())
        } else {
            format!("{} ({})", self.time_of_day(), self.countdown_label(now))
        }
    }
}

/// One day's worth of reminder slots, in ascending order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPlan {
    slots: Vec<TimeOfDay>,
}

impl ReminderPlan {
    pub fn slots(&self) -> &[TimeOfDay] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `(hour, minute)` pairs for registering daily triggers
    pub fn triggers(&self) -> Vec<(u8, u8)> {
        self.slots.iter().map(TimeOfDay::as_trigger).collect()
    }
}

impl IntoIterator for ReminderPlan {
    type Item = TimeOfDay;
    type IntoIter = std::vec::IntoIter<TimeOfDay>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}

/// Reminder scheduling algorithms
pub struct ReminderScheduler;

impl ReminderScheduler {
    /// Next reminder for `"H:MM"` window strings
    ///
    /// Returns `None` when the frequency is not positive or either time is
    /// malformed.
    pub fn next_reminder(
        now: NaiveDateTime,
        frequency_minutes: i64,
        start_time: &str,
        end_time: &str,
    ) -> Option<NextReminder> {
        let frequency = u32::try_from(frequency_minutes).ok()?;
        let start = TimeOfDay::parse(start_time)?;
        let end = TimeOfDay::parse(end_time)?;
        Self::next_reminder_at(now, frequency, start, end)
    }

    /// Next reminder using the persisted settings
    pub fn next_reminder_from_settings(
        now: NaiveDateTime,
        settings: &AppSettings,
    ) -> Option<NextReminder> {
        Self::next_reminder_at(
            now,
            settings.frequency_minutes()?,
            settings.start()?,
            settings.end()?,
        )
    }

    /// Next reminder within the active window `[start, end]`
    ///
    /// - before the window: today at `start`
    /// - after the window: tomorrow at `start`
    /// - inside: the next slot `start + k × frequency` strictly after now,
    ///   or tomorrow at `start` if that slot lies past `end`
    pub fn next_reminder_at(
        now: NaiveDateTime,
        frequency_minutes: u32,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Option<NextReminder> {
        if frequency_minutes == 0 || start > end {
            return None;
        }

        let now_min = u32::from(TimeOfDay::from(now.time()).minutes());
        let start_min = u32::from(start.minutes());
        let end_min = u32::from(end.minutes());

        if now_min < start_min {
            return Some(Self::today_at(now, start));
        }
        if now_min > end_min {
            return Self::tomorrow_at(now, start);
        }

        let slots_passed = (now_min - start_min) / frequency_minutes;
        let candidate = start_min + (slots_passed + 1) * frequency_minutes;

        if candidate > end_min {
            return Self::tomorrow_at(now, start);
        }

        // candidate <= end_min < 1440
        let slot = TimeOfDay::from_minutes(candidate as u16)?;
        Some(Self::today_at(now, slot))
    }

    /// Every reminder slot for `"H:MM"` window strings; empty on invalid input
    pub fn daily_reminder_slots(
        start_time: &str,
        end_time: &str,
        frequency_minutes: i64,
    ) -> ReminderPlan {
        let parsed = TimeOfDay::parse(start_time)
            .zip(TimeOfDay::parse(end_time))
            .zip(u32::try_from(frequency_minutes).ok());

        match parsed {
            Some(((start, end), frequency)) => Self::slots_between(start, end, frequency),
            None => ReminderPlan::default(),
        }
    }

    /// Reminder slots for the persisted settings
    pub fn plan_from_settings(settings: &AppSettings) -> ReminderPlan {
        match (settings.start(), settings.end(), settings.frequency_minutes()) {
            (Some(start), Some(end), Some(frequency)) => {
                Self::slots_between(start, end, frequency)
            }
            _ => ReminderPlan::default(),
        }
    }

    /// `floor((end - start) / frequency) + 1` slots at `start + i × frequency`
    pub fn slots_between(start: TimeOfDay, end: TimeOfDay, frequency_minutes: u32) -> ReminderPlan {
        if frequency_minutes == 0 || start > end {
            return ReminderPlan::default();
        }

        let start_min = u32::from(start.minutes());
        let end_min = u32::from(end.minutes());
        let count = (end_min - start_min) / frequency_minutes + 1;

        let slots = (0..count)
            .filter_map(|i| {
                let minutes = start_min + i * frequency_minutes;
                TimeOfDay::from_minutes(minutes as u16)
            })
            .collect();

        ReminderPlan { slots }
    }

    /// Validating variant of [`Self::plan_from_settings`]
    pub fn try_plan_from_settings(settings: &AppSettings) -> Result<ReminderPlan> {
        let frequency = settings.frequency_minutes().ok_or_else(|| {
            HydrationError::InvalidInput(format!(
                "reminder frequency must be a positive number of minutes, got '{}'",
                settings.reminder_frequency
            ))
        })?;
        let start = settings.start().ok_or_else(|| {
            HydrationError::InvalidInput(format!("invalid start time '{}'", settings.start_time))
        })?;
        let end = settings.end().ok_or_else(|| {
            HydrationError::InvalidInput(format!("invalid end time '{}'", settings.end_time))
        })?;
        if start > end {
            return Err(HydrationError::InvalidInput(format!(
                "start time {} is after end time {}",
                start, end
            )));
        }

        Ok(Self::slots_between(start, end, frequency))
    }

    /// Time of day `minutes` after `now`, wrapping past midnight
    pub fn snooze(now: NaiveDateTime, minutes: u32) -> TimeOfDay {
        let now_min = u32::from(TimeOfDay::from(now.time()).minutes());
        let wrapped = (now_min + minutes % MINUTES_PER_DAY) % MINUTES_PER_DAY;
        TimeOfDay::from_minutes(wrapped as u16).unwrap_or(TimeOfDay::from(now.time()))
    }

    fn today_at(now: NaiveDateTime, time: TimeOfDay) -> NextReminder {
        NextReminder {
            fire_time: now.date().and_time(time.to_naive_time()),
            is_tomorrow: false,
        }
    }

    fn tomorrow_at(now: NaiveDateTime, time: TimeOfDay) -> Option<NextReminder> {
        let tomorrow = now.date().checked_add_signed(Duration::days(1))?;
        Some(NextReminder {
            fire_time: tomorrow.and_time(time.to_naive_time()),
            is_tomorrow: true,
        })
    }
}
