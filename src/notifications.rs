//! Reminder registration against a platform notification backend
//!
//! The backend itself (OS notification center, mobile push API, ...) sits
//! behind [`NotificationScheduler`]; this module decides what to register.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::{HydrationError, Result};
use crate::models::{AppSettings, TimeOfDay};
use crate::reminder::ReminderScheduler;

pub const REMINDER_TITLE: &str = "Time to drink water! 💧";
pub const SNOOZE_TITLE: &str = "Reminder: Drink Water! 💧";
pub const SNOOZE_BODY: &str = "You asked us to remind you again. Time to hydrate!";

/// Marker attached to every reminder so a tap can be routed back to intake
pub const WATER_REMINDER_KIND: &str = "water_reminder";

const FALLBACK_NAME: &str = "Buddy";

const REMINDER_MESSAGES: [&str; 10] = [
    "Hey {name}, your body is 60% water, not coffee! Drink up! 💧",
    "{name}, even cacti need water. And you're not a cactus! 🌵",
    "Earth to {name}! Your cells are thirsty, don't ignore them! 💦",
    "Hydration alert! {name}, your water bottle is feeling neglected. 😢",
    "Doctor {name}, did you forget to prescribe yourself some H2O? 🩺",
    "{name}, your water bottle is your sidekick. Don't leave it hanging! 🦸",
    "Attention {name}! Your kidneys are sending an SOS. Water needed ASAP! 🚨",
    "Hey {name}, being awesome takes energy, and energy takes water! 💪",
    "{name}, your plants get watered regularly. Shouldn't you? 🌱",
    "Water you waiting for, {name}? Time to hydrate! 💧",
];

/// A trigger that repeats every day at the given local time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTrigger {
    pub hour: u8,
    pub minute: u8,
}

impl From<TimeOfDay> for DailyTrigger {
    fn from(time: TimeOfDay) -> Self {
        let (hour, minute) = time.as_trigger();
        Self { hour, minute }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub kind: String,
}

impl NotificationContent {
    pub fn reminder(title: &str, body: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            body: body.into(),
            kind: WATER_REMINDER_KIND.to_string(),
        }
    }
}

/// Platform notification backend
pub trait NotificationScheduler {
    /// Ask for (or confirm) permission to post notifications
    fn request_permission(&mut self) -> Result<bool>;

    fn schedule_daily(&mut self, trigger: DailyTrigger, content: NotificationContent) -> Result<()>;

    fn cancel_all(&mut self) -> Result<()>;
}

/// Backend that keeps registrations in memory
///
/// Used by the CLI to preview what would be registered and by tests.
#[derive(Debug, Clone)]
pub struct RecordingScheduler {
    pub permission_granted: bool,
    scheduled: Vec<(DailyTrigger, NotificationContent)>,
    cancellations: usize,
}

impl Default for RecordingScheduler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RecordingScheduler {
    pub fn new(permission_granted: bool) -> Self {
        Self {
            permission_granted,
            scheduled: Vec::new(),
            cancellations: 0,
        }
    }

    pub fn scheduled(&self) -> &[(DailyTrigger, NotificationContent)] {
        &self.scheduled
    }

    pub fn cancellations(&self) -> usize {
        self.cancellations
    }
}

impl NotificationScheduler for RecordingScheduler {
    fn request_permission(&mut self) -> Result<bool> {
        Ok(self.permission_granted)
    }

    fn schedule_daily(&mut self, trigger: DailyTrigger, content: NotificationContent) -> Result<()> {
        if !self.permission_granted {
            return Err(HydrationError::Notification(
                "notification permission not granted".to_string(),
            ));
        }
        self.scheduled.push((trigger, content));
        Ok(())
    }

    fn cancel_all(&mut self) -> Result<()> {
        self.scheduled.clear();
        self.cancellations += 1;
        Ok(())
    }
}

/// A random reminder line addressed to `name`
pub fn reminder_message<R: Rng + ?Sized>(name: Option<&str>, rng: &mut R) -> String {
    let name = name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or(FALLBACK_NAME);
    let template = REMINDER_MESSAGES[rng.random_range(0..REMINDER_MESSAGES.len())];
    template.replacen("{name}", name, 1)
}

/// Replace all registered reminders with one daily trigger per slot
///
/// Returns how many reminders were registered. Disabled notifications,
/// denied permission and unusable settings all leave nothing registered.
#[instrument(skip(scheduler, rng))]
pub fn schedule_reminders<N, R>(
    settings: &AppSettings,
    profile_name: Option<&str>,
    scheduler: &mut N,
    rng: &mut R,
) -> Result<usize>
where
    N: NotificationScheduler + ?Sized,
    R: Rng + ?Sized,
{
    scheduler.cancel_all()?;

    if !settings.notifications_enabled {
        info!("Notifications disabled, nothing scheduled");
        return Ok(0);
    }

    if !scheduler.request_permission()? {
        warn!("Notification permission not granted");
        return Ok(0);
    }

    let plan = ReminderScheduler::plan_from_settings(settings);
    if plan.is_empty() {
        warn!(
            frequency = %settings.reminder_frequency,
            start = %settings.start_time,
            end = %settings.end_time,
            "Reminder settings are invalid, nothing scheduled"
        );
        return Ok(0);
    }

    let count = plan.len();
    for slot in plan {
        let body = reminder_message(profile_name, rng);
        scheduler.schedule_daily(slot.into(), NotificationContent::reminder(REMINDER_TITLE, body))?;
    }

    info!(count, "Scheduled reminders");
    Ok(count)
}

/// Register a one-off "remind me later" reminder `minutes` from now
pub fn schedule_snooze<N>(now: NaiveDateTime, minutes: u32, scheduler: &mut N) -> Result<TimeOfDay>
where
    N: NotificationScheduler + ?Sized,
{
    let at = ReminderScheduler::snooze(now, minutes);
    scheduler.schedule_daily(at.into(), NotificationContent::reminder(SNOOZE_TITLE, SNOOZE_BODY))?;
    info!(at = %at, "Snoozed reminder");
    Ok(at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_schedules_one_trigger_per_slot() {
        let settings = AppSettings {
            start_time: "08:00".to_string(),
            end_time: "10:00".to_string(),
            ..AppSettings::default()
        };
        let mut scheduler = RecordingScheduler::default();

        let count = schedule_reminders(&settings, Some("Sam"), &mut scheduler, &mut rng()).unwrap();

        assert_eq!(count, 3);
        let triggers: Vec<(u8, u8)> = scheduler
            .scheduled()
            .iter()
            .map(|(t, _)| (t.hour, t.minute))
            .collect();
        assert_eq!(triggers, vec![(8, 0), (9, 0), (10, 0)]);
        for (_, content) in scheduler.scheduled() {
            assert_eq!(content.title, REMINDER_TITLE);
            assert_eq!(content.kind, WATER_REMINDER_KIND);
            assert!(content.body.contains("Sam"));
            assert!(!content.body.contains("{name}"));
        }
    }

    #[test]
    fn test_rescheduling_replaces_previous_reminders() {
        let settings = AppSettings::default();
        let mut scheduler = RecordingScheduler::default();
        schedule_reminders(&settings, None, &mut scheduler, &mut rng()).unwrap();
        schedule_reminders(&settings, None, &mut scheduler, &mut rng()).unwrap();

        assert_eq!(scheduler.scheduled().len(), 15);
        assert_eq!(scheduler.cancellations(), 2);
    }

    #[test]
    fn test_disabled_or_denied_schedules_nothing() {
        let disabled = AppSettings {
            notifications_enabled: false,
            ..AppSettings::default()
        };
        let mut scheduler = RecordingScheduler::default();
        assert_eq!(schedule_reminders(&disabled, None, &mut scheduler, &mut rng()).unwrap(), 0);
        assert!(scheduler.scheduled().is_empty());

        let mut denied = RecordingScheduler::new(false);
        let settings = AppSettings::default();
        assert_eq!(schedule_reminders(&settings, None, &mut denied, &mut rng()).unwrap(), 0);
        assert_eq!(denied.cancellations(), 1);
    }

    #[test]
    fn test_invalid_frequency_schedules_nothing() {
        let settings = AppSettings {
            reminder_frequency: "-10".to_string(),
            ..AppSettings::default()
        };
        let mut scheduler = RecordingScheduler::default();
        assert_eq!(schedule_reminders(&settings, None, &mut scheduler, &mut rng()).unwrap(), 0);
    }

    #[test]
    fn test_message_falls_back_to_buddy() {
        let mut rng = rng();
        assert!(reminder_message(None, &mut rng).contains("Buddy"));
        assert!(reminder_message(Some("  "), &mut rng).contains("Buddy"));
    }

    #[test]
    fn test_snooze_registers_single_reminder() {
        let now = NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(14, 50, 0)
            .unwrap();
        let mut scheduler = RecordingScheduler::default();
        let at = schedule_snooze(now, 15, &mut scheduler).unwrap();

        assert_eq!(at.to_string(), "15:05");
        assert_eq!(scheduler.scheduled().len(), 1);
        assert_eq!(scheduler.scheduled()[0].0, DailyTrigger { hour: 15, minute: 5 });
        assert_eq!(scheduler.scheduled()[0].1.title, SNOOZE_TITLE);
    }

    #[test]
    fn test_snooze_without_permission_fails() {
        let now = NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(23, 50, 0)
            .unwrap();
        let mut denied = RecordingScheduler::new(false);
        let err = schedule_snooze(now, 15, &mut denied).unwrap_err();

        assert!(matches!(err, HydrationError::Notification(_)));
        assert!(denied.scheduled().is_empty());
    }
}
