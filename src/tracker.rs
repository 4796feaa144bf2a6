use rand::Rng;
use tracing::{debug, info, instrument};

use crate::clock::Clock;
use crate::error::{HydrationError, Result};
use crate::gamification::{self, ProgressUpdate};
use crate::goal::GoalCalculator;
use crate::intake;
use crate::models::{
    ActivityLevel, AppSettings, UserProfile, WaterDayRecord, DEFAULT_DAILY_GOAL_ML,
};
use crate::notifications::{self, NotificationScheduler};
use crate::reminder::{NextReminder, ReminderPlan, ReminderScheduler};
use crate::stats::{MonthStats, YearMonth};
use crate::storage::{HydrationStore, KeyValueStore};

/// Result of recording a drink
#[derive(Debug, Clone, PartialEq)]
pub struct DrinkOutcome {
    pub record: WaterDayRecord,
    pub progress: Option<ProgressUpdate>,
}

/// Read/compute/write flows of the app over a store and a clock
pub struct HydrationTracker<S: KeyValueStore, C: Clock> {
    store: HydrationStore<S>,
    clock: C,
}

impl<S: KeyValueStore, C: Clock> HydrationTracker<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store: HydrationStore::new(store),
            clock,
        }
    }

    pub fn store(&self) -> &HydrationStore<S> {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn is_onboarded(&self) -> Result<bool> {
        self.store.is_onboarding_completed()
    }

    /// Stored settings, or defaults when none were saved yet
    pub fn settings(&self) -> Result<AppSettings> {
        Ok(self.store.settings()?.unwrap_or_default())
    }

    /// Validate and persist settings
    ///
    /// A zero goal, an unusable frequency or an inverted window is rejected,
    /// so stored settings always produce a reminder plan.
    pub fn save_settings(&mut self, settings: &AppSettings) -> Result<()> {
        if settings.daily_goal == 0 {
            return Err(HydrationError::InvalidInput(
                "daily goal must be positive".to_string(),
            ));
        }
        let plan = ReminderScheduler::try_plan_from_settings(settings)?;
        self.store.save_settings(settings)?;
        debug!(slots = plan.len(), "Settings saved");
        Ok(())
    }

    pub fn profile(&self) -> Result<Option<UserProfile>> {
        self.store.profile()
    }

    /// Create the profile, seed settings with the recommended goal and mark
    /// onboarding complete
    #[instrument(skip(self))]
    pub fn onboard(&mut self, name: &str, weight_kg: f64, activity_label: &str) -> Result<UserProfile> {
        if name.trim().is_empty() {
            return Err(HydrationError::InvalidInput("name is required".to_string()));
        }
        let level = parse_activity(activity_label)?;
        let recommended = GoalCalculator::try_recommended_intake(weight_kg, level)?;

        let mut profile = UserProfile::new(name.trim(), weight_kg, level.label());
        profile.recommended_intake = recommended;
        self.store.save_profile(&profile)?;

        let settings = AppSettings {
            daily_goal: recommended,
            ..self.settings()?
        };
        self.store.save_settings(&settings)?;
        self.store.complete_onboarding()?;

        info!(recommended, "Onboarding completed");
        Ok(profile)
    }

    /// Update weight and activity; adopt the new recommendation as the daily
    /// goal when `use_recommended` is set
    #[instrument(skip(self))]
    pub fn update_profile(
        &mut self,
        weight_kg: f64,
        activity_label: &str,
        use_recommended: bool,
    ) -> Result<UserProfile> {
        let level = parse_activity(activity_label)?;
        let recommended = GoalCalculator::try_recommended_intake(weight_kg, level)?;

        let mut profile = self
            .store
            .profile()?
            .ok_or_else(|| crate::error::StorageError::NotFound {
                key: "user_profile".to_string(),
            })?;
        profile.weight = weight_kg;
        profile.activity_level = level.label().to_string();
        profile.recommended_intake = recommended;
        self.store.save_profile(&profile)?;

        if use_recommended {
            let settings = AppSettings {
                daily_goal: recommended,
                ..self.settings()?
            };
            self.store.save_settings(&settings)?;
            debug!(recommended, "Daily goal set to recommendation");
        }

        Ok(profile)
    }

    /// Today's record, created with the current goal if absent
    pub fn today(&mut self) -> Result<WaterDayRecord> {
        let today = self.clock.today();
        if let Some(record) = self.store.water_record(today)? {
            return Ok(record);
        }

        let goal = self
            .store
            .settings()?
            .map(|s| s.daily_goal)
            .unwrap_or(DEFAULT_DAILY_GOAL_ML);
        let record = WaterDayRecord::new(today, goal);
        self.store.save_water_record(&record)?;
        debug!(date = %today, goal, "Initialized today's record");

        Ok(record)
    }

    /// Record a drink against today's goal and update XP and streaks
    #[instrument(skip(self))]
    pub fn add_water(&mut self, amount_ml: u32) -> Result<DrinkOutcome> {
        if amount_ml == 0 {
            return Err(HydrationError::InvalidInput("amount must be positive".to_string()));
        }

        let goal = self.settings()?.daily_goal;
        let current = WaterDayRecord {
            goal_ml: goal,
            ..self.today()?
        };
        let record = intake::add_water(&current, amount_ml, goal);
        self.store.save_water_record(&record)?;

        let progress = match self.store.profile()? {
            Some(mut profile) => {
                let update = gamification::record_drink(
                    &mut profile,
                    record.date,
                    amount_ml,
                    record.intake_ml,
                    goal,
                );
                self.store.save_profile(&profile)?;
                Some(update)
            }
            None => None,
        };

        info!(intake = record.intake_ml, goal, "Water added");
        Ok(DrinkOutcome { record, progress })
    }

    pub fn next_reminder(&self) -> Result<Option<NextReminder>> {
        let settings = self.settings()?;
        if !settings.notifications_enabled {
            return Ok(None);
        }
        Ok(ReminderScheduler::next_reminder_from_settings(self.clock.now(), &settings))
    }

    pub fn reminder_plan(&self) -> Result<ReminderPlan> {
        Ok(ReminderScheduler::plan_from_settings(&self.settings()?))
    }

    /// Re-register reminders with the notification backend
    pub fn schedule_reminders<N, R>(&self, scheduler: &mut N, rng: &mut R) -> Result<usize>
    where
        N: NotificationScheduler + ?Sized,
        R: Rng + ?Sized,
    {
        let settings = self.settings()?;
        let profile = self.store.profile()?;
        notifications::schedule_reminders(
            &settings,
            profile.as_ref().map(|p| p.name.as_str()),
            scheduler,
            rng,
        )
    }

    pub fn month_stats(&self, month: YearMonth) -> Result<(Vec<WaterDayRecord>, MonthStats)> {
        let records = self.store.month_records(month.year, month.month)?;
        let stats = MonthStats::from_records(&records);
        Ok((records, stats))
    }
}

fn parse_activity(label: &str) -> Result<ActivityLevel> {
    ActivityLevel::from_label(label)
        .ok_or_else(|| HydrationError::InvalidInput(format!("unknown activity level '{}'", label)))
}
