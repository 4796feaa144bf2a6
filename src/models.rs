use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default daily goal used until the user picks one
pub const DEFAULT_DAILY_GOAL_ML: u32 = 2000;

/// Default reminder interval in minutes
pub const DEFAULT_REMINDER_FREQUENCY: &str = "60";

pub const DEFAULT_START_TIME: &str = "8:00";
pub const DEFAULT_END_TIME: &str = "22:00";

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Activity categories used to scale the baseline intake recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    /// Long-form label, as shown to the user and persisted in the profile
    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary (little or no exercise)",
            ActivityLevel::LightlyActive => "Lightly active (light exercise 1-3 days/week)",
            ActivityLevel::ModeratelyActive => {
                "Moderately active (moderate exercise 3-5 days/week)"
            }
            ActivityLevel::VeryActive => "Very active (hard exercise 6-7 days/week)",
            ActivityLevel::ExtraActive => "Extra active (very hard exercise & physical job)",
        }
    }

    /// Look up a level by its long-form label or a short slug
    /// (`sedentary`, `lightly-active`, `very_active`, ...)
    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        if let Some(level) = Self::ALL.iter().find(|level| level.label() == trimmed) {
            return Some(*level);
        }

        match trimmed.to_lowercase().replace(['_', ' '], "-").as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "lightly-active" | "light" => Some(ActivityLevel::LightlyActive),
            "moderately-active" | "moderate" => Some(ActivityLevel::ModeratelyActive),
            "very-active" => Some(ActivityLevel::VeryActive),
            "extra-active" => Some(ActivityLevel::ExtraActive),
            _ => None,
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("Unknown activity level: {}", s))
    }
}

/// A wall-clock time of day, stored as minutes since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(TimeOfDay(hour * 60 + minute))
        } else {
            None
        }
    }

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(TimeOfDay(minutes))
    }

    /// Parse `"H:MM"` / `"HH:MM"`; returns `None` for anything else
    pub fn parse(value: &str) -> Option<Self> {
        let (hour, minute) = value.trim().split_once(':')?;
        let is_number = |part: &str| {
            !part.is_empty() && part.len() <= 2 && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !is_number(hour) || !is_number(minute) {
            return None;
        }

        Self::from_hm(hour.parse().ok()?, minute.parse().ok()?)
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.0 % 60) as u8
    }

    /// `(hour, minute)` pair as accepted by daily notification triggers
    pub fn as_trigger(&self) -> (u8, u8) {
        (self.hour(), self.minute())
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        // Always in range: minutes < 1440
        NaiveTime::from_hms_opt(u32::from(self.hour()), u32::from(self.minute()), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        TimeOfDay((time.hour() * 60 + time.minute()) as u16)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid time of day: {}", s))
    }
}

/// Persisted user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,

    /// Body weight in kilograms
    pub weight: f64,

    /// Activity level label, as persisted (see [`ActivityLevel::label`])
    pub activity_level: String,

    /// Goal suggested by the calculator when the profile was last saved
    pub recommended_intake: u32,

    #[serde(default = "default_level")]
    pub level: u32,

    #[serde(default)]
    pub xp: u32,

    #[serde(default)]
    pub current_streak: u32,

    #[serde(default)]
    pub highest_streak: u32,

    /// Last date on which the daily goal was reached
    #[serde(default)]
    pub last_goal_date: Option<NaiveDate>,
}

fn default_level() -> u32 {
    1
}

impl UserProfile {
    pub fn new(name: impl Into<String>, weight: f64, activity_level: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight,
            activity_level: activity_level.into(),
            recommended_intake: 0,
            level: 1,
            xp: 0,
            current_streak: 0,
            highest_streak: 0,
            last_goal_date: None,
        }
    }

    pub fn activity(&self) -> Option<ActivityLevel> {
        ActivityLevel::from_label(&self.activity_level)
    }
}

/// Persisted reminder and goal settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub daily_goal: u32,
    pub notifications_enabled: bool,

    /// Minutes between reminders, kept as the string the user entered
    pub reminder_frequency: String,

    pub start_time: String,
    pub end_time: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            daily_goal: DEFAULT_DAILY_GOAL_ML,
            notifications_enabled: true,
            reminder_frequency: DEFAULT_REMINDER_FREQUENCY.to_string(),
            start_time: DEFAULT_START_TIME.to_string(),
            end_time: DEFAULT_END_TIME.to_string(),
        }
    }
}

impl AppSettings {
    /// Reminder frequency as a positive number of minutes
    pub fn frequency_minutes(&self) -> Option<u32> {
        self.reminder_frequency
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|minutes| *minutes > 0)
    }

    pub fn start(&self) -> Option<TimeOfDay> {
        TimeOfDay::parse(&self.start_time)
    }

    pub fn end(&self) -> Option<TimeOfDay> {
        TimeOfDay::parse(&self.end_time)
    }
}

/// Water intake for a single calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterDayRecord {
    pub date: NaiveDate,

    /// Water drunk so far, in milliliters
    #[serde(rename = "intake")]
    pub intake_ml: u32,

    /// Goal that applied on this day, in milliliters
    #[serde(rename = "goal")]
    pub goal_ml: u32,
}

impl WaterDayRecord {
    pub fn new(date: NaiveDate, goal_ml: u32) -> Self {
        Self {
            date,
            intake_ml: 0,
            goal_ml,
        }
    }

    pub fn goal_reached(&self) -> bool {
        self.intake_ml >= self.goal_ml
    }

    /// Progress towards the goal in `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.goal_ml == 0 {
            return 1.0;
        }
        (f64::from(self.intake_ml) / f64::from(self.goal_ml)).min(1.0)
    }
}
