use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::UserProfile;

/// XP needed per level
pub const XP_PER_LEVEL: u32 = 500;

/// Bonus for the first time the goal is met on a given day
pub const GOAL_BONUS_XP: u32 = 100;

/// Rank titles shown next to the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    WaterNovice,
    HydroHero,
    WaterWarrior,
    HydrationMaster,
    AquaLegend,
}

impl Rank {
    pub fn for_level(level: u32) -> Self {
        match level {
            20.. => Rank::AquaLegend,
            15..=19 => Rank::HydrationMaster,
            10..=14 => Rank::WaterWarrior,
            5..=9 => Rank::HydroHero,
            _ => Rank::WaterNovice,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Rank::WaterNovice => "Water Novice",
            Rank::HydroHero => "Hydro Hero",
            Rank::WaterWarrior => "Water Warrior",
            Rank::HydrationMaster => "Hydration Master",
            Rank::AquaLegend => "Aqua Legend",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// What changed after a drink was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressUpdate {
    pub xp_gained: u32,
    pub leveled_up: bool,
    pub goal_reached_today: bool,
}

pub fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// Progress through the current level in `0.0..1.0`
pub fn level_progress(xp: u32) -> f64 {
    f64::from(xp % XP_PER_LEVEL) / f64::from(XP_PER_LEVEL)
}

/// Apply XP and streak rules for a drink of `amount_ml` on `date`
///
/// `intake_ml` is the day's intake after the drink. Each drink earns one XP
/// per 10 ml. The first time the goal is met on a date adds a bonus and
/// advances the streak, which continues only from yesterday.
pub fn record_drink(
    profile: &mut UserProfile,
    date: NaiveDate,
    amount_ml: u32,
    intake_ml: u32,
    goal_ml: u32,
) -> ProgressUpdate {
    let previous_level = profile.level;
    let mut update = ProgressUpdate {
        xp_gained: amount_ml / 10,
        ..ProgressUpdate::default()
    };

    if intake_ml >= goal_ml && profile.last_goal_date != Some(date) {
        let continues_streak = profile.last_goal_date.and_then(|d| d.succ_opt()) == Some(date);
        profile.current_streak = if continues_streak {
            profile.current_streak + 1
        } else {
            1
        };
        profile.highest_streak = profile.highest_streak.max(profile.current_streak);
        profile.last_goal_date = Some(date);

        update.xp_gained += GOAL_BONUS_XP;
        update.goal_reached_today = true;
    }

    profile.xp = profile.xp.saturating_add(update.xp_gained);
    profile.level = level_for_xp(profile.xp);
    update.leveled_up = profile.level > previous_level;

    update
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile::new("Sam", 70.0, "Sedentary (little or no exercise)")
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    #[test]
    fn test_rank_titles() {
        assert_eq!(Rank::for_level(1).title(), "Water Novice");
        assert_eq!(Rank::for_level(5).title(), "Hydro Hero");
        assert_eq!(Rank::for_level(12).title(), "Water Warrior");
        assert_eq!(Rank::for_level(15).title(), "Hydration Master");
        assert_eq!(Rank::for_level(40).title(), "Aqua Legend");
    }

    #[test]
    fn test_levels() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(499), 1);
        assert_eq!(level_for_xp(500), 2);
        assert_eq!(level_progress(750), 0.5);
    }

    #[test]
    fn test_drink_below_goal_only_earns_xp() {
        let mut profile = profile();
        let update = record_drink(&mut profile, day(1), 200, 200, 2000);
        assert_eq!(update.xp_gained, 20);
        assert!(!update.goal_reached_today);
        assert_eq!(profile.xp, 20);
        assert_eq!(profile.current_streak, 0);
    }

    #[test]
    fn test_goal_bonus_once_per_day() {
        let mut profile = profile();
        let first = record_drink(&mut profile, day(1), 300, 2000, 2000);
        assert!(first.goal_reached_today);
        assert_eq!(first.xp_gained, 130);
        assert_eq!(profile.current_streak, 1);

        let second = record_drink(&mut profile, day(1), 100, 2000, 2000);
        assert!(!second.goal_reached_today);
        assert_eq!(second.xp_gained, 10);
        assert_eq!(profile.current_streak, 1);
    }

    #[test]
    fn test_streak_continues_and_resets() {
        let mut profile = profile();
        record_drink(&mut profile, day(1), 200, 2000, 2000);
        record_drink(&mut profile, day(2), 200, 2000, 2000);
        record_drink(&mut profile, day(3), 200, 2000, 2000);
        assert_eq!(profile.current_streak, 3);
        assert_eq!(profile.highest_streak, 3);

        // Missed day 4
        record_drink(&mut profile, day(5), 200, 2000, 2000);
        assert_eq!(profile.current_streak, 1);
        assert_eq!(profile.highest_streak, 3);
    }

    #[test]
    fn test_level_up_is_reported() {
        let mut profile = profile();
        profile.xp = 480;
        let update = record_drink(&mut profile, day(1), 300, 300, 2000);
        assert!(update.leveled_up);
        assert_eq!(profile.level, 2);
    }
}
