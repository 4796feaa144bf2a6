use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::WaterDayRecord;

/// A calendar month, used to page through history
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The day with the highest intake in a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestDay {
    pub date: NaiveDate,
    pub intake_ml: u32,
}

/// Summary statistics for a month of records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthStats {
    pub total_intake_ml: u64,
    pub average_daily_intake_ml: u32,
    pub days_tracked: u32,
    pub best_day: Option<BestDay>,
    /// Share of tracked days on which the goal was met, as a whole percentage
    pub goal_achievement_pct: u32,
}

impl MonthStats {
    /// Aggregate a month's records; an empty slice yields all-zero stats
    pub fn from_records(records: &[WaterDayRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let days = records.len() as u64;
        let total: u64 = records.iter().map(|r| u64::from(r.intake_ml)).sum();
        let goal_days = records.iter().filter(|r| r.goal_reached()).count() as u64;

        // First maximum wins on ties
        let best = records
            .iter()
            .fold(&records[0], |best, r| if r.intake_ml > best.intake_ml { r } else { best });

        Self {
            total_intake_ml: total,
            average_daily_intake_ml: round_div(total, days) as u32,
            days_tracked: days as u32,
            best_day: Some(BestDay {
                date: best.date,
                intake_ml: best.intake_ml,
            }),
            goal_achievement_pct: round_div(goal_days * 100, days) as u32,
        }
    }
}

/// The record for a single day, if tracked
pub fn day_record(records: &[WaterDayRecord], date: NaiveDate) -> Option<&WaterDayRecord> {
    records.iter().find(|r| r.date == date)
}

/// Integer division rounding halves up
fn round_div(numerator: u64, denominator: u64) -> u64 {
    (numerator * 2 + denominator) / (denominator * 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, intake_ml: u32, goal_ml: u32) -> WaterDayRecord {
        WaterDayRecord {
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            intake_ml,
            goal_ml,
        }
    }

    #[test]
    fn test_month_navigation_wraps_years() {
        let jan = YearMonth::new(2024, 1).unwrap();
        assert_eq!(jan.prev(), YearMonth::new(2023, 12).unwrap());
        assert_eq!(jan.prev().next(), jan);

        let dec = YearMonth::new(2024, 12).unwrap();
        assert_eq!(dec.next(), YearMonth::new(2025, 1).unwrap());
        assert_eq!(dec.to_string(), "2024-12");

        assert!(YearMonth::new(2024, 13).is_none());
        assert!(YearMonth::new(2024, 0).is_none());
    }

    #[test]
    fn test_empty_month() {
        let stats = MonthStats::from_records(&[]);
        assert_eq!(stats, MonthStats::default());
        assert!(stats.best_day.is_none());
    }

    #[test]
    fn test_month_stats() {
        let records = vec![
            record(1, 2000, 2000),
            record(2, 1500, 2000),
            record(3, 2500, 2500),
            record(4, 1000, 2000),
        ];
        let stats = MonthStats::from_records(&records);

        assert_eq!(stats.total_intake_ml, 7000);
        assert_eq!(stats.average_daily_intake_ml, 1750);
        assert_eq!(stats.days_tracked, 4);
        assert_eq!(stats.goal_achievement_pct, 50);
        assert_eq!(stats.best_day.unwrap().date, records[2].date);
    }

    #[test]
    fn test_rounding_and_ties() {
        let records = vec![record(1, 1000, 2000), record(2, 1001, 2000), record(3, 1001, 1000)];
        let stats = MonthStats::from_records(&records);

        // 3002 / 3 = 1000.67
        assert_eq!(stats.average_daily_intake_ml, 1001);
        // 1 of 3 days = 33.3%
        assert_eq!(stats.goal_achievement_pct, 33);
        // First of the tied maxima
        assert_eq!(stats.best_day.unwrap().date, records[1].date);
    }

    #[test]
    fn test_day_record_lookup() {
        let records = vec![record(1, 100, 2000), record(9, 900, 2000)];
        let date = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        assert_eq!(day_record(&records, date).unwrap().intake_ml, 900);
        assert!(day_record(&records, NaiveDate::from_ymd_opt(2024, 2, 2).unwrap()).is_none());
        assert!(YearMonth::new(2024, 2).unwrap().contains(date));
    }
}
