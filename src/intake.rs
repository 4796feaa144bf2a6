use crate::models::WaterDayRecord;

/// One-tap amounts offered on the home screen, in milliliters
pub const QUICK_ADD_AMOUNTS_ML: [u32; 3] = [100, 200, 300];

/// Amount credited when the user confirms a reminder
pub const REMINDER_CONFIRM_AMOUNT_ML: u32 = 200;

/// Record `amount_ml` of water against the day's goal
///
/// Intake is capped at `goal_ml`; an intake already above the goal (say the
/// goal was lowered later in the day) is left untouched.
pub fn add_water(record: &WaterDayRecord, amount_ml: u32, goal_ml: u32) -> WaterDayRecord {
    let intake_ml = if record.intake_ml >= goal_ml {
        record.intake_ml
    } else {
        record.intake_ml.saturating_add(amount_ml).min(goal_ml)
    };

    WaterDayRecord {
        intake_ml,
        ..record.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(intake_ml: u32) -> WaterDayRecord {
        WaterDayRecord {
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            intake_ml,
            goal_ml: 2000,
        }
    }

    #[test]
    fn test_add_water_accumulates() {
        let updated = add_water(&record(500), 300, 2000);
        assert_eq!(updated.intake_ml, 800);
        assert_eq!(updated.goal_ml, 2000);
    }

    #[test]
    fn test_add_water_caps_at_goal() {
        assert_eq!(add_water(&record(1900), 300, 2000).intake_ml, 2000);
        assert_eq!(add_water(&record(2000), 100, 2000).intake_ml, 2000);
    }

    #[test]
    fn test_add_water_keeps_intake_above_lowered_goal() {
        assert_eq!(add_water(&record(2400), 200, 2000).intake_ml, 2400);
    }
}
