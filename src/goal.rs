use crate::error::{HydrationError, Result};
use crate::models::ActivityLevel;
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Milliliters of water per kilogram of body weight
const ML_PER_KG: Decimal = dec!(35);

/// Goals are rounded to this many milliliters
const ROUNDING_STEP_ML: Decimal = dec!(100);

impl ActivityLevel {
    /// Multiplicative adjustment applied to the weight-based baseline
    pub fn intake_multiplier(&self) -> Decimal {
        match self {
            ActivityLevel::Sedentary => dec!(1.0),
            ActivityLevel::LightlyActive => dec!(1.1),
            ActivityLevel::ModeratelyActive => dec!(1.2),
            ActivityLevel::VeryActive => dec!(1.3),
            ActivityLevel::ExtraActive => dec!(1.4),
        }
    }
}

/// Daily water goal calculation
pub struct GoalCalculator;

impl GoalCalculator {
    /// Recommended daily intake in milliliters
    ///
    /// `weight_kg × 35 ml`, scaled by the activity multiplier and rounded to
    /// the nearest 100 ml (halves round up). The result is always a multiple
    /// of 100. Non-positive or non-finite weights yield 0; callers are
    /// expected to validate weight first (see [`Self::try_recommended_intake`]).
    pub fn recommended_intake(weight_kg: f64, activity_level: ActivityLevel) -> u32 {
        Self::compute(weight_kg, activity_level.intake_multiplier()).unwrap_or(0)
    }

    /// Same as [`Self::recommended_intake`] for a persisted label; an
    /// unrecognized label gets no adjustment.
    pub fn recommended_intake_for_label(weight_kg: f64, activity_label: &str) -> u32 {
        let level =
            ActivityLevel::from_label(activity_label).unwrap_or(ActivityLevel::Sedentary);
        Self::recommended_intake(weight_kg, level)
    }

    /// Validating variant of [`Self::recommended_intake`]
    pub fn try_recommended_intake(weight_kg: f64, activity_level: ActivityLevel) -> Result<u32> {
        Self::compute(weight_kg, activity_level.intake_multiplier()).ok_or_else(|| {
            HydrationError::InvalidInput(format!(
                "weight must be a positive number of kilograms, got {}",
                weight_kg
            ))
        })
    }

    fn compute(weight_kg: f64, multiplier: Decimal) -> Option<u32> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return None;
        }

        let weight = Decimal::from_f64(weight_kg)?;
        let target = weight.checked_mul(ML_PER_KG)?.checked_mul(multiplier)?;
        let steps = (target / ROUNDING_STEP_ML)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        (steps * ROUNDING_STEP_ML).to_u32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sedentary_baseline() {
        // 70 * 35 = 2450 -> 2500
        assert_eq!(GoalCalculator::recommended_intake(70.0, ActivityLevel::Sedentary), 2500);
    }

    #[test]
    fn test_activity_adjustments() {
        // 2450 * 1.1 = 2695 -> 2700
        assert_eq!(
            GoalCalculator::recommended_intake(70.0, ActivityLevel::LightlyActive),
            2700
        );
        // 2450 * 1.2 = 2940 -> 2900
        assert_eq!(
            GoalCalculator::recommended_intake(70.0, ActivityLevel::ModeratelyActive),
            2900
        );
        // 2450 * 1.3 = 3185 -> 3200
        assert_eq!(GoalCalculator::recommended_intake(70.0, ActivityLevel::VeryActive), 3200);
        // 2450 * 1.4 = 3430 -> 3400
        assert_eq!(GoalCalculator::recommended_intake(70.0, ActivityLevel::ExtraActive), 3400);
    }

    #[test]
    fn test_label_lookup() {
        assert_eq!(
            GoalCalculator::recommended_intake_for_label(
                70.0,
                "Very active (hard exercise 6-7 days/week)"
            ),
            3200
        );
        // Unknown labels fall back to the sedentary baseline
        assert_eq!(GoalCalculator::recommended_intake_for_label(70.0, "marathoner"), 2500);
    }

    #[test]
    fn test_midpoint_rounds_up() {
        // 10 * 35 = 350 -> 3.5 steps -> 400
        assert_eq!(GoalCalculator::recommended_intake(10.0, ActivityLevel::Sedentary), 400);
        // 50 * 35 * 1.1 = 1925 -> 19.25 steps -> 1900
        assert_eq!(
            GoalCalculator::recommended_intake(50.0, ActivityLevel::LightlyActive),
            1900
        );
    }

    #[test]
    fn test_invalid_weight() {
        assert_eq!(GoalCalculator::recommended_intake(0.0, ActivityLevel::Sedentary), 0);
        assert_eq!(GoalCalculator::recommended_intake(-5.0, ActivityLevel::VeryActive), 0);
        assert_eq!(GoalCalculator::recommended_intake(f64::NAN, ActivityLevel::Sedentary), 0);

        let err = GoalCalculator::try_recommended_intake(0.0, ActivityLevel::Sedentary);
        assert!(matches!(err, Err(HydrationError::InvalidInput(_))));
        assert_eq!(
            GoalCalculator::try_recommended_intake(70.0, ActivityLevel::Sedentary).unwrap(),
            2500
        );
    }

    // Property-based tests using proptest
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_goal_is_multiple_of_100(weight in 0.5f64..400.0f64, idx in 0usize..5) {
            let level = ActivityLevel::ALL[idx];
            let goal = GoalCalculator::recommended_intake(weight, level);
            prop_assert_eq!(goal % 100, 0);
        }

        #[test]
        fn test_goal_grows_with_activity(weight in 20.0f64..200.0f64) {
            let goals: Vec<u32> = ActivityLevel::ALL
                .iter()
                .map(|level| GoalCalculator::recommended_intake(weight, *level))
                .collect();
            prop_assert!(goals.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }
}
