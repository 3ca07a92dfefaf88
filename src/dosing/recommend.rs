//! Retrospective carb-to-insulin ratio recommendation.
//!
//! Once a post-meal glucose reading is known, the insulin that went into
//! correcting glucose can be separated from the insulin that covered carbs,
//! and a ratio can be backed out of the record. When the correction term
//! consumed the whole dose (or the sensitivity is unusable) there is nothing
//! to back out, and `None` is the normal, expected answer.

use super::rounding::round2;

/// The fields of a stored meal record that the back-solver reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioInputs {
    /// Total carbohydrate of the recorded meal, in grams.
    pub total_carb_grams: f64,
    /// Glucose reading stored when the meal was dosed.
    pub pre_meal_glucose: i32,
    /// Insulin sensitivity factor stored with the record.
    pub sensitivity: f64,
    /// Total insulin delivered for the meal, in units.
    pub total_dose: f64,
}

/// Back-solve a recommended carb-to-insulin ratio from a post-meal reading.
///
/// Splits the delivered total into the part that was spent moving glucose
/// from the pre-meal to the post-meal reading and the remainder, which must
/// have covered the carbs. Returns the ratio rounded to two decimals, or
/// `None` when the sensitivity is not positive or the carb share of the dose
/// is not positive.
pub fn recommend_ratio(inputs: &RatioInputs, post_meal_glucose: i32) -> Option<f64> {
    if inputs.sensitivity <= 0.0 {
        return None;
    }

    let correction_spent =
        f64::from(inputs.pre_meal_glucose - post_meal_glucose) / inputs.sensitivity;
    let carb_insulin = inputs.total_dose - correction_spent;
    if carb_insulin <= 0.0 {
        return None;
    }

    Some(round2(inputs.total_carb_grams / carb_insulin))
}
