//! Meal-time dose computation.
//!
//! Turns the entered glucose/carb parameters into the three doses that get
//! recorded: carb dose, correction dose and their quantized total. The
//! computation is total over its whole input domain; a zero ratio simply
//! contributes nothing. Rejecting nonsensical ratios is the service layer's
//! job, before this is called.

use serde::Serialize;

use super::rounding::{format_units, round_to_half_unit};

/// Parameters entered for one meal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseInputs {
    /// Total carbohydrate of the meal, in grams.
    pub total_carb_grams: f64,
    /// Glucose reading taken before the meal.
    pub current_glucose: i32,
    /// Glucose value the correction dose aims for.
    pub target_glucose: i32,
    /// Carb-to-insulin ratio: grams offset by one unit of insulin.
    pub carb_ratio: f64,
    /// Insulin sensitivity factor: glucose drop per unit of insulin.
    pub sensitivity: f64,
}

/// The three quantized doses for one meal, in insulin units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DoseResult {
    pub carb_dose: f64,
    pub correction_dose: f64,
    pub total_dose: f64,
}

impl std::fmt::Display for DoseResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "carb {} U, correction {} U, total {} U",
            format_units(self.carb_dose),
            format_units(self.correction_dose),
            format_units(self.total_dose)
        )
    }
}

/// Compute the carb, correction and total doses for a meal.
///
/// The total is the quantized sum of the two already-quantized components,
/// not a re-quantization of the raw sum; the recorded components and the
/// recorded total therefore always agree.
pub fn compute_dose(inputs: &DoseInputs) -> DoseResult {
    let raw_carb = if inputs.carb_ratio > 0.0 {
        inputs.total_carb_grams / inputs.carb_ratio
    } else {
        0.0
    };

    let raw_correction = if inputs.sensitivity > 0.0 {
        f64::from(inputs.current_glucose - inputs.target_glucose) / inputs.sensitivity
    } else {
        0.0
    };

    let carb_dose = round_to_half_unit(raw_carb);
    let correction_dose = round_to_half_unit(raw_correction);
    let total_dose = round_to_half_unit(carb_dose + correction_dose);

    DoseResult {
        carb_dose,
        correction_dose,
        total_dose,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(
        total_carb_grams: f64,
        carb_ratio: f64,
        current_glucose: i32,
        target_glucose: i32,
        sensitivity: f64,
    ) -> DoseInputs {
        DoseInputs {
            total_carb_grams,
            current_glucose,
            target_glucose,
            carb_ratio,
            sensitivity,
        }
    }

    #[test]
    fn standard_meal_scenario() {
        // 60 g at C/I 10 with an 80 mg/dL excess over target at ISF 50.
        let result = compute_dose(&inputs(60.0, 10.0, 180, 100, 50.0));
        assert_eq!(result.carb_dose, 6.0);
        assert_eq!(result.correction_dose, 1.5); // raw 1.6 rounds down
        assert_eq!(result.total_dose, 7.5);
    }

    #[test]
    fn zero_ratios_contribute_nothing() {
        let result = compute_dose(&inputs(0.0, 0.0, 120, 100, 0.0));
        assert_eq!(result.carb_dose, 0.0);
        assert_eq!(result.correction_dose, 0.0);
        assert_eq!(result.total_dose, 0.0);

        // Carbs present but no ratio: still no carb dose, no panic.
        let result = compute_dose(&inputs(60.0, 0.0, 180, 100, 50.0));
        assert_eq!(result.carb_dose, 0.0);
        assert_eq!(result.correction_dose, 1.5);
        assert_eq!(result.total_dose, 1.5);
    }

    #[test]
    fn glucose_below_target_truncates_to_zero() {
        // Raw correction is -0.2; truncation toward zero leaves 0.0.
        let result = compute_dose(&inputs(0.0, 0.0, 90, 100, 50.0));
        assert_eq!(result.correction_dose, 0.0);
        assert!(result.correction_dose.is_sign_positive());
        assert_eq!(result.total_dose, 0.0);
    }

    #[test]
    fn larger_negative_correction_keeps_integer_part() {
        // Raw correction is -1.6 and lands on -1.0, not -1.5.
        let result = compute_dose(&inputs(0.0, 0.0, 100, 180, 50.0));
        assert_eq!(result.correction_dose, -1.0);
        assert_eq!(result.total_dose, -1.0);
    }

    #[test]
    fn total_is_quantized_over_rounded_components() {
        // Both raws are 1.3 and round up to 1.5 each; the total quantizes
        // their sum (3.0), not the raw sum (2.6, which would give 2.5).
        let result = compute_dose(&inputs(13.0, 10.0, 113, 100, 10.0));
        assert_eq!(result.carb_dose, 1.5);
        assert_eq!(result.correction_dose, 1.5);
        assert_eq!(result.total_dose, 3.0);
    }

    #[test]
    fn display_reports_one_decimal() {
        let result = compute_dose(&inputs(60.0, 10.0, 180, 100, 50.0));
        assert_eq!(result.to_string(), "carb 6.0 U, correction 1.5 U, total 7.5 U");
    }
}
